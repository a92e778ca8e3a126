use ethereum_types::U64;
use serde::{Deserialize, Serialize};

use super::block::ZERO_ADDRESS;
use super::logs::{bloom_hex, logs_bloom, LogEntry};
use crate::ledger::{LedgerBlock, LedgerLog, LedgerTransaction};
use crate::translator::units::{hash_hex, quantity, rescale_balance, SYNTHETIC_GAS, TRANSFER_GAS};

/// EVM transaction object returned by `eth_getTransactionByHash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub block_hash: String,
    pub block_number: String,
    pub from: String,
    /// Empty for contract creation
    pub to: String,
    pub gas: String,
    pub gas_price: String,
    pub nonce: String,
    pub value: String,
    pub input: String,
    pub v: String,
    pub r: String,
    pub s: String,
    pub transaction_index: String,
}

impl Transaction {
    /// `nonce` is the sender's current nonce, when it could be looked up.
    pub fn from_ledger(tx: &LedgerTransaction, block: &LedgerBlock, nonce: Option<u64>) -> Self {
        let (to, input) = match &tx.evm {
            Some(evm) if evm.is_create() => (String::new(), evm.input.as_str()),
            Some(evm) => (hash_hex(&tx.eth_to), evm.input.as_str()),
            None => (hash_hex(&tx.eth_to), ""),
        };

        Self {
            hash: hash_hex(&tx.hash),
            block_hash: hash_hex(&block.hash),
            block_number: quantity(block.height),
            from: hash_hex(&tx.eth_from),
            to,
            gas: quantity(SYNTHETIC_GAS),
            gas_price: quantity(TRANSFER_GAS),
            nonce: quantity(nonce.unwrap_or(0)),
            value: format!("0x{}", rescale_balance(tx.amount)),
            input: hash_hex(input),
            v: "0x0".to_string(),
            r: "0x0".to_string(),
            s: "0x0".to_string(),
            transaction_index: "0x0".to_string(),
        }
    }
}

/// EVM transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub transaction_index: String,
    pub block_hash: String,
    pub block_number: String,
    pub from: String,
    pub to: String,
    /// No per-block gas accounting, so always equal to `gas_used`
    pub cumulative_gas_used: String,
    pub gas_used: String,
    pub contract_address: String,
    pub logs: Vec<LogEntry>,
    pub logs_bloom: String,
    /// 0x1 success, 0x0 failure
    pub status: String,
    pub root: String,
}

impl TransactionReceipt {
    /// Assemble a receipt. `logs` are the ledger logs of the transaction;
    /// their block number is replaced with the transaction's.
    pub fn from_ledger(tx: &LedgerTransaction, block: &LedgerBlock, logs: &[LedgerLog]) -> Self {
        let logs: Vec<LedgerLog> = logs
            .iter()
            .cloned()
            .map(|mut log| {
                log.block_number = U64::from(tx.block_number);
                log
            })
            .collect();

        let transaction_index = logs
            .last()
            .map(|log| log.transaction_index.as_u64())
            .unwrap_or(0);

        let (to, contract_address, success) = match &tx.evm {
            Some(evm) => {
                let to = if evm.is_create() {
                    ZERO_ADDRESS.to_string()
                } else {
                    hash_hex(&tx.eth_to)
                };
                let contract = if evm.contract_address.is_empty() {
                    ZERO_ADDRESS.to_string()
                } else {
                    hash_hex(&evm.contract_address)
                };
                (to, contract, evm.status)
            }
            // native transfers always succeed once on the ledger
            None => (hash_hex(&tx.eth_to), ZERO_ADDRESS.to_string(), true),
        };

        let gas_used = quantity(SYNTHETIC_GAS);

        Self {
            transaction_hash: hash_hex(&tx.hash),
            transaction_index: quantity(transaction_index),
            block_hash: hash_hex(&block.hash),
            block_number: quantity(tx.block_number),
            from: hash_hex(&tx.eth_from),
            to,
            cumulative_gas_used: gas_used.clone(),
            gas_used,
            contract_address,
            logs_bloom: bloom_hex(&logs_bloom(&logs)),
            logs: logs.iter().map(LogEntry::from_ledger).collect(),
            status: quantity(u64::from(success)),
            root: format!("0x{}", "0".repeat(64)),
        }
    }
}
