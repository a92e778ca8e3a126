#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use eth_gateway::config::Config;
use eth_gateway::dispatcher::Gateway;
use eth_gateway::error::LedgerError;
use eth_gateway::jsonrpc::Reply;
use eth_gateway::ledger::{
    ContractCall, LedgerBlock, LedgerClient, LedgerLog, LedgerResult, LedgerTransaction,
    LogQuery, NativeTransfer,
};

/// Which raw-send variant the gateway chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSend {
    Native { from: String, raw: String },
    Contract { from: String, raw: String },
}

/// In-memory ledger. Unknown keys answer `NotFound`.
#[derive(Default)]
pub struct MockLedger {
    pub native: HashMap<String, String>,
    pub balances: HashMap<String, u64>,
    pub nonces: HashMap<String, u64>,
    pub balance_error: Option<LedgerError>,
    pub height: u64,
    pub blocks: Vec<LedgerBlock>,
    pub transactions: HashMap<String, LedgerTransaction>,
    pub tx_logs: HashMap<String, Vec<LedgerLog>>,
    pub tx_logs_error: Option<LedgerError>,
    pub logs: Vec<LedgerLog>,
    pub logs_error: Option<LedgerError>,
    pub contract_call: Option<LedgerResult<ContractCall>>,
    pub code: String,
    pub storage: HashMap<(String, String), String>,

    pub calls: Mutex<Vec<&'static str>>,
    pub transfers: Mutex<Vec<NativeTransfer>>,
    pub raw_sends: Mutex<Vec<RawSend>>,
    pub log_queries: Mutex<Vec<LogQuery>>,
}

impl MockLedger {
    pub fn with_account(mut self, eth: &str, native: &str, balance: u64, nonce: u64) -> Self {
        self.native.insert(eth.to_string(), native.to_string());
        self.balances.insert(native.to_string(), balance);
        self.nonces.insert(native.to_string(), nonce);
        self
    }

    pub fn with_block(mut self, block: LedgerBlock) -> Self {
        self.height = self.height.max(block.height);
        self.blocks.push(block);
        self
    }

    pub fn with_transaction(mut self, tx: LedgerTransaction) -> Self {
        self.transactions.insert(tx.hash.clone(), tx);
        self
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| *c == name)
    }

    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }
}

fn not_found(what: &str) -> LedgerError {
    LedgerError::NotFound(what.to_string())
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn native_address(&self, eth_address: &str) -> LedgerResult<String> {
        self.record("native_address");
        self.native
            .get(eth_address)
            .cloned()
            .ok_or_else(|| not_found(eth_address))
    }

    async fn nonce(&self, native_address: &str) -> LedgerResult<u64> {
        self.record("nonce");
        self.nonces
            .get(native_address)
            .copied()
            .ok_or_else(|| not_found(native_address))
    }

    async fn balance(&self, native_address: &str) -> LedgerResult<u64> {
        self.record("balance");
        if let Some(err) = &self.balance_error {
            return Err(err.clone());
        }
        self.balances
            .get(native_address)
            .copied()
            .ok_or_else(|| not_found(native_address))
    }

    async fn send_transaction(&self, transfer: &NativeTransfer) -> LedgerResult<String> {
        self.record("send_transaction");
        self.transfers.lock().unwrap().push(transfer.clone());
        Ok("AB12".to_string())
    }

    async fn send_raw_transaction(&self, eth_from: &str, raw_tx: &str) -> LedgerResult<String> {
        self.record("send_raw_transaction");
        self.raw_sends.lock().unwrap().push(RawSend::Native {
            from: eth_from.to_string(),
            raw: raw_tx.to_string(),
        });
        Ok("cd34".to_string())
    }

    async fn send_raw_contract_transaction(
        &self,
        eth_from: &str,
        raw_tx: &str,
    ) -> LedgerResult<String> {
        self.record("send_raw_contract_transaction");
        self.raw_sends.lock().unwrap().push(RawSend::Contract {
            from: eth_from.to_string(),
            raw: raw_tx.to_string(),
        });
        Ok("ef56".to_string())
    }

    async fn call_contract(
        &self,
        _origin: &str,
        _contract: &str,
        _input: &str,
    ) -> LedgerResult<ContractCall> {
        self.record("call_contract");
        self.contract_call
            .clone()
            .unwrap_or_else(|| Ok(ContractCall::success("")))
    }

    async fn max_block_height(&self) -> LedgerResult<u64> {
        self.record("max_block_height");
        Ok(self.height)
    }

    async fn block_by_hash(&self, hash: &str) -> LedgerResult<LedgerBlock> {
        self.record("block_by_hash");
        self.blocks
            .iter()
            .find(|b| b.hash.eq_ignore_ascii_case(hash))
            .cloned()
            .ok_or_else(|| not_found(hash))
    }

    async fn block_by_number(&self, height: u64) -> LedgerResult<LedgerBlock> {
        self.record("block_by_number");
        self.blocks
            .iter()
            .find(|b| b.height == height)
            .cloned()
            .ok_or_else(|| not_found(&format!("block {}", height)))
    }

    async fn transaction_by_hash(&self, hash: &str) -> LedgerResult<LedgerTransaction> {
        self.record("transaction_by_hash");
        self.transactions
            .get(hash)
            .cloned()
            .ok_or_else(|| not_found(hash))
    }

    async fn code(&self, _address: &str) -> LedgerResult<String> {
        self.record("code");
        Ok(self.code.clone())
    }

    async fn storage_at(&self, address: &str, slot: &str) -> LedgerResult<String> {
        self.record("storage_at");
        self.storage
            .get(&(address.to_string(), slot.to_string()))
            .cloned()
            .ok_or_else(|| not_found(slot))
    }

    async fn transaction_logs(&self, tx_hash: &str) -> LedgerResult<Vec<LedgerLog>> {
        self.record("transaction_logs");
        if let Some(err) = &self.tx_logs_error {
            return Err(err.clone());
        }
        Ok(self.tx_logs.get(tx_hash).cloned().unwrap_or_default())
    }

    async fn logs(&self, query: &LogQuery) -> LedgerResult<Vec<LedgerLog>> {
        self.record("logs");
        self.log_queries.lock().unwrap().push(query.clone());
        if let Some(err) = &self.logs_error {
            return Err(err.clone());
        }
        Ok(self.logs.clone())
    }
}

pub fn mock_gateway(ledger: MockLedger) -> (Gateway, Arc<MockLedger>) {
    let ledger = Arc::new(ledger);
    let gateway = Gateway::new(Config::default(), ledger.clone());
    (gateway, ledger)
}

pub async fn rpc(gateway: &Gateway, method: &str, params: Value) -> Reply {
    let body = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": params,
    });
    gateway.handle(&serde_json::to_vec(&body).unwrap()).await
}

/// The result of a success reply, panicking on anything else.
pub fn result(reply: Reply) -> Value {
    match reply {
        Reply::Success(success) => success.result,
        other => panic!("expected success, got {:?}", other),
    }
}

pub fn raw(reply: Reply) -> String {
    match reply {
        Reply::Raw(message) => message,
        other => panic!("expected raw error, got {:?}", other),
    }
}
