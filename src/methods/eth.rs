use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::emulator::{Block, BlockTag, LogEntry, Transaction, TransactionReceipt};
use crate::error::GatewayResult;
use crate::jsonrpc::{Reply, RpcRequest};
use crate::ledger::{ContractCall, LedgerClient, LedgerResult, LogQuery, NativeTransfer};
use crate::translator::params::{
    decode_first, first_string, CallParams, LogFilterParams, StorageQuery,
};
use crate::translator::rawtx::decode_raw_transaction_hex;
use crate::translator::revert::call_failure;
use crate::translator::units::{
    ensure_0x_prefix, hash_hex, quantity, rescale_balance, strip_0x, wei_to_native,
    SYNTHETIC_GAS, TRANSFER_GAS,
};

/// Result of `eth_signTransaction`. The gateway holds no keys.
pub const SIGN_UNSUPPORTED: &str = "unsupported: eth_signTransaction needs a client-side signer";

/// Handler for eth_chainId
pub async fn chain_id(config: &Config) -> GatewayResult<Value> {
    debug!("eth_chainId -> {}", config.chain_id);
    Ok(Value::String(config.chain_id.clone()))
}

/// Handler for eth_blockNumber
pub async fn block_number(ledger: &dyn LedgerClient) -> GatewayResult<Value> {
    let height = ledger.max_block_height().await?;
    debug!("eth_blockNumber -> {}", height);
    Ok(Value::String(quantity(height)))
}

/// Handler for eth_gasPrice
pub async fn gas_price() -> GatewayResult<Value> {
    Ok(Value::String(quantity(TRANSFER_GAS)))
}

/// Handler for eth_getBalance
///
/// Unknown addresses read as a zero balance.
pub async fn get_balance(ledger: &dyn LedgerClient, params: Option<&Value>) -> GatewayResult<Value> {
    let address = first_string("eth_getBalance", params)?;

    let balance = match native_balance(ledger, &address).await {
        Ok(balance) => balance,
        Err(e) if e.is_not_found() => {
            debug!("eth_getBalance: {} unknown to ledger, reporting 0", address);
            return Ok(Value::String("0x0".to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    debug!("eth_getBalance: address={}, native={}", address, balance);
    Ok(Value::String(format!("0x{}", rescale_balance(balance))))
}

async fn native_balance(ledger: &dyn LedgerClient, address: &str) -> LedgerResult<u64> {
    let native = ledger.native_address(address).await?;
    ledger.balance(&native).await
}

async fn native_nonce(ledger: &dyn LedgerClient, address: &str) -> LedgerResult<u64> {
    let native = ledger.native_address(address).await?;
    ledger.nonce(&native).await
}

/// Handler for eth_getTransactionCount
pub async fn get_transaction_count(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let address = first_string("eth_getTransactionCount", params)?;
    let nonce = native_nonce(ledger, &address).await?;
    debug!("eth_getTransactionCount: address={}, nonce={}", address, nonce);
    Ok(Value::String(quantity(nonce)))
}

/// Handler for eth_getCode
pub async fn get_code(ledger: &dyn LedgerClient, params: Option<&Value>) -> GatewayResult<Value> {
    let address = first_string("eth_getCode", params)?;
    let code = ledger.code(&address).await?;
    Ok(Value::String(ensure_0x_prefix(&code)))
}

/// Handler for eth_getStorageAt
pub async fn get_storage_at(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let query = StorageQuery::decode("eth_getStorageAt", params)?;
    let value = ledger.storage_at(&query.address, &query.slot).await?;
    Ok(Value::String(ensure_0x_prefix(&value)))
}

/// Handler for eth_getBlockByHash
pub async fn get_block_by_hash(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let hash = first_string("eth_getBlockByHash", params)?;
    let block = ledger.block_by_hash(strip_0x(&hash)).await?;
    to_value(&Block::from_ledger(&block))
}

/// Handler for eth_getBlockByNumber
pub async fn get_block_by_number(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let block_param = first_string("eth_getBlockByNumber", params)?;
    let tag = BlockTag::parse(&block_param)?;
    let height = resolve(ledger, &[tag]).await?;
    let target = tag.height(height);

    debug!("eth_getBlockByNumber: param={}, target={}", block_param, target);

    let block = ledger.block_by_number(target).await?;
    to_value(&Block::from_ledger(&block))
}

/// Fetch the ledger tip only when one of the tags refers to it.
async fn resolve(ledger: &dyn LedgerClient, tags: &[BlockTag]) -> LedgerResult<u64> {
    if tags.iter().any(|tag| tag.needs_tip()) {
        ledger.max_block_height().await
    } else {
        Ok(0)
    }
}

/// Handler for eth_getTransactionByHash
pub async fn get_transaction_by_hash(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let hash = first_string("eth_getTransactionByHash", params)?;
    let tx = ledger.transaction_by_hash(strip_0x(&hash)).await?;
    let block = ledger.block_by_number(tx.block_number).await?;

    let nonce = match native_nonce(ledger, &tx.eth_from).await {
        Ok(nonce) => Some(nonce),
        Err(e) => {
            warn!("eth_getTransactionByHash: nonce lookup for {} failed: {}", tx.eth_from, e);
            None
        }
    };

    to_value(&Transaction::from_ledger(&tx, &block, nonce))
}

/// Handler for eth_getTransactionReceipt
pub async fn get_transaction_receipt(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let hash = first_string("eth_getTransactionReceipt", params)?;
    let tx = ledger.transaction_by_hash(strip_0x(&hash)).await?;
    let block = ledger.block_by_number(tx.block_number).await?;

    // Only contract transactions emit logs.
    let logs = if tx.evm.is_some() {
        ledger
            .transaction_logs(strip_0x(&tx.hash))
            .await
            .unwrap_or_else(|e| {
                warn!("eth_getTransactionReceipt: log lookup for {} failed: {}", tx.hash, e);
                Vec::new()
            })
    } else {
        Vec::new()
    };

    let receipt = TransactionReceipt::from_ledger(&tx, &block, &logs);
    debug!(
        "eth_getTransactionReceipt: hash={}, status={}, logs={}",
        receipt.transaction_hash,
        receipt.status,
        receipt.logs.len()
    );
    to_value(&receipt)
}

/// Handler for eth_getLogs
///
/// The block range is only forwarded when both ends are given; otherwise
/// the ledger receives a zero range and applies its own default.
pub async fn get_logs(ledger: &dyn LedgerClient, params: Option<&Value>) -> GatewayResult<Value> {
    let filter: LogFilterParams = decode_first("eth_getLogs", params)?;

    let (from_block, to_block) = if !filter.from_block.is_empty() && !filter.to_block.is_empty() {
        let from = BlockTag::parse(&filter.from_block)?;
        let to = BlockTag::parse(&filter.to_block)?;
        let tip = resolve(ledger, &[from, to]).await?;
        (from.height(tip), to.height(tip))
    } else {
        (0, 0)
    };

    let query = LogQuery {
        address: filter.address,
        from_block,
        to_block,
        topics: filter.topics,
        block_hash: strip_0x(&filter.block_hash).to_string(),
    };
    debug!("eth_getLogs: {:?}", query);

    let logs = ledger.logs(&query).await?;
    let entries: Vec<LogEntry> = logs.iter().map(LogEntry::from_ledger).collect();
    to_value(&entries)
}

/// Handler for eth_sendTransaction
///
/// Looks up both native addresses and the sender's nonce, then submits a
/// native transfer of `value`. `value` is in wei and must convert to a whole
/// number of native units.
pub async fn send_transaction(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let call: CallParams = decode_first("eth_sendTransaction", params)?;
    let amount = wei_to_native(&call.value)?;

    let from = ledger.native_address(&call.from).await?;
    let to = ledger.native_address(&call.to).await?;
    let nonce = ledger.nonce(&from).await?;

    let transfer = NativeTransfer {
        from,
        to,
        amount,
        nonce,
    };
    let hash = ledger.send_transaction(&transfer).await?;

    info!(
        "eth_sendTransaction: {} -> {} amount={} hash={}",
        call.from, call.to, amount, hash
    );
    Ok(Value::String(hash_hex(&hash)))
}

/// Handler for eth_sendRawTransaction
pub async fn send_raw_transaction(
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> GatewayResult<Value> {
    let raw_tx = first_string("eth_sendRawTransaction", params)?;
    let decoded = decode_raw_transaction_hex(&raw_tx)?;
    let sender = decoded.sender.to_checksum(None);
    let raw_tx = ensure_0x_prefix(&raw_tx);

    let hash = if decoded.is_contract_call() {
        ledger.send_raw_contract_transaction(&sender, &raw_tx).await?
    } else {
        ledger.send_raw_transaction(&sender, &raw_tx).await?
    };

    info!(
        "eth_sendRawTransaction: sender={}, contract_call={}, hash={}",
        sender,
        decoded.is_contract_call(),
        hash
    );
    Ok(Value::String(hash_hex(&hash)))
}

/// Handler for eth_call
pub async fn call(
    request: &RpcRequest,
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> Reply {
    let call: CallParams = match decode_first("eth_call", params) {
        Ok(call) => call,
        Err(e) => return Reply::raw(e),
    };
    debug!("eth_call: from={}, to={}", call.from, call.to);

    let outcome = ledger
        .call_contract(&call.from, &call.to, call.calldata())
        .await;
    contract_reply(request, outcome, |output| ensure_0x_prefix(&output))
}

/// Handler for eth_estimateGas
///
/// Gas is not metered; a call that succeeds is quoted the synthetic figure.
pub async fn estimate_gas(
    request: &RpcRequest,
    ledger: &dyn LedgerClient,
    params: Option<&Value>,
) -> Reply {
    let call: CallParams = match decode_first("eth_estimateGas", params) {
        Ok(call) => call,
        Err(e) => return Reply::raw(e),
    };

    if call.to.is_empty() {
        return Reply::success(request, quantity(SYNTHETIC_GAS));
    }

    let outcome = ledger
        .call_contract(&call.from, &call.to, call.calldata())
        .await;
    contract_reply(request, outcome, |_| quantity(SYNTHETIC_GAS))
}

/// Turn a contract call outcome into a reply: a failure with no output is a
/// raw error, a failure with output is a -4677 error carrying the revert
/// reason, anything else is a success.
fn contract_reply<F>(request: &RpcRequest, outcome: LedgerResult<ContractCall>, on_success: F) -> Reply
where
    F: FnOnce(String) -> String,
{
    match outcome {
        Err(e) => {
            error!("{} error: {}", request.method, e);
            Reply::raw(e)
        }
        Ok(call) => match call.failure() {
            Some(failure) if call.output.is_empty() => {
                error!("{} failed without output: {}", request.method, failure);
                Reply::raw(failure)
            }
            Some(failure) => {
                debug!("{} reverted: {}", request.method, failure);
                Reply::error(request, call_failure(failure, &call.output))
            }
            None => Reply::success(request, on_success(call.output)),
        },
    }
}

/// Handler for eth_signTransaction
pub async fn sign_transaction(params: Option<&Value>) -> GatewayResult<Value> {
    let call: CallParams = decode_first("eth_signTransaction", params)?;
    debug!("eth_signTransaction: from={} (unsupported)", call.from);
    Ok(Value::String(SIGN_UNSUPPORTED.to_string()))
}

fn to_value<T: serde::Serialize>(value: &T) -> GatewayResult<Value> {
    Ok(serde_json::to_value(value)?)
}
