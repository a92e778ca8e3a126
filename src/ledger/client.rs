use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::types::*;
use super::{LedgerClient, LedgerResult};
use crate::error::LedgerError;

/// Error code the ledger RPC uses for a missing address, block or transaction.
pub const NOT_FOUND_CODE: i64 = -32001;

/// Standard JSON-RPC codes for requests the ledger refused to process.
pub const INVALID_REQUEST_CODE: i64 = -32600;
pub const INVALID_PARAMS_CODE: i64 = -32602;

/// `LedgerClient` backed by the ledger's JSON-RPC endpoint.
///
/// `reqwest::Client` pools connections internally, so one instance is
/// shared by every in-flight request.
#[derive(Clone)]
pub struct RemoteLedger {
    http_client: Client,
    rpc_url: String,
    contract_relay: String,
    signer_key: Option<String>,
}

impl RemoteLedger {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            rpc_url: rpc_url.to_string(),
            contract_relay: String::new(),
            signer_key: None,
        }
    }

    /// Relay address handed to the ledger with signed contract calls.
    pub fn with_contract_relay(mut self, relay: &str) -> Self {
        self.contract_relay = relay.to_string();
        self
    }

    /// Key the ledger signs `eth_sendTransaction` transfers with.
    pub fn with_signer_key(mut self, key: Option<String>) -> Self {
        self.signer_key = key;
        self
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn send_request(&self, request: &LedgerRpcRequest) -> LedgerResult<Value> {
        debug!("Sending ledger RPC request: method={}", request.method);

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(request)
            .send()
            .await
            .map_err(|e| LedgerError::Internal(format!("failed to reach ledger RPC: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Ledger RPC returned HTTP {}: {}", status, body);
            return Err(LedgerError::Internal(format!(
                "ledger RPC HTTP error: {} - {}",
                status, body
            )));
        }

        let rpc_response: LedgerRpcResponse = response.json().await.map_err(|e| {
            LedgerError::Internal(format!("failed to parse ledger RPC response: {}", e))
        })?;

        if let Some(err) = rpc_response.error {
            debug!(
                "Ledger RPC error: method={} code={} message={}",
                request.method, err.code, err.message
            );
            return Err(classify(err));
        }

        rpc_response
            .result
            .ok_or_else(|| LedgerError::Internal(format!("no result in {} response", request.method)))
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> LedgerResult<T> {
        let request = LedgerRpcRequest::new(method, Some(params));
        let result = self.send_request(&request).await?;
        serde_json::from_value(result).map_err(|e| {
            LedgerError::Internal(format!("failed to parse {} response: {}", method, e))
        })
    }

    async fn call_logs(&self, method: &str, params: Value) -> LedgerResult<Vec<LedgerLog>> {
        let records: Vec<Value> = self.call(method, params).await?;
        Ok(records
            .into_iter()
            .filter_map(|record| match serde_json::from_value::<LedgerLog>(record) {
                Ok(log) => Some(log),
                Err(e) => {
                    warn!("Skipping malformed log from {}: {}", method, e);
                    None
                }
            })
            .collect())
    }
}

fn classify(err: LedgerRpcError) -> LedgerError {
    let message = match err.data {
        Some(Value::String(data)) if !data.is_empty() => format!("{}: {}", err.message, data),
        _ => err.message,
    };
    match err.code {
        NOT_FOUND_CODE => LedgerError::NotFound(message),
        INVALID_REQUEST_CODE | INVALID_PARAMS_CODE => LedgerError::Invalid(message),
        _ => LedgerError::Internal(message),
    }
}

#[async_trait]
impl LedgerClient for RemoteLedger {
    async fn native_address(&self, eth_address: &str) -> LedgerResult<String> {
        self.call("getNativeAddress", json!({ "address": eth_address }))
            .await
    }

    async fn nonce(&self, native_address: &str) -> LedgerResult<u64> {
        self.call("getNonce", json!({ "address": native_address })).await
    }

    async fn balance(&self, native_address: &str) -> LedgerResult<u64> {
        self.call("getBalance", json!({ "address": native_address }))
            .await
    }

    async fn send_transaction(&self, transfer: &NativeTransfer) -> LedgerResult<String> {
        let key = self.signer_key.as_deref().ok_or_else(|| {
            LedgerError::Invalid("no signer key configured for sendTransaction".to_string())
        })?;
        self.call(
            "sendTransaction",
            json!({
                "from": transfer.from,
                "to": transfer.to,
                "amount": transfer.amount,
                "nonce": transfer.nonce,
                "signerKey": key,
            }),
        )
        .await
    }

    async fn send_raw_transaction(&self, eth_from: &str, raw_tx: &str) -> LedgerResult<String> {
        self.call(
            "sendEthSignedTransaction",
            json!({ "from": eth_from, "rawTransaction": raw_tx }),
        )
        .await
    }

    async fn send_raw_contract_transaction(
        &self,
        eth_from: &str,
        raw_tx: &str,
    ) -> LedgerResult<String> {
        self.call(
            "sendEthSignedContractTransaction",
            json!({
                "from": eth_from,
                "rawTransaction": raw_tx,
                "relay": self.contract_relay,
            }),
        )
        .await
    }

    async fn call_contract(
        &self,
        origin: &str,
        contract: &str,
        input: &str,
    ) -> LedgerResult<ContractCall> {
        self.call(
            "callContract",
            json!({ "origin": origin, "contract": contract, "input": input }),
        )
        .await
    }

    async fn max_block_height(&self) -> LedgerResult<u64> {
        self.call("getMaxBlockNumber", json!({})).await
    }

    async fn block_by_hash(&self, hash: &str) -> LedgerResult<LedgerBlock> {
        self.call("getBlockByHash", json!({ "hash": hash })).await
    }

    async fn block_by_number(&self, height: u64) -> LedgerResult<LedgerBlock> {
        self.call("getBlockByNumber", json!({ "height": height }))
            .await
    }

    async fn transaction_by_hash(&self, hash: &str) -> LedgerResult<LedgerTransaction> {
        self.call("getTransactionByHash", json!({ "hash": hash }))
            .await
    }

    async fn code(&self, address: &str) -> LedgerResult<String> {
        self.call("getCode", json!({ "address": address })).await
    }

    async fn storage_at(&self, address: &str, slot: &str) -> LedgerResult<String> {
        self.call("getStorageAt", json!({ "address": address, "slot": slot }))
            .await
    }

    async fn transaction_logs(&self, tx_hash: &str) -> LedgerResult<Vec<LedgerLog>> {
        self.call_logs("getEvmLogs", json!({ "hash": tx_hash })).await
    }

    async fn logs(&self, query: &LogQuery) -> LedgerResult<Vec<LedgerLog>> {
        let params = serde_json::to_value(query).map_err(|e| {
            LedgerError::Internal(format!("failed to serialize getLogs params: {}", e))
        })?;
        self.call_logs("getLogs", params).await
    }
}
