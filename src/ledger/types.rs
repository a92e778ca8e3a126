use ethereum_types::{H160, H256, U64};
use serde::{Deserialize, Serialize};

/// JSON-RPC request to the ledger RPC
#[derive(Debug, Serialize)]
pub struct LedgerRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl LedgerRpcRequest {
    pub fn new(method: &str, params: Option<serde_json::Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: 1,
            method: method.to_string(),
            params,
        }
    }
}

/// JSON-RPC response from the ledger RPC
#[derive(Debug, Deserialize)]
pub struct LedgerRpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<LedgerRpcError>,
}

/// JSON-RPC error from the ledger RPC
#[derive(Debug, Deserialize)]
pub struct LedgerRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// A ledger block. Hashes are hex, with or without `0x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerBlock {
    pub hash: String,
    pub prev_hash: String,
    pub height: u64,
    pub timestamp: u64,
}

/// Contract execution attached to a ledger transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvmExecution {
    /// `create` or `call`, any case
    pub operation: String,
    pub contract_address: String,
    pub status: bool,
    pub input: String,
}

impl EvmExecution {
    pub fn is_create(&self) -> bool {
        self.operation.eq_ignore_ascii_case("create")
    }
}

/// A ledger transaction as seen from the Ethereum side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTransaction {
    pub hash: String,
    pub block_number: u64,
    /// Ethereum form of the sender
    pub eth_from: String,
    /// Ethereum form of the recipient
    #[serde(default)]
    pub eth_to: String,
    /// Native amount transferred
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub evm: Option<EvmExecution>,
}

/// An EVM log record kept by the ledger, in go-ethereum's JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerLog {
    pub address: H160,
    pub topics: Vec<H256>,
    /// Hex, `0x`-prefixed
    pub data: String,
    pub block_number: U64,
    pub transaction_hash: H256,
    pub transaction_index: U64,
    pub block_hash: H256,
    pub log_index: U64,
    pub removed: bool,
}

/// Output of a contract call. A non-empty `failure` means the call failed;
/// `output` may still carry the revert payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContractCall {
    /// Hex return data, no `0x`
    pub output: String,
    pub failure: Option<String>,
}

impl ContractCall {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            failure: None,
        }
    }

    pub fn failed(output: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            failure: Some(failure.into()),
        }
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref().filter(|msg| !msg.is_empty())
    }
}

/// A native-unit transfer between two native addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTransfer {
    pub from: String,
    pub to: String,
    pub amount: u64,
    pub nonce: u64,
}

/// Filter for the ledger's log query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogQuery {
    pub address: String,
    pub from_block: u64,
    pub to_block: u64,
    pub topics: Vec<String>,
    pub block_hash: String,
}
