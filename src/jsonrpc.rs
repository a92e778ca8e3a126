//! JSON-RPC 2.0 wire envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An incoming request after envelope validation.
///
/// `id` is echoed verbatim; it may be a number, a string or null.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcRequest {
    pub method: String,
    pub jsonrpc: String,
    pub id: Value,
    /// `None` when the request carried no `params` member.
    pub params: Option<Value>,
}

/// Successful response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcSuccess {
    pub jsonrpc: String,
    pub id: Value,
    pub result: Value,
}

/// Error object carried by [`RpcError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: i64,
    pub message: String,
    pub data: String,
}

/// Error response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub jsonrpc: String,
    pub id: Value,
    pub error: ErrorBody,
}

/// What a handler hands back to the dispatcher.
///
/// Envelope errors, decode errors and most backend errors are written as a
/// raw string, not as a JSON-RPC error object. Only failed `eth_call` and
/// `eth_estimateGas` produce [`Reply::Error`]. Existing callers depend on
/// this split, so it is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Success(RpcSuccess),
    Error(RpcError),
    Raw(String),
}

impl Reply {
    pub fn success(request: &RpcRequest, result: impl Into<Value>) -> Self {
        Reply::Success(RpcSuccess {
            jsonrpc: request.jsonrpc.clone(),
            id: request.id.clone(),
            result: result.into(),
        })
    }

    pub fn error(request: &RpcRequest, error: ErrorBody) -> Self {
        Reply::Error(RpcError {
            jsonrpc: request.jsonrpc.clone(),
            id: request.id.clone(),
            error,
        })
    }

    pub fn raw(message: impl ToString) -> Self {
        Reply::Raw(message.to_string())
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Reply::Raw(_))
    }

    /// Bytes for the HTTP response body.
    pub fn into_body(self) -> Vec<u8> {
        let encoded = match &self {
            Reply::Success(success) => serde_json::to_vec(success),
            Reply::Error(err) => serde_json::to_vec(err),
            Reply::Raw(message) => return message.clone().into_bytes(),
        };
        encoded.unwrap_or_else(|e| e.to_string().into_bytes())
    }
}
