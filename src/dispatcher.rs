//! Request dispatch: envelope validation and the method routing table.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{EnvelopeError, GatewayResult};
use crate::jsonrpc::{Reply, RpcRequest};
use crate::ledger::LedgerClient;
use crate::methods::{eth, net, web3};

/// Every method the gateway answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    ChainId,
    NetVersion,
    BlockNumber,
    GasPrice,
    ClientVersion,
    GetBalance,
    GetTransactionCount,
    GetCode,
    GetStorageAt,
    GetBlockByHash,
    GetBlockByNumber,
    GetTransactionByHash,
    GetTransactionReceipt,
    GetLogs,
    SendTransaction,
    SendRawTransaction,
    Call,
    EstimateGas,
    SignTransaction,
}

impl Method {
    pub const ALL: [Method; 19] = [
        Method::ChainId,
        Method::NetVersion,
        Method::BlockNumber,
        Method::GasPrice,
        Method::ClientVersion,
        Method::GetBalance,
        Method::GetTransactionCount,
        Method::GetCode,
        Method::GetStorageAt,
        Method::GetBlockByHash,
        Method::GetBlockByNumber,
        Method::GetTransactionByHash,
        Method::GetTransactionReceipt,
        Method::GetLogs,
        Method::SendTransaction,
        Method::SendRawTransaction,
        Method::Call,
        Method::EstimateGas,
        Method::SignTransaction,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::ChainId => "eth_chainId",
            Method::NetVersion => "net_version",
            Method::BlockNumber => "eth_blockNumber",
            Method::GasPrice => "eth_gasPrice",
            Method::ClientVersion => "web3_clientVersion",
            Method::GetBalance => "eth_getBalance",
            Method::GetTransactionCount => "eth_getTransactionCount",
            Method::GetCode => "eth_getCode",
            Method::GetStorageAt => "eth_getStorageAt",
            Method::GetBlockByHash => "eth_getBlockByHash",
            Method::GetBlockByNumber => "eth_getBlockByNumber",
            Method::GetTransactionByHash => "eth_getTransactionByHash",
            Method::GetTransactionReceipt => "eth_getTransactionReceipt",
            Method::GetLogs => "eth_getLogs",
            Method::SendTransaction => "eth_sendTransaction",
            Method::SendRawTransaction => "eth_sendRawTransaction",
            Method::Call => "eth_call",
            Method::EstimateGas => "eth_estimateGas",
            Method::SignTransaction => "eth_signTransaction",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a method the gateway does not serve.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupport method:{0}")]
pub struct UnknownMethod(pub String);

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| UnknownMethod(s.to_string()))
    }
}

/// Validate the request envelope.
///
/// `method` and `jsonrpc` must be strings; `id` must be present but may be
/// any JSON value, including null.
pub fn parse_envelope(body: &[u8]) -> Result<RpcRequest, EnvelopeError> {
    let mut object: Map<String, Value> =
        serde_json::from_slice(body).map_err(|e| EnvelopeError::Json(e.to_string()))?;

    let method = string_member(&object, "method")?;
    let jsonrpc = string_member(&object, "jsonrpc")?;
    let id = object.remove("id").ok_or(EnvelopeError::Missing("id"))?;
    let params = object.remove("params");

    Ok(RpcRequest {
        method,
        jsonrpc,
        id,
        params,
    })
}

fn string_member(object: &Map<String, Value>, key: &'static str) -> Result<String, EnvelopeError> {
    match object.get(key) {
        None => Err(EnvelopeError::Missing(key)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(EnvelopeError::NotAString(key)),
    }
}

/// The translation engine: immutable configuration plus a ledger handle.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<Config>,
    ledger: Arc<dyn LedgerClient>,
}

impl Gateway {
    pub fn new(config: Config, ledger: Arc<dyn LedgerClient>) -> Self {
        Self {
            config: Arc::new(config),
            ledger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle one raw request body.
    pub async fn handle(&self, body: &[u8]) -> Reply {
        let request = match parse_envelope(body) {
            Ok(request) => request,
            Err(e) => {
                debug!("rejecting request envelope: {}", e);
                return Reply::raw(e);
            }
        };

        let method = match request.method.parse::<Method>() {
            Ok(method) => method,
            Err(e) => {
                error!("{}", e);
                return Reply::raw(e);
            }
        };

        debug!("method={} jsonrpc={} id={}", method, request.jsonrpc, request.id);
        self.dispatch(method, &request).await
    }

    async fn dispatch(&self, method: Method, request: &RpcRequest) -> Reply {
        let ledger = self.ledger.as_ref();
        let params = request.params.as_ref();

        let result: GatewayResult<Value> = match method {
            Method::ChainId => eth::chain_id(&self.config).await,
            Method::NetVersion => net::version(&self.config).await,
            Method::BlockNumber => eth::block_number(ledger).await,
            Method::GasPrice => eth::gas_price().await,
            Method::ClientVersion => web3::client_version().await,
            Method::GetBalance => eth::get_balance(ledger, params).await,
            Method::GetTransactionCount => eth::get_transaction_count(ledger, params).await,
            Method::GetCode => eth::get_code(ledger, params).await,
            Method::GetStorageAt => eth::get_storage_at(ledger, params).await,
            Method::GetBlockByHash => eth::get_block_by_hash(ledger, params).await,
            Method::GetBlockByNumber => eth::get_block_by_number(ledger, params).await,
            Method::GetTransactionByHash => eth::get_transaction_by_hash(ledger, params).await,
            Method::GetTransactionReceipt => eth::get_transaction_receipt(ledger, params).await,
            Method::GetLogs => eth::get_logs(ledger, params).await,
            Method::SendTransaction => eth::send_transaction(ledger, params).await,
            Method::SendRawTransaction => eth::send_raw_transaction(ledger, params).await,
            Method::SignTransaction => eth::sign_transaction(params).await,
            Method::Call => return eth::call(request, ledger, params).await,
            Method::EstimateGas => return eth::estimate_gas(request, ledger, params).await,
        };

        match result {
            Ok(value) => Reply::success(request, value),
            Err(e) => {
                error!("{} error: {}", method, e);
                Reply::raw(e)
            }
        }
    }
}
