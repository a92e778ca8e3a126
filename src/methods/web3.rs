use serde_json::Value;
use tracing::debug;

use crate::error::GatewayResult;

/// Handler for web3_clientVersion
/// Returns the client version string.
pub async fn client_version() -> GatewayResult<Value> {
    let version = format!("eth-gateway/v{}", env!("CARGO_PKG_VERSION"));
    debug!("web3_clientVersion -> {}", version);
    Ok(Value::String(version))
}
