use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::GatewayResult;

/// Handler for net_version
/// Returns the configured network id as-is.
pub async fn version(config: &Config) -> GatewayResult<Value> {
    debug!("net_version -> {}", config.network_id);
    Ok(Value::String(config.network_id.clone()))
}
