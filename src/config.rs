use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Log filter used when `RUST_LOG` is unset. `RUST_LOG` itself is read by
/// the subscriber, not by [`Config`].
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Gateway configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger JSON-RPC endpoint URL
    pub ledger_rpc_url: String,
    /// Address the HTTP listener binds to
    pub listen_addr: SocketAddr,
    /// Returned verbatim by eth_chainId
    pub chain_id: String,
    /// Returned verbatim by net_version
    pub network_id: String,
    /// Relay address for Ethereum-signed contract transactions
    pub contract_relay: String,
    /// Key the ledger signs eth_sendTransaction transfers with
    pub signer_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ledger_rpc_url: "http://127.0.0.1:8546".to_string(),
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8545)),
            chain_id: "0x22b8".to_string(),
            network_id: "8888".to_string(),
            contract_relay: String::new(),
            signer_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    /// Call dotenvy::dotenv() before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let ledger_rpc_url = lookup("LEDGER_RPC_URL").unwrap_or(defaults.ledger_rpc_url);

        let listen_addr: SocketAddr = match lookup("GATEWAY_LISTEN_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("GATEWAY_LISTEN_ADDR must be a socket address, got {:?}", addr))?,
            None => defaults.listen_addr,
        };

        let chain_id = lookup("GATEWAY_CHAIN_ID").unwrap_or(defaults.chain_id);
        let network_id = lookup("GATEWAY_NETWORK_ID").unwrap_or(defaults.network_id);

        let contract_relay = lookup("LEDGER_CONTRACT_RELAY").unwrap_or_default();

        let signer_key = lookup("LEDGER_SIGNER_KEY").filter(|key| !key.is_empty());

        Ok(Config {
            ledger_rpc_url,
            listen_addr,
            chain_id,
            network_id,
            contract_relay,
            signer_key,
        })
    }
}
