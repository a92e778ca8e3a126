//! Ethereum JSON-RPC gateway
//!
//! This crate accepts the Ethereum JSON-RPC calls wallets make (eth_*,
//! net_*, web3_*) and answers them from a ledger that speaks its own RPC.
//! Integers become hex quantities, balances are rescaled from the ledger's
//! 11 decimals to wei, and blocks, receipts and logs are synthesized in
//! Ethereum's shape.
//!
//! # Architecture
//!
//! ```text
//! Wallet (MetaMask/ethers.js)
//!     |
//!     | eth_* JSON-RPC over HTTP
//!     v
//! server -> dispatcher -> methods (translator, emulator)
//!     |
//!     | LedgerClient calls
//!     v
//! Ledger RPC
//! ```
//!
//! Envelope errors, params errors and most ledger errors are written to the
//! HTTP body as plain strings rather than JSON-RPC error objects. Only
//! `eth_call` and `eth_estimateGas` return error objects. Integrators
//! relying on a uniform error shape should be aware of this.
//!
//! # Modules
//!
//! - `config` - Environment and configuration management
//! - `dispatcher` - Envelope parsing and method routing
//! - `jsonrpc` - Response envelopes
//! - `methods` - Individual RPC method implementations (eth, net, web3)
//! - `translator` - Units, params, revert reasons, raw transactions
//! - `emulator` - Block/receipt/log synthesis
//! - `ledger` - Ledger client trait and its JSON-RPC implementation
//! - `server` - HTTP listener

pub mod config;
pub mod dispatcher;
pub mod emulator;
pub mod error;
pub mod jsonrpc;
pub mod ledger;
pub mod methods;
pub mod server;
pub mod translator;
