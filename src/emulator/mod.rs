//! Ethereum-shaped objects synthesized from ledger data.

pub mod block;
pub mod logs;
pub mod receipt;

pub use block::{Block, BlockTag, ZERO_ADDRESS};
pub use logs::{bloom_hex, logs_bloom, LogEntry};
pub use receipt::{Transaction, TransactionReceipt};
