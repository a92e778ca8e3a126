use ethereum_types::{Bloom, BloomInput};
use serde::{Deserialize, Serialize};

use crate::ledger::LedgerLog;
use crate::translator::units::{ensure_0x_prefix, quantity};

/// EVM log entry as returned by `eth_getLogs` and inside receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: String,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: String,
    pub transaction_hash: String,
    pub transaction_index: String,
    pub block_hash: String,
    pub log_index: String,
    pub removed: bool,
}

impl LogEntry {
    /// Convert a ledger log record one-for-one.
    pub fn from_ledger(log: &LedgerLog) -> Self {
        Self {
            address: format!("{:#x}", log.address),
            topics: log.topics.iter().map(|t| format!("{:#x}", t)).collect(),
            data: ensure_0x_prefix(&log.data.to_ascii_lowercase()),
            block_number: quantity(log.block_number.as_u64()),
            transaction_hash: format!("{:#x}", log.transaction_hash),
            transaction_index: quantity(log.transaction_index.as_u64()),
            block_hash: format!("{:#x}", log.block_hash),
            log_index: quantity(log.log_index.as_u64()),
            removed: log.removed,
        }
    }
}

/// Bloom over the address and every topic of every log.
///
/// Bits are OR-accumulated, so the result does not depend on log order.
pub fn logs_bloom(logs: &[LedgerLog]) -> Bloom {
    let mut bloom = Bloom::default();
    for log in logs {
        bloom.accrue(BloomInput::Raw(log.address.as_bytes()));
        for topic in &log.topics {
            bloom.accrue(BloomInput::Raw(topic.as_bytes()));
        }
    }
    bloom
}

/// `0x`-prefixed 512-digit hex of a bloom.
pub fn bloom_hex(bloom: &Bloom) -> String {
    format!("{:#x}", bloom)
}
