use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::QuantityError;
use crate::ledger::LedgerBlock;
use crate::translator::units::{hash_hex, hex_to_uint, quantity, SYNTHETIC_GAS};

/// The zero address, reported as every block's miner.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// keccak256 of the RLP of an empty list.
const EMPTY_UNCLES_HASH: &str =
    "0x1dcc4de8dec75d7aab85b567b6ccd41ad312451b948a7413f0a142fd40d49347";

/// Root of an empty Merkle-Patricia trie.
const EMPTY_TRIE_ROOT: &str =
    "0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421";

/// EVM-formatted block object.
/// Only hash, parent hash, number and timestamp come from the ledger;
/// everything else is a fixed placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    /// Not used by the ledger, always zero
    pub nonce: String,
    pub sha3_uncles: String,
    pub logs_bloom: String,
    pub transactions_root: String,
    pub state_root: String,
    pub receipts_root: String,
    /// The ledger has no block producer address
    pub miner: String,
    pub difficulty: String,
    pub total_difficulty: String,
    pub extra_data: String,
    pub size: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub transactions: Vec<String>,
    pub uncles: Vec<String>,
    pub mix_hash: String,
}

impl Block {
    /// Create an EVM block from ledger block data.
    pub fn from_ledger(block: &LedgerBlock) -> Self {
        let number = quantity(block.height);
        let timestamp = quantity(block.timestamp);

        debug!("Created EVM block: number={}, timestamp={}", number, timestamp);

        Block {
            number,
            hash: hash_hex(&block.hash),
            parent_hash: hash_hex(&block.prev_hash),
            nonce: "0x0000000000000000".to_string(),
            sha3_uncles: EMPTY_UNCLES_HASH.to_string(),
            logs_bloom: format!("0x{}", "0".repeat(512)),
            transactions_root: EMPTY_TRIE_ROOT.to_string(),
            state_root: EMPTY_TRIE_ROOT.to_string(),
            receipts_root: EMPTY_TRIE_ROOT.to_string(),
            miner: ZERO_ADDRESS.to_string(),
            difficulty: "0x0".to_string(),
            total_difficulty: "0x0".to_string(),
            extra_data: "0x".to_string(),
            size: "0x0".to_string(),
            gas_limit: quantity(SYNTHETIC_GAS),
            gas_used: "0x0".to_string(),
            timestamp,
            transactions: Vec::new(),
            uncles: Vec::new(),
            mix_hash: format!("0x{}", "0".repeat(64)),
        }
    }
}

/// A block parameter as sent by wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockTag {
    /// `latest`, `safe`, `finalized` and `pending`: the ledger's tip.
    Latest,
    Earliest,
    Number(u64),
}

impl BlockTag {
    /// Parse an EVM block number parameter.
    /// Handles "latest", "earliest", "pending", "safe", "finalized", and hex numbers.
    pub fn parse(block_param: &str) -> Result<Self, QuantityError> {
        match block_param {
            "latest" | "safe" | "finalized" | "pending" => Ok(BlockTag::Latest),
            "earliest" => Ok(BlockTag::Earliest),
            hex_str => hex_to_uint(hex_str).map(BlockTag::Number),
        }
    }

    /// Height for this tag, given the ledger's tip.
    pub fn height(self, latest: u64) -> u64 {
        match self {
            BlockTag::Latest => latest,
            BlockTag::Earliest => 0,
            BlockTag::Number(n) => n,
        }
    }

    pub fn needs_tip(self) -> bool {
        matches!(self, BlockTag::Latest)
    }
}
