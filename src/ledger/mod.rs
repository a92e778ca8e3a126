//! The backend ledger as seen by the translation engine.
//!
//! [`LedgerClient`] is the only seam between the engine and the ledger.
//! Each method is one backend round trip. Implementations must be usable
//! from many in-flight requests at once; any pooling lives behind this trait.

pub mod client;
pub mod types;

use async_trait::async_trait;

use crate::error::LedgerError;

pub use client::RemoteLedger;
pub use types::{
    ContractCall, EvmExecution, LedgerBlock, LedgerLog, LedgerTransaction, LogQuery,
    NativeTransfer,
};

pub type LedgerResult<T> = Result<T, LedgerError>;

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Map an Ethereum address to the ledger's native address.
    async fn native_address(&self, eth_address: &str) -> LedgerResult<String>;

    /// Next nonce of a native address.
    async fn nonce(&self, native_address: &str) -> LedgerResult<u64>;

    /// Balance of a native address, in native units.
    async fn balance(&self, native_address: &str) -> LedgerResult<u64>;

    /// Submit a native transfer signed by the ledger client. Returns the transaction hash.
    async fn send_transaction(&self, transfer: &NativeTransfer) -> LedgerResult<String>;

    /// Submit an Ethereum-signed plain transfer.
    async fn send_raw_transaction(&self, eth_from: &str, raw_tx: &str) -> LedgerResult<String>;

    /// Submit an Ethereum-signed transaction that carries calldata.
    async fn send_raw_contract_transaction(
        &self,
        eth_from: &str,
        raw_tx: &str,
    ) -> LedgerResult<String>;

    /// Execute a contract call without creating a transaction.
    async fn call_contract(
        &self,
        origin: &str,
        contract: &str,
        input: &str,
    ) -> LedgerResult<ContractCall>;

    async fn max_block_height(&self) -> LedgerResult<u64>;

    async fn block_by_hash(&self, hash: &str) -> LedgerResult<LedgerBlock>;

    async fn block_by_number(&self, height: u64) -> LedgerResult<LedgerBlock>;

    async fn transaction_by_hash(&self, hash: &str) -> LedgerResult<LedgerTransaction>;

    /// Contract bytecode as hex.
    async fn code(&self, address: &str) -> LedgerResult<String>;

    async fn storage_at(&self, address: &str, slot: &str) -> LedgerResult<String>;

    /// Logs emitted by one transaction.
    async fn transaction_logs(&self, tx_hash: &str) -> LedgerResult<Vec<LedgerLog>>;

    /// Logs matching a filter.
    async fn logs(&self, query: &LogQuery) -> LedgerResult<Vec<LedgerLog>>;
}
