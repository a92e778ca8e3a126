//! Translation between Ethereum wire values and ledger values.

pub mod params;
pub mod rawtx;
pub mod revert;
pub mod units;
