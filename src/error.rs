//! Error types for the translation engine.
//!
//! Everything here renders through `Display`, because most failures leave
//! the gateway as a raw error string in the HTTP body rather than as a
//! JSON-RPC error object (see [`crate::jsonrpc::Reply`]).

use thiserror::Error;

/// Malformed request envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("{0}")]
    Json(String),

    #[error("'{0}' not exist")]
    Missing(&'static str),

    #[error("'{0}' is not a string")]
    NotAString(&'static str),
}

/// Failure to turn the `params` member of a request into a typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("'params' not exist")]
    MissingParams,

    #[error("{method}: params is wrong!")]
    NotASequence { method: String },

    #[error("{method}: expected at least {expected} params, got {actual}")]
    TooShort {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("{method}: param {index} is not an object")]
    NotAMapping { method: String, index: usize },

    #[error("{method}: param {index} is not a string")]
    NotAString { method: String, index: usize },

    #[error("{method}: {reason}")]
    Field { method: String, reason: String },
}

/// Failure to parse a hex quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("invalid hex quantity {0:?}")]
    InvalidHex(String),

    #[error("hex quantity {0:?} overflows 64 bits")]
    Overflow(String),

    #[error("amount {0} does not fit a native balance")]
    NativeOverflow(String),

    #[error("value {0} wei is not a whole number of native units")]
    SubUnit(String),
}

/// Failure to extract a revert reason from a contract-call failure blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RevertError {
    #[error("revert payload is not valid hex")]
    InvalidHex,

    #[error("revert payload truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },
}

/// Typed backend failure returned by every [`crate::ledger::LedgerClient`] call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The queried address, block or transaction does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The backend rejected the request.
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Transport failure or internal backend failure.
    #[error("ledger error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

/// Failure to decode a signed raw transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawTxError {
    #[error("raw transaction is not valid hex: {0}")]
    Hex(String),

    #[error("raw transaction RLP error: {0}")]
    Rlp(String),

    #[error("unsupported transaction type 0x{0:02x}")]
    UnsupportedType(u8),

    #[error("unexpected RLP item count {0}")]
    ItemCount(usize),

    #[error("invalid signature: {0}")]
    Signature(String),
}

/// Umbrella error for method handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Quantity(#[from] QuantityError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    RawTransaction(#[from] RawTxError),

    #[error("marshal error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_is_transparent() {
        let err: GatewayError = LedgerError::NotFound("block 7".into()).into();
        assert_eq!(err.to_string(), "not found: block 7");

        let err: GatewayError = DecodeError::MissingParams.into();
        assert_eq!(err.to_string(), "'params' not exist");
    }

    #[test]
    fn test_not_found_tag() {
        assert!(LedgerError::NotFound("x".into()).is_not_found());
        assert!(!LedgerError::Internal("x".into()).is_not_found());
    }
}
