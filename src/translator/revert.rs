//! Revert-reason extraction from failed contract calls.
//!
//! The backend returns the raw output of a failed call. When the contract
//! reverted with a reason string the output is ABI `Error(string)`:
//!
//! ```text
//!  0..4    selector 0x08c379a0
//!  4..36   offset of the string (0x20)
//! 36..68   string length, big-endian; its low four bytes are 64..68
//! 68..     UTF-8 bytes of the reason
//! ```
//!
//! Only the low four bytes of the length word are read. The payload comes
//! from the backend and is never trusted: every read is bounds-checked.

use tracing::warn;

use crate::error::RevertError;
use crate::jsonrpc::ErrorBody;
use crate::translator::units::strip_0x;

/// JSON-RPC error code for failed `eth_call` / `eth_estimateGas`.
pub const CALL_FAILED_CODE: i64 = -4677;

/// Start of the big-endian 4-byte reason length.
pub const REASON_LENGTH_OFFSET: usize = 64;

/// Width of the reason length field.
pub const REASON_LENGTH_SIZE: usize = 4;

/// Start of the UTF-8 reason bytes.
pub const REASON_OFFSET: usize = REASON_LENGTH_OFFSET + REASON_LENGTH_SIZE;

/// Raw output of a failed contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevertPayload {
    bytes: Vec<u8>,
}

impl RevertPayload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Decode a hex blob, with or without `0x`.
    pub fn from_hex(blob: &str) -> Result<Self, RevertError> {
        hex::decode(strip_0x(blob))
            .map(Self::new)
            .map_err(|_| RevertError::InvalidHex)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the reason string as declared by the payload.
    pub fn reason_len(&self) -> Result<usize, RevertError> {
        let field = self
            .bytes
            .get(REASON_LENGTH_OFFSET..REASON_OFFSET)
            .ok_or(RevertError::Truncated {
                needed: REASON_OFFSET,
                actual: self.bytes.len(),
            })?;
        let mut word = [0u8; REASON_LENGTH_SIZE];
        word.copy_from_slice(field);
        Ok(u32::from_be_bytes(word) as usize)
    }

    /// The reason string. Fails if the payload is shorter than the declared length.
    pub fn reason(&self) -> Result<String, RevertError> {
        let len = self.reason_len()?;
        let needed = REASON_OFFSET.saturating_add(len);
        let data = self
            .bytes
            .get(REASON_OFFSET..needed)
            .ok_or(RevertError::Truncated {
                needed,
                actual: self.bytes.len(),
            })?;
        Ok(String::from_utf8_lossy(data).into_owned())
    }
}

/// Build the error object for a call that failed with a non-empty output.
///
/// The message gets `": <reason>"` appended when a reason can be read.
/// `data` always carries the untouched blob.
pub fn call_failure(message: &str, blob: &str) -> ErrorBody {
    let digits = strip_0x(blob);
    let reason = RevertPayload::from_hex(digits).and_then(|payload| payload.reason());

    let message = match reason {
        Ok(reason) => format!("{}: {}", message, reason),
        Err(e) => {
            warn!("could not decode revert reason: {}", e);
            message.to_string()
        }
    };

    ErrorBody {
        code: CALL_FAILED_CODE,
        message,
        data: format!("0x{}", digits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob_with_reason(declared_len: u32, reason: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; REASON_LENGTH_OFFSET];
        bytes.extend_from_slice(&declared_len.to_be_bytes());
        bytes.extend_from_slice(reason);
        bytes
    }

    #[test]
    fn test_reason_extraction() {
        let payload = RevertPayload::new(blob_with_reason(5, b"hello"));
        assert_eq!(payload.reason_len().unwrap(), 5);
        assert_eq!(payload.reason().unwrap(), "hello");
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut bytes = blob_with_reason(2, b"ok");
        bytes.extend_from_slice(&[0u8; 30]);
        assert_eq!(RevertPayload::new(bytes).reason().unwrap(), "ok");
    }

    #[test]
    fn test_short_header_is_truncated_error() {
        let payload = RevertPayload::new(vec![0u8; 66]);
        assert_eq!(
            payload.reason(),
            Err(RevertError::Truncated {
                needed: 68,
                actual: 66
            })
        );
    }

    #[test]
    fn test_short_body_is_truncated_error() {
        let payload = RevertPayload::new(blob_with_reason(10, b"abc"));
        assert_eq!(
            payload.reason(),
            Err(RevertError::Truncated {
                needed: 78,
                actual: 71
            })
        );
    }

    #[test]
    fn test_huge_declared_length_does_not_panic() {
        let payload = RevertPayload::new(blob_with_reason(u32::MAX, b"x"));
        assert!(matches!(payload.reason(), Err(RevertError::Truncated { .. })));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(RevertPayload::from_hex("0xzz"), Err(RevertError::InvalidHex));
    }

    #[test]
    fn test_call_failure_appends_reason() {
        let blob = hex::encode(blob_with_reason(5, b"hello"));
        let body = call_failure("execution reverted", &blob);
        assert_eq!(body.code, CALL_FAILED_CODE);
        assert_eq!(body.message, "execution reverted: hello");
        assert_eq!(body.data, format!("0x{}", blob));
    }

    #[test]
    fn test_call_failure_keeps_blob_when_undecodable() {
        let body = call_failure("execution reverted", "0xdeadbeef");
        assert_eq!(body.message, "execution reverted");
        assert_eq!(body.data, "0xdeadbeef");
    }
}
