//! Numeric conversions between the ledger's native representation and the
//! Ethereum wire format.
//!
//! Quantities are rendered as uppercase hex without leading zeros; callers
//! decide where the `0x` prefix goes.

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::error::QuantityError;

/// Decimal places of the native balance unit.
pub const NATIVE_DECIMALS: u32 = 11;

/// Decimal places of wei.
pub const WEI_DECIMALS: u32 = 18;

/// Multiplier from native units to wei (10^(18 - 11)).
pub const BALANCE_SCALE: u64 = 10_000_000;

/// Gas quoted for a plain transfer; also the `eth_gasPrice` answer.
pub const TRANSFER_GAS: u64 = 21_000;

/// Synthetic gas figure used for receipts, transaction objects and
/// `eth_estimateGas`. The ledger has no gas accounting.
pub const SYNTHETIC_GAS: u64 = 500_000;

/// Strip a leading `0x`/`0X` if present.
pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Ensure a string has the 0x prefix.
pub fn ensure_0x_prefix(s: &str) -> String {
    if s.starts_with("0x") || s.starts_with("0X") {
        s.to_string()
    } else {
        format!("0x{}", s)
    }
}

/// Lowercase `0x`-prefixed form of a backend hash or address.
pub fn hash_hex(s: &str) -> String {
    format!("0x{}", strip_0x(s).to_ascii_lowercase())
}

/// Parse a hex quantity (optionally `0x`-prefixed) as an unsigned 64-bit integer.
pub fn hex_to_uint(s: &str) -> Result<u64, QuantityError> {
    let digits = strip_0x(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(QuantityError::InvalidHex(s.to_string()));
    }
    u64::from_str_radix(digits, 16).map_err(|_| QuantityError::Overflow(s.to_string()))
}

/// Uppercase hex digits of `n`, no prefix, no leading zeros (`0` renders as `"0"`).
pub fn uint_to_hex(n: u64) -> String {
    format!("{:X}", n)
}

/// `0x`-prefixed form of [`uint_to_hex`].
pub fn quantity(n: u64) -> String {
    format!("0x{}", uint_to_hex(n))
}

/// Rescale a native balance to wei and hex-encode it (uppercase, no prefix).
///
/// The product can exceed 64 bits, so the multiplication is done on an
/// unbounded integer.
pub fn rescale_balance(native_balance: u64) -> String {
    let wei = BigUint::from(native_balance) * BigUint::from(BALANCE_SCALE);
    format!("{:X}", wei)
}

/// Convert a hex wei amount to native units.
///
/// An empty string is zero. The amount must be an exact multiple of
/// [`BALANCE_SCALE`]; a remainder is an error, never dropped. Amounts whose
/// native value does not fit in 64 bits are rejected.
pub fn wei_to_native(wei_hex: &str) -> Result<u64, QuantityError> {
    let digits = strip_0x(wei_hex);
    if digits.is_empty() {
        return Ok(0);
    }
    let wei = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| QuantityError::InvalidHex(wei_hex.to_string()))?;
    let scale = BigUint::from(BALANCE_SCALE);
    if !(&wei % &scale).is_zero() {
        return Err(QuantityError::SubUnit(wei_hex.to_string()));
    }
    let native = wei / scale;
    native
        .to_u64()
        .ok_or_else(|| QuantityError::NativeOverflow(native.to_string()))
}
