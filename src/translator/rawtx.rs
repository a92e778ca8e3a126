//! Decoding of signed raw Ethereum transactions.
//!
//! The ledger accepts Ethereum-signed payloads as-is, but needs to know the
//! sender and whether the payload is a plain transfer or carries calldata.

use alloy_primitives::{Address, PrimitiveSignature, B256, U256};
use rlp::{Rlp, RlpStream};
use sha3::{Digest, Keccak256};
use tracing::debug;

use crate::error::RawTxError;
use crate::translator::units::strip_0x;

/// EIP-2930 access-list transaction type.
pub const ACCESS_LIST_TX_TYPE: u8 = 0x01;

/// EIP-1559 dynamic-fee transaction type.
pub const DYNAMIC_FEE_TX_TYPE: u8 = 0x02;

/// Decoded EVM transaction fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvmTransaction {
    /// `None` for legacy transactions.
    pub tx_type: Option<u8>,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Recipient address (None for contract creation)
    pub to: Option<Address>,
    pub value: U256,
    /// Transaction data (calldata)
    pub data: Vec<u8>,
    /// Chain ID (from EIP-155 or the typed payload)
    pub chain_id: Option<u64>,
    /// Recovered signer
    pub sender: Address,
    /// keccak256 of the raw bytes
    pub tx_hash: B256,
}

impl DecodedEvmTransaction {
    pub fn is_contract_call(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Field positions within the RLP list of each transaction shape.
struct Layout {
    chain_id: Option<usize>,
    nonce: usize,
    gas_limit: usize,
    to: usize,
    value: usize,
    data: usize,
    /// Index of `v`/`y_parity`; `r` and `s` follow it. Everything before it
    /// is signed.
    v: usize,
    items: usize,
}

const LEGACY: Layout = Layout {
    chain_id: None,
    nonce: 0,
    gas_limit: 2,
    to: 3,
    value: 4,
    data: 5,
    v: 6,
    items: 9,
};

// [chain_id, nonce, gas_price, gas_limit, to, value, data, access_list, y, r, s]
const ACCESS_LIST: Layout = Layout {
    chain_id: Some(0),
    nonce: 1,
    gas_limit: 3,
    to: 4,
    value: 5,
    data: 6,
    v: 8,
    items: 11,
};

// [chain_id, nonce, max_priority_fee, max_fee, gas_limit, to, value, data, access_list, y, r, s]
const DYNAMIC_FEE: Layout = Layout {
    chain_id: Some(0),
    nonce: 1,
    gas_limit: 4,
    to: 5,
    value: 6,
    data: 7,
    v: 9,
    items: 12,
};

/// Decode a `0x`-prefixed (or bare) hex raw transaction.
pub fn decode_raw_transaction_hex(raw_hex: &str) -> Result<DecodedEvmTransaction, RawTxError> {
    let raw = hex::decode(strip_0x(raw_hex)).map_err(|e| RawTxError::Hex(e.to_string()))?;
    decode_raw_transaction(&raw)
}

/// RLP-decode a signed raw transaction and recover its sender.
pub fn decode_raw_transaction(raw_tx: &[u8]) -> Result<DecodedEvmTransaction, RawTxError> {
    let first = *raw_tx
        .first()
        .ok_or_else(|| RawTxError::Rlp("empty transaction".to_string()))?;

    // EIP-2718: a leading byte below 0x7f is a type tag
    let (tx_type, payload, layout) = if first < 0x7f {
        let layout = match first {
            ACCESS_LIST_TX_TYPE => &ACCESS_LIST,
            DYNAMIC_FEE_TX_TYPE => &DYNAMIC_FEE,
            other => return Err(RawTxError::UnsupportedType(other)),
        };
        (Some(first), &raw_tx[1..], layout)
    } else {
        (None, raw_tx, &LEGACY)
    };

    let rlp = Rlp::new(payload);
    if !rlp.is_list() {
        return Err(RawTxError::Rlp("transaction is not a list".to_string()));
    }
    let item_count = rlp.item_count().map_err(rlp_error)?;
    if item_count != layout.items {
        return Err(RawTxError::ItemCount(item_count));
    }

    let nonce: u64 = rlp.val_at(layout.nonce).map_err(rlp_error)?;
    let gas_limit: u64 = rlp.val_at(layout.gas_limit).map_err(rlp_error)?;

    let to_bytes = rlp.at(layout.to).map_err(rlp_error)?.data().map_err(rlp_error)?;
    let to = match to_bytes.len() {
        0 => None,
        20 => Some(Address::from_slice(to_bytes)),
        n => return Err(RawTxError::Rlp(format!("recipient is {} bytes", n))),
    };

    let value = uint_at(&rlp, layout.value)?;
    let data: Vec<u8> = rlp.val_at(layout.data).map_err(rlp_error)?;

    let v: u64 = rlp.val_at(layout.v).map_err(rlp_error)?;
    let r = uint_at(&rlp, layout.v + 1)?;
    let s = uint_at(&rlp, layout.v + 2)?;

    let chain_id = match layout.chain_id {
        Some(index) => Some(rlp.val_at::<u64>(index).map_err(rlp_error)?),
        // EIP-155: v = chain_id * 2 + 35 + parity
        None if v >= 35 => Some((v - 35) / 2),
        None => None,
    };

    let prehash = signing_hash(tx_type, &rlp, layout, chain_id)?;
    let signature = PrimitiveSignature::new(r, s, y_parity(v, tx_type.is_some())?);
    let sender = signature
        .recover_address_from_prehash(&prehash)
        .map_err(|e| RawTxError::Signature(e.to_string()))?;

    let tx_hash = B256::from_slice(&Keccak256::digest(raw_tx));

    debug!(
        "decoded raw tx: type={:?} sender={} to={:?} nonce={} data_len={}",
        tx_type,
        sender,
        to,
        nonce,
        data.len()
    );

    Ok(DecodedEvmTransaction {
        tx_type,
        nonce,
        gas_limit,
        to,
        value,
        data,
        chain_id,
        sender,
        tx_hash,
    })
}

/// Normalize `v` to the y-parity bit. Typed transactions carry the bit
/// directly; legacy ones use 27/28 or the EIP-155 form.
fn y_parity(v: u64, typed: bool) -> Result<bool, RawTxError> {
    match v {
        0 | 1 if typed => Ok(v == 1),
        27 | 28 if !typed => Ok(v == 28),
        v if !typed && v >= 35 => Ok((v - 35) % 2 == 1),
        _ => Err(RawTxError::Signature(format!("invalid v value {}", v))),
    }
}

/// Hash that the sender signed: the unsigned fields re-encoded as they
/// appeared on the wire, plus the EIP-155 suffix for replay-protected
/// legacy transactions and the type byte for typed ones.
fn signing_hash(
    tx_type: Option<u8>,
    rlp: &Rlp,
    layout: &Layout,
    chain_id: Option<u64>,
) -> Result<B256, RawTxError> {
    let eip155_chain = chain_id.filter(|_| tx_type.is_none());
    let items = if eip155_chain.is_some() { layout.v + 3 } else { layout.v };
    let mut stream = RlpStream::new_list(items);
    for index in 0..layout.v {
        let item = rlp.at(index).map_err(rlp_error)?;
        stream.append_raw(item.as_raw(), 1);
    }
    if let Some(id) = eip155_chain {
        stream.append(&id);
        stream.append_empty_data();
        stream.append_empty_data();
    }

    let mut hasher = Keccak256::new();
    if let Some(t) = tx_type {
        hasher.update([t]);
    }
    hasher.update(stream.out());
    Ok(B256::from_slice(&hasher.finalize()))
}

fn uint_at(rlp: &Rlp, index: usize) -> Result<U256, RawTxError> {
    let bytes = rlp.at(index).map_err(rlp_error)?.data().map_err(rlp_error)?;
    if bytes.len() > 32 {
        return Err(RawTxError::Rlp(format!("item {} exceeds 32 bytes", index)));
    }
    Ok(U256::from_be_slice(bytes))
}

fn rlp_error(e: rlp::DecoderError) -> RawTxError {
    RawTxError::Rlp(e.to_string())
}
