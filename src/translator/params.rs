//! Typed decoding of the `params` member.
//!
//! Each method that takes an object reads the first element of `params`
//! into its own record. Unknown keys are ignored, and missing or `null`
//! keys fall back to the field's zero value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::DecodeError;

/// Call object of `eth_call`, `eth_estimateGas`, `eth_sendTransaction` and
/// `eth_signTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallParams {
    #[serde(deserialize_with = "or_default")]
    pub from: String,
    #[serde(deserialize_with = "or_default")]
    pub to: String,
    #[serde(deserialize_with = "or_default")]
    pub gas: String,
    #[serde(deserialize_with = "or_default")]
    pub gas_price: String,
    #[serde(deserialize_with = "or_default")]
    pub value: String,
    #[serde(deserialize_with = "or_default")]
    pub data: String,
    /// Newer clients send calldata as `input`.
    #[serde(deserialize_with = "or_default")]
    pub input: String,
}

impl CallParams {
    /// Calldata, preferring `data` over `input`.
    pub fn calldata(&self) -> &str {
        if self.data.is_empty() {
            &self.input
        } else {
            &self.data
        }
    }
}

/// Filter object of `eth_getLogs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogFilterParams {
    #[serde(deserialize_with = "or_default")]
    pub from_block: String,
    #[serde(deserialize_with = "or_default")]
    pub to_block: String,
    #[serde(deserialize_with = "or_default")]
    pub address: String,
    #[serde(deserialize_with = "topic_list")]
    pub topics: Vec<String>,
    #[serde(alias = "blockhash", deserialize_with = "or_default")]
    pub block_hash: String,
}

/// Positional params of `eth_getStorageAt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageQuery {
    pub address: String,
    pub slot: String,
}

impl StorageQuery {
    pub fn decode(method: &str, params: Option<&Value>) -> Result<Self, DecodeError> {
        let items = sequence(method, params)?;
        if items.len() < 2 {
            return Err(DecodeError::TooShort {
                method: method.to_string(),
                expected: 2,
                actual: items.len(),
            });
        }
        Ok(Self {
            address: string_at(method, items, 0)?,
            slot: string_at(method, items, 1)?,
        })
    }
}

/// Decode the first element of `params` into `T`.
pub fn decode_first<T: DeserializeOwned>(
    method: &str,
    params: Option<&Value>,
) -> Result<T, DecodeError> {
    let items = sequence(method, params)?;
    let first = items.first().ok_or_else(|| DecodeError::TooShort {
        method: method.to_string(),
        expected: 1,
        actual: 0,
    })?;
    if !first.is_object() {
        return Err(DecodeError::NotAMapping {
            method: method.to_string(),
            index: 0,
        });
    }
    T::deserialize(first).map_err(|e| DecodeError::Field {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// The first element of `params`, which must be a string.
pub fn first_string(method: &str, params: Option<&Value>) -> Result<String, DecodeError> {
    let items = sequence(method, params)?;
    if items.is_empty() {
        return Err(DecodeError::TooShort {
            method: method.to_string(),
            expected: 1,
            actual: 0,
        });
    }
    string_at(method, items, 0)
}

fn sequence<'a>(method: &str, params: Option<&'a Value>) -> Result<&'a [Value], DecodeError> {
    match params {
        None => Err(DecodeError::MissingParams),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(DecodeError::NotASequence {
            method: method.to_string(),
        }),
    }
}

fn string_at(method: &str, items: &[Value], index: usize) -> Result<String, DecodeError> {
    items
        .get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DecodeError::NotAString {
            method: method.to_string(),
            index,
        })
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// `null` topic positions are wildcards; they carry nothing to forward.
fn topic_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let topics = Option::<Vec<Option<String>>>::deserialize(deserializer)?;
    Ok(topics.unwrap_or_default().into_iter().flatten().collect())
}
