//! Decoding of ABCI query results.
//!
//! The node answers every state query with a base64 payload whose logical type
//! (string, integer, JSON) is known only to the caller. The helpers here turn
//! that payload into a [`DecodedValue`] through explicit, typed operations.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::DecodeError;

/// The node's canonical "no value at this path" token (base64 of a single zero byte).
pub const EMPTY_VALUE: &str = "AA==";

/// The `response` object of an `abci_query` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryResponse {
    /// ABCI result code (0 for a successful query).
    #[serde(default)]
    pub code: u32,
    /// Node log output.
    #[serde(default)]
    pub log: Option<String>,
    /// Type hint set by the node, e.g. `"str"` or `"int"`.
    #[serde(default)]
    pub info: Option<String>,
    /// Base64 key echo, if any.
    #[serde(default)]
    pub key: Option<String>,
    /// Base64 payload, or [`EMPTY_VALUE`] when nothing is stored.
    #[serde(default)]
    pub value: Option<String>,
    /// Height the query was answered at.
    #[serde(default)]
    pub height: Option<String>,
}

impl QueryResponse {
    /// Build a response carrying only a value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Returns true if the node reported no value at the queried path.
    pub fn is_empty(&self) -> bool {
        is_empty_value(self.value.as_deref())
    }

    /// The node's type hint, if it sent one.
    pub fn type_hint(&self) -> Option<&str> {
        self.info
            .as_deref()
            .map(str::trim)
            .filter(|info| !info.is_empty())
    }
}

/// A decoded query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DecodedValue {
    /// Nothing is stored at the queried path.
    #[default]
    Absent,
    /// UTF-8 text.
    Text(String),
    /// Unsigned integer.
    Integer(u128),
    /// Structured (JSON) data.
    Structured(serde_json::Value),
}

impl DecodedValue {
    /// Returns true if no value was found.
    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }

    /// Borrow the text payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Take the text payload.
    pub fn into_text(self) -> Option<String> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the integer payload.
    pub fn as_integer(&self) -> Option<u128> {
        match self {
            DecodedValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Take the structured payload.
    pub fn into_structured(self) -> Option<serde_json::Value> {
        match self {
            DecodedValue::Structured(v) => Some(v),
            _ => None,
        }
    }

    /// Re-parse a text payload as JSON.
    ///
    /// `Structured` values are converted directly, `Absent` yields `null`
    /// and `Integer` yields a JSON number.
    pub fn parse_json<T: DeserializeOwned>(self) -> Result<T, DecodeError> {
        let value = match self {
            DecodedValue::Absent => serde_json::Value::Null,
            DecodedValue::Text(s) => serde_json::from_str(&s)?,
            DecodedValue::Integer(n) => serde_json::to_value(n)?,
            DecodedValue::Structured(v) => v,
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// Returns true for a missing value or the node's empty sentinel.
pub fn is_empty_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => v == EMPTY_VALUE,
    }
}

/// Decode a query response as text.
///
/// Yields [`DecodedValue::Absent`] for the empty sentinel; never guesses
/// whether the text is JSON.
pub fn decode_query(response: &QueryResponse) -> Result<DecodedValue, DecodeError> {
    match response.value.as_deref() {
        Some(raw) if raw != EMPTY_VALUE => Ok(DecodedValue::Text(decode_str(raw)?)),
        _ => Ok(DecodedValue::Absent),
    }
}

/// Decode a base64 payload as UTF-8 text.
pub fn decode_str(raw: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD.decode(raw)?;
    Ok(String::from_utf8(bytes)?)
}

/// Decode a base64 payload as a big-endian unsigned integer.
///
/// The empty sentinel and an empty payload both decode to 0.
pub fn decode_int(raw: &str) -> Result<u128, DecodeError> {
    if raw == EMPTY_VALUE {
        return Ok(0);
    }
    let bytes = STANDARD.decode(raw)?;
    if bytes.len() > 16 {
        return Err(DecodeError::IntegerOverflow(bytes.len()));
    }
    Ok(bytes
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | u128::from(*byte)))
}

/// Decode a base64 payload as JSON.
pub fn decode_obj(raw: &str) -> Result<serde_json::Value, DecodeError> {
    let text = decode_str(raw)?;
    Ok(serde_json::from_str(&text)?)
}
