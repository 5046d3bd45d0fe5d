//! Arbitrary-precision balances.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

/// Key the Xian runtime uses to tag fixed-point decimals in JSON.
pub const FIXED_KEY: &str = "__fixed__";

/// Largest exponent accepted in scientific notation.
const MAX_EXPONENT: u64 = 4096;

/// The shapes a balance lookup can legitimately produce.
///
/// Balances are collapsed into a [`BigNumber`] at the point they are first
/// obtained, so callers never see the ambiguity.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceSource {
    /// No balance is stored for the account.
    Absent,
    /// A decoded JSON value: number, numeric string, `{"__fixed__": ..}` or `null`.
    Raw(serde_json::Value),
    /// Decoded text, either a bare decimal or JSON text of one of the `Raw` shapes.
    Text(String),
}

/// A signed decimal number with no precision limit.
///
/// Stored in canonical form: no leading zeros in the integer part, no
/// trailing zeros in the fraction, and zero is never negative. Two values
/// are equal exactly when they denote the same number.
///
/// ```
/// use xian_kit::BigNumber;
///
/// let a: BigNumber = "0012.500".parse().unwrap();
/// assert_eq!(a.to_string(), "12.5");
/// assert_eq!("0".parse::<BigNumber>().unwrap(), BigNumber::ZERO);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct BigNumber {
    negative: bool,
    integer: String,
    fraction: String,
}

impl BigNumber {
    /// Zero.
    pub const ZERO: Self = Self {
        negative: false,
        integer: String::new(),
        fraction: String::new(),
    };

    /// Normalize any balance shape into one canonical value.
    ///
    /// # Example
    ///
    /// ```
    /// use xian_kit::{BalanceSource, BigNumber};
    ///
    /// let absent = BigNumber::encode(BalanceSource::Absent).unwrap();
    /// let zero = BigNumber::encode(BalanceSource::Raw(serde_json::json!(0))).unwrap();
    /// let text = BigNumber::encode(BalanceSource::Text("0".into())).unwrap();
    /// assert_eq!(absent, zero);
    /// assert_eq!(zero, text);
    /// ```
    pub fn encode(source: BalanceSource) -> Result<Self, DecodeError> {
        match source {
            BalanceSource::Absent => Ok(Self::ZERO),
            BalanceSource::Raw(value) => Self::from_json(&value),
            BalanceSource::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Self::ZERO);
                }
                // Bare numbers never go through f64
                if !trimmed.starts_with(['{', '"']) && trimmed != "null" {
                    return trimmed.parse();
                }
                let value: serde_json::Value = serde_json::from_str(trimmed)
                    .map_err(|_| DecodeError::InvalidNumber(trimmed.to_string()))?;
                Self::from_json(&value)
            }
        }
    }

    /// Read a number from any JSON shape the runtime uses for amounts.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DecodeError> {
        match value {
            serde_json::Value::Null => Ok(Self::ZERO),
            serde_json::Value::Number(n) => n.to_string().parse(),
            serde_json::Value::String(s) => s.parse(),
            serde_json::Value::Object(map) => match map.get(FIXED_KEY) {
                Some(serde_json::Value::String(s)) => s.parse(),
                Some(serde_json::Value::Number(n)) => n.to_string().parse(),
                _ => Err(DecodeError::InvalidNumber(value.to_string())),
            },
            other => Err(DecodeError::InvalidNumber(other.to_string())),
        }
    }

    /// Returns true if this is zero.
    pub fn is_zero(&self) -> bool {
        self.integer.is_empty() && self.fraction.is_empty()
    }

    /// Returns true if this is below zero.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns true if there is a fractional part.
    pub fn has_fraction(&self) -> bool {
        !self.fraction.is_empty()
    }

    /// Convert to `u128` if the value is a non-negative integer that fits.
    pub fn to_u128(&self) -> Option<u128> {
        if self.negative || self.has_fraction() {
            return None;
        }
        if self.integer.is_empty() {
            return Some(0);
        }
        self.integer.parse().ok()
    }

    /// The Xian wire form, `{"__fixed__": "<decimal>"}`.
    pub fn to_fixed_json(&self) -> serde_json::Value {
        serde_json::json!({ FIXED_KEY: self.to_string() })
    }

    /// Build from a digit string and the position of the decimal point within it.
    fn from_digits(negative: bool, digits: &str, point: i64) -> Self {
        let len = digits.len() as i64;
        let (integer, fraction) = if point <= 0 {
            (String::new(), "0".repeat((-point) as usize) + digits)
        } else if point >= len {
            (digits.to_string() + &"0".repeat((point - len) as usize), String::new())
        } else {
            let (i, f) = digits.split_at(point as usize);
            (i.to_string(), f.to_string())
        };

        let integer = integer.trim_start_matches('0').to_string();
        let fraction = fraction.trim_end_matches('0').to_string();
        let is_zero = integer.is_empty() && fraction.is_empty();

        Self {
            negative: negative && !is_zero,
            integer,
            fraction,
        }
    }
}

impl FromStr for BigNumber {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidNumber(s.to_string());
        let trimmed = s.trim();

        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(pos) => {
                let exp: i64 = unsigned[pos + 1..].parse().map_err(|_| invalid())?;
                if exp.unsigned_abs() > MAX_EXPONENT {
                    return Err(invalid());
                }
                (&unsigned[..pos], exp)
            }
            None => (unsigned, 0),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = format!("{}{}", int_part, frac_part);
        let point = int_part.len() as i64 + exponent;

        Ok(Self::from_digits(negative, &digits, point))
    }
}

impl Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        if self.integer.is_empty() {
            f.write_str("0")?;
        } else {
            f.write_str(&self.integer)?;
        }
        if !self.fraction.is_empty() {
            write!(f, ".{}", self.fraction)?;
        }
        Ok(())
    }
}

impl From<u64> for BigNumber {
    fn from(n: u64) -> Self {
        Self::from(u128::from(n))
    }
}

impl From<u128> for BigNumber {
    fn from(n: u128) -> Self {
        let digits = n.to_string();
        let point = digits.len() as i64;
        Self::from_digits(false, &digits, point)
    }
}

impl Serialize for BigNumber {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_fixed_json().serialize(s)
    }
}

impl<'de> Deserialize<'de> for BigNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}
