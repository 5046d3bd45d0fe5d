//! Error types for xian-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by client operations
//!   - [`ConfigError`] - Invalid network settings, raised while building a client
//!   - [`RpcError`] - Transport failures, non-2xx responses, malformed envelopes
//!   - [`DecodeError`] - A payload was present but could not be decoded
//!
//! A transaction rejected by the node is *not* an error: it is reported through
//! [`BroadcastOutcome::success`](crate::BroadcastOutcome) together with a
//! [`BroadcastFailure`](crate::BroadcastFailure) describing the failing phase.
//!
//! # Error Handling Examples
//!
//! ```rust,no_run
//! use xian_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let xian = Xian::testnet()?;
//!
//! match xian.get_nonce("some-vk").await {
//!     Ok(nonce) => println!("Next nonce: {}", nonce),
//!     Err(Error::Rpc(e)) => println!("Node unreachable: {}", e),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error validating network settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one masternode host is required")]
    EmptyHosts,

    #[error("Host '{0}' must include http:// or https://")]
    MissingScheme(String),

    #[error("Invalid network settings: {0}")]
    InvalidSettings(String),

    #[error("Environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Error decoding a payload returned by the node.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Integer payload of {0} bytes does not fit in 128 bits")]
    IntegerOverflow(usize),

    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// Transport-level errors.
///
/// These are surfaced exactly once; the client never retries a request.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("RPC error: {message} (code: {code})")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },
}

impl RpcError {
    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>) -> Self {
        RpcError::Network {
            message: message.into(),
            status_code,
        }
    }

    /// HTTP status code of the failed response, if the node answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            RpcError::Network { status_code, .. } => *status_code,
            RpcError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for xian-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error(transparent)]
    Config(#[from] ConfigError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // ─── Decoding ───
    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ─── Serialization ───
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
