//! A typed Rust client for Xian masternodes.
//!
//! **xian-kit** reads contract state and submits signed transactions over a
//! masternode's CometBFT RPC surface, decoding the node's base64 payloads
//! into typed values.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use xian_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), xian_kit::Error> {
//!     // Configure once
//!     let xian = Xian::testnet()?;
//!
//!     // Check balance
//!     let balance = xian.get_currency_balance("some-vk").await?;
//!     println!("Balance: {}", balance);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Single entry point**: Everything hangs off the [`Xian`] client
//! 2. **Typed decoding**: Query results are a [`DecodedValue`], never a guess
//! 3. **No hidden retries**: One request per call, errors surface as-is
//! 4. **Exact amounts**: Balances are [`BigNumber`]s, never floats
//!
//! # Core Types
//!
//! - [`NetworkSettings`] - Chain ID, network tag and masternode hosts
//! - [`DecodedValue`] - `Absent | Text | Integer | Structured`
//! - [`BigNumber`] - Arbitrary-precision decimal balance
//! - [`Transaction`] - Signed transaction ready to broadcast
//! - [`BroadcastOutcome`] - Verdict of a committed transaction
//!
//! # Decoding
//!
//! The codecs are usable without a client:
//!
//! ```
//! use xian_kit::{decode_int, decode_obj, EMPTY_VALUE};
//!
//! assert_eq!(decode_int(EMPTY_VALUE).unwrap(), 0);
//! assert_eq!(decode_int("MDk=").unwrap(), 12345);
//! assert_eq!(decode_obj("eyJhIjoxfQ==").unwrap()["a"], 1);
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, DecodeError, Error, RpcError};
pub use types::*;

// Re-export client types
pub use client::{
    HostPool, HostSelector, RandomSelector, RoundRobinSelector, RpcClient, TESTNET_CHAIN_ID,
    TESTNET_HOST, Xian, XianBuilder,
};
