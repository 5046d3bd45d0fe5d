//! RPC response types.

use std::fmt;

use serde::Deserialize;

use super::value::{QueryResponse, decode_obj};
use crate::error::DecodeError;

// ============================================================================
// Query types
// ============================================================================

/// The `result` of an `abci_query` call.
#[derive(Debug, Clone, Deserialize)]
pub struct AbciQueryResult {
    /// The ABCI response.
    pub response: QueryResponse,
}

// ============================================================================
// Broadcast types
// ============================================================================

/// One phase of transaction processing as reported by the node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TxPhaseResult {
    /// Result code; 0 is success.
    #[serde(default)]
    pub code: u32,
    /// Base64 return payload.
    #[serde(default)]
    pub data: Option<String>,
    /// Node log output.
    #[serde(default)]
    pub log: Option<String>,
    /// Additional info.
    #[serde(default)]
    pub info: Option<String>,
    /// Gas requested. Encoded as a string or number depending on node version.
    #[serde(default)]
    pub gas_wanted: Option<serde_json::Value>,
    /// Gas consumed.
    #[serde(default)]
    pub gas_used: Option<serde_json::Value>,
}

impl TxPhaseResult {
    /// Returns true if this phase succeeded.
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// The `result` of a `broadcast_tx_commit` call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BroadcastTxResponse {
    /// Admission check.
    #[serde(default)]
    pub check_tx: TxPhaseResult,
    /// Execution. Newer nodes name this `tx_result`.
    #[serde(default, alias = "tx_result")]
    pub deliver_tx: TxPhaseResult,
    /// Transaction hash.
    #[serde(default)]
    pub hash: String,
    /// Height the transaction was committed at.
    #[serde(default)]
    pub height: Option<String>,
}

/// Which phase rejected a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastFailure {
    /// Rejected during the admission check; never executed.
    CheckTx { code: u32, log: String },
    /// Admitted but execution failed.
    DeliverTx { code: u32, log: String },
}

impl BroadcastFailure {
    /// The failing phase's result code.
    pub fn code(&self) -> u32 {
        match self {
            BroadcastFailure::CheckTx { code, .. } | BroadcastFailure::DeliverTx { code, .. } => {
                *code
            }
        }
    }

    /// The failing phase's log output.
    pub fn log(&self) -> &str {
        match self {
            BroadcastFailure::CheckTx { log, .. } | BroadcastFailure::DeliverTx { log, .. } => log,
        }
    }
}

impl fmt::Display for BroadcastFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastFailure::CheckTx { code, log } => {
                write!(f, "check_tx failed with code {}", code)?;
                if !log.is_empty() {
                    write!(f, ": {}", log)?;
                }
                Ok(())
            }
            BroadcastFailure::DeliverTx { code, log } => {
                write!(f, "deliver_tx failed with code {}", code)?;
                if !log.is_empty() {
                    write!(f, ": {}", log)?;
                }
                Ok(())
            }
        }
    }
}

/// The client-facing verdict of a broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastOutcome {
    /// True iff both `check_tx` and `deliver_tx` returned code 0.
    pub success: bool,
    /// Decoded `deliver_tx.data`, if the node returned any.
    pub data: Option<serde_json::Value>,
    /// Transaction hash. Present even for failed transactions.
    pub hash: String,
    /// The first failing phase, when `success` is false.
    pub failure: Option<BroadcastFailure>,
}

/// Reduce a broadcast response to a [`BroadcastOutcome`].
///
/// A non-zero phase code is reported through `success: false`, not as an
/// error. Only an undecodable `deliver_tx.data` payload fails.
pub fn parse_broadcast_result(
    response: BroadcastTxResponse,
) -> Result<BroadcastOutcome, DecodeError> {
    let BroadcastTxResponse {
        check_tx,
        deliver_tx,
        hash,
        ..
    } = response;

    let data = match deliver_tx.data.as_deref() {
        Some(raw) if !raw.is_empty() => Some(decode_obj(raw)?),
        _ => None,
    };

    let failure = if !check_tx.is_ok() {
        Some(BroadcastFailure::CheckTx {
            code: check_tx.code,
            log: check_tx.log.unwrap_or_default(),
        })
    } else if !deliver_tx.is_ok() {
        Some(BroadcastFailure::DeliverTx {
            code: deliver_tx.code,
            log: deliver_tx.log.unwrap_or_default(),
        })
    } else {
        None
    };

    Ok(BroadcastOutcome {
        success: failure.is_none(),
        data,
        hash,
        failure,
    })
}
