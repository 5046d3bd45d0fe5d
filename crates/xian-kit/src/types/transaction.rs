//! Transaction types and their broadcast encoding.

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

/// A signed Xian transaction, ready to broadcast.
///
/// Field order here is the wire order: `metadata` first, then `payload`
/// with its fields sorted by name. Signing happens elsewhere; this type only
/// carries the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Signature over the payload.
    pub metadata: TransactionMetadata,
    /// What the transaction does.
    pub payload: TransactionPayload,
}

/// Transaction metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// Hex-encoded ed25519 signature of the serialized payload.
    pub signature: String,
}

/// The signed part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPayload {
    /// Chain the transaction is valid on.
    pub chain_id: String,
    /// Contract to call.
    pub contract: String,
    /// Function to call on the contract.
    pub function: String,
    /// Keyword arguments. Object keys serialize in sorted order.
    pub kwargs: serde_json::Value,
    /// Sender nonce.
    pub nonce: u64,
    /// Sender verifying key (hex).
    pub sender: String,
    /// Maximum stamps the sender pays for execution.
    pub stamps_supplied: u64,
}

impl Transaction {
    /// Assemble a transaction from its payload and signature.
    pub fn new(payload: TransactionPayload, signature: impl Into<String>) -> Self {
        Self {
            metadata: TransactionMetadata {
                signature: signature.into(),
            },
            payload,
        }
    }
}

/// Serialize a transaction to the token `broadcast_tx_commit` expects.
///
/// The token is the lowercase hex encoding of the transaction's compact JSON,
/// which is what the node decodes on receipt. Hex digits need no escaping
/// in a query string.
///
/// # Example
///
/// ```
/// use xian_kit::{stringify_transaction, Transaction, TransactionPayload};
///
/// let tx = Transaction::new(
///     TransactionPayload {
///         chain_id: "xian-testnet-1".into(),
///         contract: "currency".into(),
///         function: "transfer".into(),
///         kwargs: serde_json::json!({ "to": "bob", "amount": 5 }),
///         nonce: 0,
///         sender: "alice".into(),
///         stamps_supplied: 20,
///     },
///     "deadbeef",
/// );
/// let token = stringify_transaction(&tx).unwrap();
/// assert!(token.bytes().all(|b| b.is_ascii_hexdigit()));
/// ```
pub fn stringify_transaction(tx: &Transaction) -> Result<String, serde_json::Error> {
    let mut canonical = tx.clone();
    canonical.payload.kwargs = sorted_keys(&tx.payload.kwargs);
    let json = serde_json::to_vec(&canonical)?;
    Ok(hex::encode(json))
}

/// Rebuild a JSON value with every object's keys in lexicographic order,
/// regardless of which map backend serde_json was compiled with.
fn sorted_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted_keys(v)))
                    .collect(),
            )
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sorted_keys).collect())
        }
        other => other.clone(),
    }
}

/// Reverse of [`stringify_transaction`].
pub fn parse_transaction_token(token: &str) -> Result<Transaction, DecodeError> {
    let bytes = hex::decode(token.trim_matches('"'))?;
    Ok(serde_json::from_slice(&bytes)?)
}
