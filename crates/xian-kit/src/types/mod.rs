//! Core types for Xian.
//!
//! Hand-rolled types for the node's RPC envelopes, plus the codecs that turn
//! them into typed values.

mod big_number;
mod network;
mod rpc;
mod transaction;
mod value;

pub use big_number::{BalanceSource, BigNumber, FIXED_KEY};
pub use network::{NetworkSettings, NetworkType};
pub use rpc::{
    AbciQueryResult, BroadcastFailure, BroadcastOutcome, BroadcastTxResponse, TxPhaseResult,
    parse_broadcast_result,
};
pub use transaction::{
    Transaction, TransactionMetadata, TransactionPayload, parse_transaction_token,
    stringify_transaction,
};
pub use value::{
    DecodedValue, EMPTY_VALUE, QueryResponse, decode_int, decode_obj, decode_query, decode_str,
    is_empty_value,
};
