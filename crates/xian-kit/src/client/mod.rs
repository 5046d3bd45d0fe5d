//! Client module for talking to Xian masternodes.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Xian`] - The main client, the single entry point for all operations
//! - [`XianBuilder`] - Builder for host selection and request timeout
//! - [`RpcClient`] - Low-level client for the node's query and broadcast RPCs
//!
//! # Host Selection
//!
//! Every request draws one host from a [`HostPool`] through a [`HostSelector`]:
//!
//! | Selector | Behavior |
//! |----------|----------|
//! | [`RandomSelector`] | Uniform random draw per request (default) |
//! | [`RoundRobinSelector`] | Cycles through hosts in configuration order |
//!
//! Nothing is retried. A failed request surfaces its error to the caller.

mod hosts;
mod rpc;
mod xian;

pub use hosts::{HostPool, HostSelector, RandomSelector, RoundRobinSelector};
pub use rpc::RpcClient;
pub use xian::{TESTNET_CHAIN_ID, TESTNET_HOST, Xian, XianBuilder};
