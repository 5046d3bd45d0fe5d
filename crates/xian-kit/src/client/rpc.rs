//! Low-level RPC client for Xian masternodes.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::types::{AbciQueryResult, BroadcastTxResponse, NetworkSettings, QueryResponse};

use super::hosts::HostPool;

/// JSON-RPC response structure.
#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    #[serde(default)]
    jsonrpc: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    id: Option<serde_json::Value>,
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl From<JsonRpcError> for RpcError {
    fn from(error: JsonRpcError) -> Self {
        RpcError::Rpc {
            code: error.code,
            message: error.message,
            data: error.data,
        }
    }
}

/// Low-level client for the masternode RPC surface.
///
/// Every call draws one host from the pool and sends exactly one request.
/// Nothing is retried; transport failures surface as [`RpcError`].
#[derive(Clone)]
pub struct RpcClient {
    settings: NetworkSettings,
    hosts: HostPool,
    client: reqwest::Client,
}

impl RpcClient {
    /// Create a client from settings, validating the host list.
    pub fn new(settings: NetworkSettings) -> Result<Self, crate::error::ConfigError> {
        let hosts = HostPool::new(&settings.masternode_hosts)?;
        Ok(Self::from_parts(settings, hosts, reqwest::Client::new()))
    }

    pub(crate) fn from_parts(
        settings: NetworkSettings,
        hosts: HostPool,
        client: reqwest::Client,
    ) -> Self {
        Self {
            settings,
            hosts,
            client,
        }
    }

    /// Build an HTTP client with an optional overall request timeout.
    pub(crate) fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, RpcError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    /// The settings this client was built from.
    pub fn settings(&self) -> &NetworkSettings {
        &self.settings
    }

    /// The validated host pool.
    pub fn hosts(&self) -> &HostPool {
        &self.hosts
    }

    /// Draw a host for one request.
    pub fn host(&self) -> &str {
        self.hosts.select()
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Send one request to a freshly drawn host and return the raw body as JSON.
    ///
    /// Query values are percent-encoded, so they may contain any character.
    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, RpcError> {
        let host = self.host();
        let url = build_url(host, path, params)?;
        debug!(method = method.as_str(), host, path, query = url.query(), "Sending RPC request");

        let response = self
            .client
            .request(method, url)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(host, status = status.as_u16(), "RPC request failed");
            return Err(RpcError::network(
                format!("HTTP {}: {}", status, body),
                Some(status.as_u16()),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request and unwrap the JSON-RPC `result` field.
    async fn call<R: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<R, RpcError> {
        let body = self.send(method, path, params).await?;
        let rpc_response: JsonRpcResponse<R> = serde_json::from_value(body)?;

        if let Some(error) = rpc_response.error {
            return Err(error.into());
        }

        rpc_response
            .result
            .ok_or_else(|| RpcError::InvalidResponse("Missing result in response".to_string()))
    }

    // ========================================================================
    // RPC methods
    // ========================================================================

    /// Run an ABCI query against `path`, e.g. `/contract/currency`.
    pub async fn abci_query(&self, path: &str) -> Result<QueryResponse, RpcError> {
        let quoted = quote(path);
        let result: AbciQueryResult = self
            .call(reqwest::Method::POST, "/abci_query", &[("path", quoted.as_str())])
            .await?;
        Ok(result.response)
    }

    /// Submit a serialized transaction and wait for it to be committed.
    pub async fn broadcast_tx_commit(&self, token: &str) -> Result<BroadcastTxResponse, RpcError> {
        let quoted = quote(token);
        self.call(
            reqwest::Method::GET,
            "/broadcast_tx_commit",
            &[("tx", quoted.as_str())],
        )
        .await
    }

    /// GET a path with query parameters and return the node's body unchanged.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, RpcError> {
        self.send(reqwest::Method::GET, path, params).await
    }
}

/// CometBFT's URI transport expects string arguments wrapped in double quotes.
fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

fn build_url(host: &str, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Url, RpcError> {
    let mut url = reqwest::Url::parse(&format!("{}{}", host, path))
        .map_err(|e| RpcError::InvalidUrl(format!("{}{}: {}", host, path, e)))?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("chain_id", &self.settings.chain_id)
            .field("hosts", &self.hosts.hosts())
            .finish()
    }
}
