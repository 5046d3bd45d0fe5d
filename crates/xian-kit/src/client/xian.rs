//! The main Xian client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ConfigError, DecodeError, Error};
use crate::types::{
    BalanceSource, BigNumber, BroadcastOutcome, DecodedValue, NetworkSettings, NetworkType,
    Transaction, decode_int, decode_query, parse_broadcast_result, stringify_transaction,
};

use super::hosts::{HostPool, HostSelector};
use super::rpc::RpcClient;

/// Chain ID of the public Xian testnet.
pub const TESTNET_CHAIN_ID: &str = "xian-testnet-1";

/// Public Xian testnet masternode.
pub const TESTNET_HOST: &str = "https://testnet.xian.org";

/// The main client for talking to Xian masternodes.
///
/// Read operations decode the node's base64 payloads into typed values;
/// [`broadcast_tx`](Xian::broadcast_tx) submits an already-signed transaction.
/// Every operation picks one host from the configured pool and sends a
/// single request.
///
/// # Example
///
/// ```rust,no_run
/// use xian_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), xian_kit::Error> {
///     let xian = Xian::testnet()?;
///
///     let nonce = xian.get_nonce("some-vk").await?;
///     let balance = xian.get_currency_balance("some-vk").await?;
///     println!("nonce {}, balance {}", nonce, balance);
///
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Xian {
    rpc: Arc<RpcClient>,
}

impl Xian {
    /// Create a builder from network settings.
    pub fn builder(settings: NetworkSettings) -> XianBuilder {
        XianBuilder::new(settings)
    }

    /// Create a client with default options.
    pub fn new(settings: NetworkSettings) -> Result<Xian, Error> {
        Self::builder(settings).build()
    }

    /// Create a client from the JSON settings shape used by Xian tooling.
    ///
    /// ```
    /// use xian_kit::Xian;
    ///
    /// let xian = Xian::from_json(r#"{
    ///     "chain_id": "xian-testnet-1",
    ///     "type": "testnet",
    ///     "masternode_hosts": ["https://testnet.xian.org"]
    /// }"#).unwrap();
    /// assert_eq!(xian.chain_id(), "xian-testnet-1");
    /// ```
    pub fn from_json(json: &str) -> Result<Xian, Error> {
        Self::new(NetworkSettings::from_json(json)?)
    }

    /// Create a client for the public testnet.
    pub fn testnet() -> Result<Xian, Error> {
        Self::new(NetworkSettings::new(
            TESTNET_CHAIN_ID,
            NetworkType::Testnet,
            [TESTNET_HOST],
        ))
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `XIAN_CHAIN_ID`: chain identifier.
    /// - `XIAN_MASTERNODE_HOSTS`: comma-separated masternode URIs.
    /// - `XIAN_NETWORK_TYPE` (optional): network tag, defaults to `testnet`.
    ///
    /// With neither `XIAN_CHAIN_ID` nor `XIAN_MASTERNODE_HOSTS` set, the
    /// public testnet is used.
    ///
    /// # Errors
    ///
    /// Returns an error if only one of `XIAN_CHAIN_ID` and
    /// `XIAN_MASTERNODE_HOSTS` is set, or if a host is invalid.
    pub fn from_env() -> Result<Xian, Error> {
        let chain_id = std::env::var("XIAN_CHAIN_ID").ok();
        let hosts = std::env::var("XIAN_MASTERNODE_HOSTS").ok();
        let network_type = std::env::var("XIAN_NETWORK_TYPE")
            .ok()
            .map(|tag| NetworkType::from_tag(&tag))
            .unwrap_or_default();

        match (chain_id, hosts) {
            (None, None) => Self::testnet(),
            (Some(chain_id), Some(hosts)) => {
                let hosts = hosts
                    .split(',')
                    .map(str::trim)
                    .filter(|host| !host.is_empty());
                Self::new(NetworkSettings::new(chain_id, network_type, hosts))
            }
            (None, Some(_)) => Err(ConfigError::MissingEnv("XIAN_CHAIN_ID").into()),
            (Some(_), None) => Err(ConfigError::MissingEnv("XIAN_MASTERNODE_HOSTS").into()),
        }
    }

    /// Get the underlying RPC client.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// The settings this client was built from.
    pub fn settings(&self) -> &NetworkSettings {
        self.rpc.settings()
    }

    /// The chain ID.
    pub fn chain_id(&self) -> &str {
        &self.rpc.settings().chain_id
    }

    /// The network type tag.
    pub fn network_type(&self) -> NetworkType {
        self.rpc.settings().network_type
    }

    /// Draw one host from the pool, as a request would.
    pub fn host(&self) -> &str {
        self.rpc.host()
    }

    // ========================================================================
    // State queries
    // ========================================================================

    /// Get a contract's source.
    ///
    /// Returns [`DecodedValue::Absent`] if no such contract is deployed.
    pub async fn get_contract_info(&self, contract: &str) -> Result<DecodedValue, Error> {
        let response = self.rpc.abci_query(&format!("/contract/{}", contract)).await?;
        Ok(decode_query(&response)?)
    }

    /// Check whether a contract is deployed.
    pub async fn contract_exists(&self, contract: &str) -> Result<bool, Error> {
        Ok(!self.get_contract_info(contract).await?.is_absent())
    }

    /// Read a contract variable, e.g. `("currency", "balances:<vk>")`.
    pub async fn get_variable(&self, contract: &str, variable: &str) -> Result<DecodedValue, Error> {
        let response = self
            .rpc
            .abci_query(&format!("/get/{}.{}/", contract, variable))
            .await?;
        Ok(decode_query(&response)?)
    }

    /// Get a contract's exported methods as JSON.
    ///
    /// Returns `null` if the contract does not exist.
    pub async fn get_contract_methods(&self, contract: &str) -> Result<serde_json::Value, Error> {
        self.query_json(&format!("/contract_methods/{}", contract))
            .await
    }

    /// Get a contract's declared variables as JSON.
    ///
    /// Returns `null` if the contract does not exist.
    pub async fn get_contract_variables(
        &self,
        contract: &str,
    ) -> Result<serde_json::Value, Error> {
        self.query_json(&format!("/contract_vars/{}", contract)).await
    }

    /// Ping the node.
    pub async fn ping_server(&self) -> Result<serde_json::Value, Error> {
        self.query_json("/ping/").await
    }

    /// Get an account's balance in the `currency` contract.
    ///
    /// Accounts with no stored balance report zero.
    pub async fn get_currency_balance(&self, vk: &str) -> Result<BigNumber, Error> {
        let value = self
            .get_variable("currency", &format!("balances:{}", vk))
            .await?;
        let source = match value {
            DecodedValue::Absent => BalanceSource::Absent,
            DecodedValue::Text(text) => BalanceSource::Text(text),
            DecodedValue::Integer(n) => BalanceSource::Text(n.to_string()),
            DecodedValue::Structured(value) => BalanceSource::Raw(value),
        };
        Ok(BigNumber::encode(source)?)
    }

    /// Get the next nonce for a verifying key.
    ///
    /// An account that has never transacted has nonce 0.
    pub async fn get_nonce(&self, vk: &str) -> Result<u64, Error> {
        let response = self
            .rpc
            .abci_query(&format!("/get_next_nonce/{}", vk))
            .await?;
        let nonce = match response.value.as_deref() {
            Some(raw) if !response.is_empty() => decode_int(raw)?,
            _ => 0,
        };
        debug!(vk, nonce = %nonce, "Fetched nonce");
        u64::try_from(nonce).map_err(|_| DecodeError::InvalidNumber(nonce.to_string()).into())
    }

    async fn query_json(&self, path: &str) -> Result<serde_json::Value, Error> {
        let response = self.rpc.abci_query(path).await?;
        Ok(decode_query(&response)?.parse_json()?)
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Submit a signed transaction and wait for it to be committed.
    ///
    /// A transaction the node rejects is not an error: the outcome carries
    /// `success: false`, the hash, and the failing phase.
    pub async fn broadcast_tx(&self, tx: &Transaction) -> Result<BroadcastOutcome, Error> {
        let token = stringify_transaction(tx)?;
        debug!(
            contract = %tx.payload.contract,
            function = %tx.payload.function,
            nonce = tx.payload.nonce,
            "Broadcasting transaction"
        );

        let response = self.rpc.broadcast_tx_commit(&token).await?;
        let outcome = parse_broadcast_result(response)?;

        if let Some(failure) = &outcome.failure {
            warn!(hash = %outcome.hash, %failure, "Transaction rejected");
        }
        Ok(outcome)
    }

    // ========================================================================
    // Node information
    // ========================================================================

    /// Look up a committed transaction by hash. Returns the node's body unchanged.
    pub async fn get_transaction(&self, hash: &str) -> Result<serde_json::Value, Error> {
        let quoted = format!("\"0x{}\"", hash.trim_start_matches("0x"));
        Ok(self
            .rpc
            .get_json("/tx", &[("hash", quoted.as_str())])
            .await?)
    }

    /// Get the node's status. Returns the node's body unchanged.
    pub async fn get_node_info(&self) -> Result<serde_json::Value, Error> {
        Ok(self.rpc.get_json("/status", &[]).await?)
    }

    /// Get the latest block. Returns the node's body unchanged.
    pub async fn get_latest_block(&self) -> Result<serde_json::Value, Error> {
        Ok(self.rpc.get_json("/block", &[]).await?)
    }
}

// ============================================================================
// XianBuilder
// ============================================================================

/// Builder for creating a [`Xian`] client.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use xian_kit::*;
///
/// let settings = NetworkSettings::new(
///     "xian-testnet-1",
///     NetworkType::Testnet,
///     ["https://node-1.xian.org", "https://node-2.xian.org"],
/// );
/// let xian = Xian::builder(settings)
///     .selector(RoundRobinSelector::new())
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok::<(), xian_kit::Error>(())
/// ```
pub struct XianBuilder {
    settings: NetworkSettings,
    selector: Option<Arc<dyn HostSelector>>,
    timeout: Option<Duration>,
}

impl XianBuilder {
    fn new(settings: NetworkSettings) -> Self {
        Self {
            settings,
            selector: None,
            timeout: None,
        }
    }

    /// Set the host selection strategy. Defaults to uniform random.
    pub fn selector(mut self, selector: impl HostSelector + 'static) -> Self {
        self.selector = Some(Arc::new(selector));
        self
    }

    /// Set an overall timeout for each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate the settings and build the client.
    pub fn build(self) -> Result<Xian, Error> {
        let mut hosts = HostPool::new(&self.settings.masternode_hosts)?;
        if let Some(selector) = self.selector {
            hosts = hosts.with_shared_selector(selector);
        }
        let client = RpcClient::http_client(self.timeout)?;

        debug!(
            chain_id = %self.settings.chain_id,
            network = %self.settings.network_type,
            hosts = hosts.len(),
            "Built Xian client"
        );

        Ok(Xian {
            rpc: Arc::new(RpcClient::from_parts(self.settings, hosts, client)),
        })
    }
}

impl TryFrom<XianBuilder> for Xian {
    type Error = Error;

    fn try_from(builder: XianBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}
