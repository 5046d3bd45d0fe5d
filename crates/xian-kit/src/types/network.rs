//! Network identification and settings for Xian.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The kind of Xian network the client is connected to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Xian mainnet (production network).
    Mainnet,
    /// Xian testnet.
    #[default]
    Testnet,
    /// Development network.
    Devnet,
    /// Any other network tag.
    #[serde(other)]
    Custom,
}

impl NetworkType {
    /// Returns the network tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => "mainnet",
            NetworkType::Testnet => "testnet",
            NetworkType::Devnet => "devnet",
            NetworkType::Custom => "custom",
        }
    }

    /// Parse a network tag, mapping unknown tags to [`NetworkType::Custom`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "mainnet" => NetworkType::Mainnet,
            "testnet" => NetworkType::Testnet,
            "devnet" => NetworkType::Devnet,
            _ => NetworkType::Custom,
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings a client is constructed from.
///
/// Mirrors the JSON shape used by Xian tooling:
///
/// ```
/// use xian_kit::NetworkSettings;
///
/// let settings: NetworkSettings = serde_json::from_str(r#"{
///     "chain_id": "xian-testnet-1",
///     "type": "testnet",
///     "masternode_hosts": ["https://testnet.xian.org"]
/// }"#).unwrap();
/// assert_eq!(settings.masternode_hosts.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    /// Chain identifier, e.g. `xian-testnet-1`.
    pub chain_id: String,
    /// Network type tag.
    #[serde(rename = "type", default)]
    pub network_type: NetworkType,
    /// Candidate masternode endpoints. Must be non-empty.
    #[serde(default)]
    pub masternode_hosts: Vec<String>,
}

impl NetworkSettings {
    /// Create settings from their parts.
    pub fn new(
        chain_id: impl Into<String>,
        network_type: NetworkType,
        masternode_hosts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            network_type,
            masternode_hosts: masternode_hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse settings from their JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidSettings(e.to_string()))
    }
}
