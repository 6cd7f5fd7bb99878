//! Ledger endpoint configuration.
//!
//! Maps each supported network to its JSON-RPC endpoint and credential
//! contract, and names the registry network that hosts exposure reports and
//! the signer registry. Built explicitly, parsed from YAML, or loaded from
//! the file named by `ATTEST_LEDGER_CONFIG`.
//!
//! ```yaml
//! networks:
//!   "0xa86a":
//!     rpc_url: https://api.avax.network/ext/bc/C/rpc
//!     did_contract: "0xcCc0000000000000000000000000000000000000"
//! registry_network: "0xa86a"
//! signers_contract: "0xcCc09aA0d174271259D093C598FCe9Feb2791cCc"
//! timeout_secs: 10
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use attest_core::{Address, NetworkId};
use serde::{Deserialize, Serialize};
use url::Url;

/// Signer registry deployment used when none is configured
/// (`0xcCc09aA0d174271259D093C598FCe9Feb2791cCc`).
pub const DEFAULT_SIGNERS_CONTRACT: [u8; 20] = [
    0xcc, 0xc0, 0x9a, 0xa0, 0xd1, 0x74, 0x27, 0x12, 0x59, 0xd0, 0x93, 0xc5, 0x98, 0xfc, 0xe9,
    0xfe, 0xb2, 0x79, 0x1c, 0xcc,
];

/// Avalanche C-chain, where the registry lives by default. Some deployments
/// host exposure reports on the 0x144 network instead; those set
/// `registry_network` explicitly.
pub const DEFAULT_REGISTRY_CHAIN_ID: u64 = 0xa86a;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One network's endpoint and credential contract.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkEndpoint {
    pub rpc_url: Url,
    pub did_contract: Address,
}

impl std::fmt::Debug for NetworkEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkEndpoint")
            .field("rpc_url", &redact(&self.rpc_url))
            .field("did_contract", &self.did_contract)
            .finish()
    }
}

/// Configuration for ledger queries.
///
/// Custom `Debug` on [`NetworkEndpoint`] drops URL paths and query strings,
/// which commonly carry provider API keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    pub networks: BTreeMap<NetworkId, NetworkEndpoint>,
    #[serde(default = "default_registry_network")]
    pub registry_network: NetworkId,
    #[serde(default = "default_signers_contract")]
    pub signers_contract: Address,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LedgerConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Yaml`] on malformed input, or any error from
    /// [`LedgerConfig::validate`].
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Load configuration from the environment.
    ///
    /// Variables:
    /// - `ATTEST_LEDGER_CONFIG` (required): path to a YAML file.
    /// - `ATTEST_LEDGER_TIMEOUT_SECS` (optional): overrides `timeout_secs`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("ATTEST_LEDGER_CONFIG")
            .map_err(|_| ConfigError::MissingVar("ATTEST_LEDGER_CONFIG"))?;
        let mut config = Self::from_yaml_file(path)?;
        if let Ok(raw) = std::env::var("ATTEST_LEDGER_TIMEOUT_SECS") {
            config.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
            config.validate()?;
        }
        Ok(config)
    }

    /// A single-network configuration pointing at a local mock node.
    ///
    /// The network is the default registry network and every contract is
    /// the default signer registry address.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `rpc_url` cannot be parsed.
    pub fn local_mock(rpc_url: &str) -> Result<Self, ConfigError> {
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| ConfigError::InvalidUrl(rpc_url.to_string(), e.to_string()))?;
        let mut networks = BTreeMap::new();
        networks.insert(
            default_registry_network(),
            NetworkEndpoint {
                rpc_url,
                did_contract: default_signers_contract(),
            },
        );
        Ok(Self {
            networks,
            registry_network: default_registry_network(),
            signers_contract: default_signers_contract(),
            timeout_secs: 5,
        })
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoNetworks`] if the network map is empty.
    /// - [`ConfigError::UnknownRegistryNetwork`] if the registry network has
    ///   no endpoint.
    /// - [`ConfigError::InvalidUrl`] for a non-HTTP(S) endpoint.
    /// - [`ConfigError::InvalidTimeout`] for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.networks.is_empty() {
            return Err(ConfigError::NoNetworks);
        }
        if !self.networks.contains_key(&self.registry_network) {
            return Err(ConfigError::UnknownRegistryNetwork(
                self.registry_network.clone(),
            ));
        }
        for (network, endpoint) in &self.networks {
            if !matches!(endpoint.rpc_url.scheme(), "http" | "https") {
                return Err(ConfigError::InvalidUrl(
                    network.to_string(),
                    format!("unsupported scheme {:?}", endpoint.rpc_url.scheme()),
                ));
            }
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }

    /// The endpoint of the registry network.
    pub fn registry(&self) -> Option<&NetworkEndpoint> {
        self.networks.get(&self.registry_network)
    }
}

fn default_registry_network() -> NetworkId {
    NetworkId::from_chain_id(DEFAULT_REGISTRY_CHAIN_ID)
}

fn default_signers_contract() -> Address {
    Address::from_bytes(DEFAULT_SIGNERS_CONTRACT)
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Render a URL with its path and query removed.
pub(crate) fn redact(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}://{host}:{port}/[REDACTED]", url.scheme()),
        (Some(host), None) => format!("{}://{host}/[REDACTED]", url.scheme()),
        _ => format!("{}://[REDACTED]", url.scheme()),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid ledger config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid timeout {0:?}: must be a positive number of seconds")]
    InvalidTimeout(String),
    #[error("at least one network must be configured")]
    NoNetworks,
    #[error("registry network {0} has no configured endpoint")]
    UnknownRegistryNetwork(NetworkId),
}
