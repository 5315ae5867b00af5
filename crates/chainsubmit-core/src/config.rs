//! Submission configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Deployed data consensus contract on Polygon mainnet.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x525E59e4DE2B51f52B9e30745a513E407652AB7c";
pub const DEFAULT_RPC_URL: &str = "https://polygon-rpc.com";
/// Polygon PoS mainnet.
pub const DEFAULT_CHAIN_ID: u64 = 137;

/// Number of items per transaction, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "usize", into = "usize")]
pub struct BatchSize(usize);

impl BatchSize {
    pub const MIN: usize = 1;
    pub const MAX: usize = 500;
    pub const DEFAULT: usize = 200;

    /// Clamp `n` into the accepted range.
    pub fn new(n: usize) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BatchSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<usize> for BatchSize {
    fn from(n: usize) -> Self {
        Self::new(n)
    }
}

impl From<BatchSize> for usize {
    fn from(b: BatchSize) -> Self {
        b.0
    }
}

/// Top-level submission configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// JSON-RPC endpoint of the signing wallet / node.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Target contract address (0x-prefixed).
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    #[serde(default)]
    pub batch_size: BatchSize,
    /// Submission is refused when the signer reports a different chain id.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// Sending account; the first `eth_accounts` entry when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Delay between receipt polls in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
    /// Give up waiting for a receipt after this many seconds (unset = wait forever)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_timeout_secs: Option<u64>,
}

fn default_rpc_url() -> String { DEFAULT_RPC_URL.into() }
fn default_contract_address() -> String { DEFAULT_CONTRACT_ADDRESS.into() }
fn default_chain_id() -> u64 { DEFAULT_CHAIN_ID }
fn default_poll_interval_ms() -> u64 { 2_000 }

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: default_contract_address(),
            batch_size: BatchSize::default(),
            chain_id: default_chain_id(),
            from: None,
            receipt_poll_interval_ms: default_poll_interval_ms(),
            receipt_timeout_secs: None,
        }
    }
}

impl SubmitConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn receipt_timeout(&self) -> Option<Duration> {
        self.receipt_timeout_secs.map(Duration::from_secs)
    }

    /// Check addresses and URL shape before any network traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_address(&self.contract_address)?;
        if let Some(from) = &self.from {
            validate_address(from)?;
        }
        if !(self.rpc_url.starts_with("http://") || self.rpc_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl {
                url: self.rpc_url.clone(),
            });
        }
        Ok(())
    }
}

/// `0x` followed by exactly 40 hex digits (checksum casing is not enforced).
pub fn validate_address(address: &str) -> Result<(), ConfigError> {
    let valid = address
        .strip_prefix("0x")
        .filter(|h| h.len() == 40)
        .map(|h| hex::decode(h).is_ok())
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidAddress {
            address: address.to_string(),
        })
    }
}
