//! Config file plus command-line overrides.

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chainsubmit_core::{BatchSize, SubmitConfig};

use crate::logging::LogConfig;

/// Layout of the YAML config file: submission settings at the top level,
/// logging under `log`.
///
/// ```yaml
/// rpc_url: http://127.0.0.1:1248
/// batch_size: 100
/// receipt_timeout_secs: 900
/// log:
///   level: info
///   components:
///     chainsubmit-rpc: debug
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(flatten)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl FileConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("read config file '{}'", path.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("parse config file '{}'", path.display()))
            }
            None => Ok(Self::default()),
        }
    }
}

/// Endpoint and contract selection shared by every networked command.
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// YAML config file
    #[arg(long, env = "CHAINSUBMIT_CONFIG")]
    pub config: Option<PathBuf>,
    /// Wallet / node JSON-RPC endpoint
    #[arg(long, env = "CHAINSUBMIT_RPC_URL")]
    pub rpc_url: Option<String>,
    /// Data submission contract address
    #[arg(long, env = "CHAINSUBMIT_CONTRACT")]
    pub contract: Option<String>,
    /// Expected chain id of the signer
    #[arg(long, env = "CHAINSUBMIT_CHAIN_ID")]
    pub chain_id: Option<u64>,
    /// Sending account (default: first account the wallet exposes)
    #[arg(long, env = "CHAINSUBMIT_FROM")]
    pub from: Option<String>,
}

impl ConnectionArgs {
    /// Load the config file (if any) and apply the flags on top.
    pub fn resolve(&self) -> Result<FileConfig> {
        let mut file = FileConfig::load(self.config.as_deref())?;
        self.apply(&mut file.submit);
        Ok(file)
    }

    fn apply(&self, config: &mut SubmitConfig) {
        if let Some(url) = &self.rpc_url {
            config.rpc_url = url.clone();
        }
        if let Some(contract) = &self.contract {
            config.contract_address = contract.clone();
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        if let Some(from) = &self.from {
            config.from = Some(from.clone());
        }
    }
}

/// Overrides that only matter when sending transactions.
#[derive(Debug, Clone, Default, Args)]
pub struct SubmitArgs {
    /// Items per transaction (clamped to 1..=500)
    #[arg(long, env = "CHAINSUBMIT_BATCH_SIZE")]
    pub batch_size: Option<usize>,
    /// Stop waiting for a receipt after this many seconds
    #[arg(long, env = "CHAINSUBMIT_RECEIPT_TIMEOUT")]
    pub receipt_timeout: Option<u64>,
}

impl SubmitArgs {
    pub fn apply(&self, config: &mut SubmitConfig) {
        if let Some(n) = self.batch_size {
            config.batch_size = BatchSize::new(n);
        }
        if let Some(secs) = self.receipt_timeout {
            config.receipt_timeout_secs = Some(secs);
        }
    }
}
