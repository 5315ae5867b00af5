//! `RpcBatchContract` — the data submission contract behind a wallet JSON-RPC endpoint.
//!
//! Signing is delegated to the endpoint: transactions go out through
//! `eth_sendTransaction` from an account the wallet (or a node with an
//! unlocked account) controls. Uses:
//! - `eth_chainId` / `eth_accounts` — pre-flight network and account checks
//! - `eth_estimateGas` — simulation of `submitBatchData`
//! - `eth_sendTransaction` — broadcast with an explicit gas limit
//! - `eth_getTransactionReceipt` / `eth_getTransactionByHash` — confirmation polling
//! - `eth_call` — `getCurrentFieldDataHash` reads

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use chainsubmit_core::config::validate_address;
use chainsubmit_core::{
    BatchContract, Bytes32, PreparedDataItem, SubmitConfig, SubmitError, TxReceipt,
};
use chainsubmit_rpc::{call, RpcTransport, TransportError};

use crate::abi::{AbiError, SubmitContractAbi};
use crate::receipt::{parse_quantity_u64, RpcReceipt};

/// Consecutive polls on which the node must not know a previously seen
/// transaction before it is reported as dropped. A transaction the node has
/// never reported is waited for indefinitely (or until the receipt timeout).
const DROPPED_AFTER_MISSES: u32 = 3;

/// Wallet-backed binding of the data submission contract.
pub struct RpcBatchContract {
    transport: Arc<dyn RpcTransport>,
    abi: SubmitContractAbi,
    address: String,
    from: String,
    next_id: AtomicU64,
    poll_interval: Duration,
    receipt_timeout: Option<Duration>,
}

impl RpcBatchContract {
    /// Bind `address`, sending from `from`. No network traffic.
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        address: impl Into<String>,
        from: impl Into<String>,
    ) -> Result<Self, SubmitError> {
        Ok(Self {
            transport,
            abi: SubmitContractAbi::new().map_err(encoding_error)?,
            address: address.into(),
            from: from.into(),
            next_id: AtomicU64::new(1),
            poll_interval: Duration::from_secs(2),
            receipt_timeout: None,
        })
    }

    /// Bind the configured contract after checking the signer's chain id and
    /// resolving the sending account.
    pub async fn connect(
        transport: Arc<dyn RpcTransport>,
        config: &SubmitConfig,
    ) -> Result<Self, SubmitError> {
        let chain_id = fetch_chain_id(transport.as_ref()).await?;
        if chain_id != config.chain_id {
            return Err(SubmitError::WrongNetwork {
                expected: config.chain_id,
                actual: chain_id,
            });
        }

        let from = match &config.from {
            Some(from) => from.clone(),
            None => first_account(transport.as_ref()).await?,
        };
        info!(chain_id, from = %from, contract = %config.contract_address, "signer connected");

        Ok(Self::new(transport, config.contract_address.clone(), from)?
            .with_receipt_polling(config.receipt_poll_interval(), config.receipt_timeout()))
    }

    /// Poll every `interval`; report no receipt once `timeout` has elapsed.
    pub fn with_receipt_polling(mut self, interval: Duration, timeout: Option<Duration>) -> Self {
        self.poll_interval = interval;
        self.receipt_timeout = timeout;
        self
    }

    /// The sending account.
    pub fn from_address(&self) -> &str {
        &self.from
    }

    /// Read `getCurrentFieldDataHash(propertyHash, dataGroupHash)`.
    pub async fn current_field_data_hash(
        &self,
        property_hash: &Bytes32,
        data_group_hash: &Bytes32,
    ) -> Result<Bytes32, SubmitError> {
        let data = self
            .abi
            .encode_current_field_data_hash(property_hash, data_group_hash)
            .map_err(encoding_error)?;
        let call_obj = json!({
            "to": self.address,
            "data": format!("0x{}", hex::encode(&data)),
        });
        let result: String = self
            .rpc("eth_call", vec![call_obj, json!("latest")])
            .await
            .map_err(transport_error)?;

        let bytes = hex::decode(result.trim_start_matches("0x")).map_err(|e| {
            SubmitError::Transport {
                reason: format!("malformed eth_call result: {e}"),
            }
        })?;
        SubmitContractAbi::decode_bytes32_output(&bytes).map_err(|e| SubmitError::Transport {
            reason: e.to_string(),
        })
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        call(self.transport.as_ref(), id, method, params).await
    }

    fn transaction(&self, items: &[PreparedDataItem], gas_limit: Option<u64>) -> Result<Value, SubmitError> {
        let data = self.abi.encode_submit_batch(items).map_err(encoding_error)?;
        let mut tx = json!({
            "from": self.from,
            "to": self.address,
            "data": format!("0x{}", hex::encode(&data)),
        });
        if let Some(gas) = gas_limit {
            tx["gas"] = json!(format!("0x{gas:x}"));
        }
        Ok(tx)
    }
}

#[async_trait]
impl BatchContract for RpcBatchContract {
    fn address(&self) -> &str {
        &self.address
    }

    async fn estimate_gas(&self, items: &[PreparedDataItem]) -> Result<u64, SubmitError> {
        let tx = self.transaction(items, None)?;
        let estimate: String = self
            .rpc("eth_estimateGas", vec![tx])
            .await
            .map_err(|e| match e {
                TransportError::Rpc(err) if err.is_user_rejection() => SubmitError::WalletRejected {
                    reason: err.message,
                },
                TransportError::Rpc(err) => SubmitError::GasEstimationFailed {
                    reason: err.detail(),
                },
                other => transport_error(other),
            })?;
        parse_quantity_u64(&estimate)
    }

    async fn send_batch(
        &self,
        items: &[PreparedDataItem],
        gas_limit: u64,
    ) -> Result<String, SubmitError> {
        let tx = self.transaction(items, Some(gas_limit))?;
        debug!(items = items.len(), gas_limit, "requesting signature");
        self.rpc("eth_sendTransaction", vec![tx])
            .await
            .map_err(|e| match e {
                TransportError::Rpc(err) if err.is_user_rejection() => SubmitError::WalletRejected {
                    reason: err.message,
                },
                TransportError::Rpc(err) => SubmitError::TransactionFailed {
                    tx_hash: None,
                    reason: err.detail(),
                },
                other => transport_error(other),
            })
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, SubmitError> {
        let started = Instant::now();
        let mut seen = false;
        let mut misses = 0u32;
        loop {
            let receipt: Option<RpcReceipt> = self
                .rpc("eth_getTransactionReceipt", vec![json!(tx_hash)])
                .await
                .map_err(transport_error)?;

            match receipt {
                Some(r) if r.is_mined() => return r.into_tx_receipt().map(Some),
                Some(_) => {
                    seen = true;
                    misses = 0;
                }
                None => {
                    let known: Option<Value> = self
                        .rpc("eth_getTransactionByHash", vec![json!(tx_hash)])
                        .await
                        .map_err(transport_error)?;
                    if known.is_some() {
                        seen = true;
                        misses = 0;
                    } else if !seen {
                        debug!(tx_hash, "transaction not yet visible to the node");
                    } else {
                        misses += 1;
                        if misses >= DROPPED_AFTER_MISSES {
                            warn!(tx_hash, "transaction no longer known to the node");
                            return Ok(None);
                        }
                    }
                }
            }

            if let Some(limit) = self.receipt_timeout {
                if started.elapsed() >= limit {
                    warn!(tx_hash, timeout_secs = limit.as_secs(), "gave up waiting for receipt");
                    return Ok(None);
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// `eth_chainId` as a number.
pub async fn fetch_chain_id(transport: &dyn RpcTransport) -> Result<u64, SubmitError> {
    let chain: String = call(transport, 0, "eth_chainId", vec![])
        .await
        .map_err(transport_error)?;
    parse_quantity_u64(&chain)
}

/// First account the wallet exposes.
pub async fn first_account(transport: &dyn RpcTransport) -> Result<String, SubmitError> {
    let accounts: Vec<String> = call(transport, 0, "eth_accounts", vec![])
        .await
        .map_err(|e| match e {
            TransportError::Rpc(err) if err.is_user_rejection() => SubmitError::WalletRejected {
                reason: err.message,
            },
            other => transport_error(other),
        })?;
    let account = accounts
        .into_iter()
        .next()
        .ok_or_else(|| SubmitError::WalletRejected {
            reason: "wallet exposes no accounts".into(),
        })?;
    validate_address(&account).map_err(|e| SubmitError::Transport {
        reason: e.to_string(),
    })?;
    Ok(account)
}

fn transport_error(e: TransportError) -> SubmitError {
    SubmitError::Transport {
        reason: e.to_string(),
    }
}

fn encoding_error(e: AbiError) -> SubmitError {
    SubmitError::Encoding {
        reason: e.to_string(),
    }
}
