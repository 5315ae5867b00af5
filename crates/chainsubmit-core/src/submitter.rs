//! Single-batch submission: prepare, estimate, pad, send, confirm.

use tracing::{debug, info, warn};

use crate::contract::BatchContract;
use crate::digest::prepare_item;
use crate::error::SubmitError;
use crate::types::{Batch, BatchSubmissionResult, PreparedDataItem};

/// Safety margin added on top of the node's gas estimate.
pub const GAS_MARGIN_PERCENT: u64 = 20;

/// `ceil(estimate * (100 + GAS_MARGIN_PERCENT) / 100)`, saturating at `u64::MAX`.
pub fn gas_limit_with_margin(estimate: u64) -> u64 {
    let scaled = u128::from(estimate) * u128::from(100 + GAS_MARGIN_PERCENT);
    let limit = scaled.div_ceil(100);
    u64::try_from(limit).unwrap_or(u64::MAX)
}

/// Submits one batch per call through a [`BatchContract`].
pub struct BatchSubmitter<C> {
    contract: C,
}

impl<C: BatchContract> BatchSubmitter<C> {
    pub fn new(contract: C) -> Self {
        Self { contract }
    }

    pub fn contract(&self) -> &C {
        &self.contract
    }

    /// Submit `batch` as one `submitBatchData` transaction and wait for it to be mined.
    ///
    /// Every item is converted before anything is sent, so a bad CID anywhere
    /// in the batch fails it without touching the chain.
    pub async fn submit_batch(&self, batch: &Batch) -> Result<BatchSubmissionResult, SubmitError> {
        let prepared = batch
            .items
            .iter()
            .map(prepare_item)
            .collect::<Result<Vec<PreparedDataItem>, _>>()?;

        let estimate = self.contract.estimate_gas(&prepared).await?;
        let gas_limit = gas_limit_with_margin(estimate);
        debug!(
            items = prepared.len(),
            gas_estimate = estimate,
            gas_limit,
            contract = self.contract.address(),
            "estimated batch gas"
        );

        let tx_hash = self.contract.send_batch(&prepared, gas_limit).await?;
        info!(tx_hash = %tx_hash, items = prepared.len(), "batch transaction sent");

        let receipt = self
            .contract
            .wait_for_receipt(&tx_hash)
            .await?
            .ok_or_else(|| SubmitError::TransactionFailed {
                tx_hash: Some(tx_hash.clone()),
                reason: "no receipt received".into(),
            })?;

        if !receipt.success {
            warn!(tx_hash = %receipt.transaction_hash, block = receipt.block_number, "batch transaction reverted");
            return Err(SubmitError::TransactionFailed {
                tx_hash: Some(receipt.transaction_hash),
                reason: format!("reverted in block {}", receipt.block_number),
            });
        }

        Ok(BatchSubmissionResult {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            items_submitted: batch.len(),
        })
    }
}
