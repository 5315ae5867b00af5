//! The `BatchContract` trait — the signer/transport seam of the pipeline.

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::types::PreparedDataItem;

/// Confirmation record of a mined transaction, reduced to what the pipeline reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub block_number: u64,
    /// Decimal string; receipts report gas as a 256-bit quantity.
    pub gas_used: String,
    /// `false` when the transaction was mined but reverted.
    pub success: bool,
}

/// A deployed data submission contract reachable through an authorized signer.
///
/// Implementations own the contract address and the sending account; the
/// submitter only hands over the prepared call argument.
///
/// # Thread Safety
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait BatchContract: Send + Sync {
    /// Address of the target contract.
    fn address(&self) -> &str;

    /// Simulate `submitBatchData(items)` and return the gas it would consume.
    async fn estimate_gas(&self, items: &[PreparedDataItem]) -> Result<u64, SubmitError>;

    /// Sign and broadcast `submitBatchData(items)` with an explicit gas limit.
    /// Returns the transaction hash.
    async fn send_batch(
        &self,
        items: &[PreparedDataItem],
        gas_limit: u64,
    ) -> Result<String, SubmitError>;

    /// Block until the transaction is mined.
    ///
    /// `Ok(None)` means no receipt will arrive (dropped or replaced).
    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, SubmitError>;
}
