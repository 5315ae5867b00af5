//! Error types for the ChainSubmit pipeline.

use thiserror::Error;

/// Errors that can occur while preparing or submitting a single batch.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The string is not a parseable content identifier.
    #[error("Invalid content identifier '{cid}': {reason}")]
    InvalidIdentifier { cid: String, reason: String },

    /// The CID's multihash is not a 32-byte sha2-256 digest.
    #[error("Unsupported hash algorithm in '{cid}': multihash code 0x{code:x} with {size}-byte digest (expected sha2-256)")]
    UnsupportedHashAlgorithm { cid: String, code: u64, size: usize },

    /// The node rejected the simulated call (usually: the transaction would revert).
    #[error("Gas estimation failed: {reason}")]
    GasEstimationFailed { reason: String },

    /// The transaction was not confirmed: dropped, replaced, reverted or never mined.
    #[error("Transaction failed{}: {reason}", .tx_hash.as_ref().map(|h| format!(" ({h})")).unwrap_or_default())]
    TransactionFailed {
        tx_hash: Option<String>,
        reason: String,
    },

    /// The wallet declined to sign (EIP-1193 code 4001) or exposed no account.
    #[error("Wallet rejected the request: {reason}")]
    WalletRejected { reason: String },

    /// The signer is connected to a different chain than the one configured.
    #[error("Wrong network: expected chain id {expected}, signer is on {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    /// The contract call could not be ABI-encoded.
    #[error("Call encoding failed: {reason}")]
    Encoding { reason: String },

    /// RPC plumbing failed outside the estimate/send steps (receipt polling, account lookup).
    #[error("Transport error: {reason}")]
    Transport { reason: String },
}

impl SubmitError {
    /// Returns `true` if resubmitting the same batch may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionFailed { .. } | Self::Transport { .. })
    }

    /// Returns `true` if the error is caused by the input data itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::UnsupportedHashAlgorithm { .. }
        )
    }
}

/// Terminal error of a submission run: batch `batch_number` of `total_batches` failed.
///
/// Batches before `batch_number` were confirmed and stay on-chain; the
/// remaining input starts at item `first_unsubmitted_item`.
#[derive(Debug, Error)]
#[error("Failed to submit batch {batch_number}/{total_batches}: {source}")]
pub struct SequenceError {
    /// 1-based index of the failed batch.
    pub batch_number: usize,
    pub total_batches: usize,
    /// Offset of the first item of the failed batch in the original input.
    pub first_unsubmitted_item: usize,
    #[source]
    pub source: SubmitError,
}

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid contract address '{address}': expected 0x followed by 40 hex digits")]
    InvalidAddress { address: String },

    #[error("Invalid RPC URL '{url}'")]
    InvalidUrl { url: String },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from reading the CSV input.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("CSV must contain columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("No valid data rows found in CSV")]
    NoValidRows,

    #[error("Error parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
