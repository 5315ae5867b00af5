//! chainsubmit-core — the batch submission pipeline for ChainSubmit.
//!
//! # Overview
//!
//! ChainSubmit takes a list of content-identifier triples (property, data group,
//! data) and anchors them on an EVM contract in bounded-size batches, one
//! transaction per batch. The core crate defines:
//!
//! - [`DataItem`] / [`PreparedDataItem`] / [`Batch`] / [`BatchSubmissionResult`] — data model
//! - [`digest`] module — CID → 32-byte sha2-256 digest extraction
//! - [`partition`] module — ordered, contiguous batch partitioning
//! - [`BatchContract`] — the signer/transport seam every chain binding implements
//! - [`BatchSubmitter`] — estimate gas, add the safety margin, send, await the receipt
//! - [`SubmissionSequencer`] — lazy, fail-fast stream of per-batch results
//! - [`records`] module — CSV input loading and column validation
//! - [`SubmitConfig`] — contract address, batch size, network and receipt settings

pub mod config;
pub mod contract;
pub mod digest;
pub mod error;
pub mod partition;
pub mod records;
pub mod sequencer;
pub mod submitter;
pub mod types;

pub use config::{BatchSize, SubmitConfig};
pub use contract::{BatchContract, TxReceipt};
pub use digest::{cid_to_digest, cid_to_hash_hex, prepare_item};
pub use error::{ConfigError, RecordError, SequenceError, SubmitError};
pub use partition::{partition, plan_batch_sizes};
pub use records::{load_records, load_records_from_path, CsvRecord, RecordSet};
pub use sequencer::SubmissionSequencer;
pub use submitter::{gas_limit_with_margin, BatchSubmitter, GAS_MARGIN_PERCENT};
pub use types::{Batch, BatchSubmissionResult, Bytes32, DataItem, PreparedDataItem};
