//! `SubmissionSequencer` — drives the submitter across all batches in order.
//!
//! The result is a pull-based [`Stream`]: a batch is only converted, estimated
//! and sent when the consumer polls for the next element, and at most one
//! transaction is in flight at any time. The first failure is yielded as a
//! [`SequenceError`] and ends the stream.
//!
//! ```ignore
//! use futures::StreamExt;
//!
//! let sequencer = SubmissionSequencer::new(contract, BatchSize::default());
//! let results = sequencer.submit_all(items);
//! futures::pin_mut!(results);
//! while let Some(next) = results.next().await {
//!     let result = next?;
//!     println!("{} items in {}", result.items_submitted, result.transaction_hash);
//! }
//! ```

use futures::stream::{self, Stream};
use tracing::{error, info};

use crate::config::BatchSize;
use crate::contract::BatchContract;
use crate::error::SequenceError;
use crate::partition::partition;
use crate::submitter::BatchSubmitter;
use crate::types::{Batch, BatchSubmissionResult, DataItem};

/// Sequential, fail-fast batch submission.
pub struct SubmissionSequencer<C> {
    submitter: BatchSubmitter<C>,
    batch_size: BatchSize,
}

struct RunState {
    batches: std::vec::IntoIter<Batch>,
    total_batches: usize,
    batch_number: usize,
    halted: bool,
}

impl<C: BatchContract> SubmissionSequencer<C> {
    pub fn new(contract: C, batch_size: BatchSize) -> Self {
        Self {
            submitter: BatchSubmitter::new(contract),
            batch_size,
        }
    }

    pub fn batch_size(&self) -> BatchSize {
        self.batch_size
    }

    pub fn submitter(&self) -> &BatchSubmitter<C> {
        &self.submitter
    }

    /// Submit `items` batch by batch, yielding one result per confirmed batch.
    ///
    /// The stream is lazy and single-use. After an `Err` it yields nothing
    /// more; results already yielded refer to transactions that stay on-chain.
    pub fn submit_all(
        &self,
        items: Vec<DataItem>,
    ) -> impl Stream<Item = Result<BatchSubmissionResult, SequenceError>> + '_ {
        let batches = partition(items, self.batch_size);
        let state = RunState {
            total_batches: batches.len(),
            batches: batches.into_iter(),
            batch_number: 0,
            halted: false,
        };

        stream::unfold(state, move |mut st| async move {
            if st.halted {
                return None;
            }
            let batch = st.batches.next()?;
            st.batch_number += 1;

            info!(
                batch = st.batch_number,
                total = st.total_batches,
                items = batch.len(),
                "submitting batch"
            );

            match self.submitter.submit_batch(&batch).await {
                Ok(result) => {
                    info!(
                        batch = st.batch_number,
                        tx_hash = %result.transaction_hash,
                        block = result.block_number,
                        gas_used = %result.gas_used,
                        "batch confirmed"
                    );
                    Some((Ok(result), st))
                }
                Err(source) => {
                    error!(
                        batch = st.batch_number,
                        total = st.total_batches,
                        error = %source,
                        "batch failed; halting run"
                    );
                    st.halted = true;
                    let err = SequenceError {
                        batch_number: st.batch_number,
                        total_batches: st.total_batches,
                        first_unsubmitted_item: batch.offset,
                        source,
                    };
                    Some((Err(err), st))
                }
            }
        })
    }
}
