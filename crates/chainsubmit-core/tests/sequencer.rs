//! End-to-end tests for the submission sequencer against an in-memory contract.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;

use chainsubmit_core::{
    gas_limit_with_margin, BatchContract, BatchSize, DataItem, PreparedDataItem,
    SubmissionSequencer, SubmitError, TxReceipt,
};

// ─── Helpers ──────────────────────────────────────────────────────────────────

const CIDS: [&str; 3] = [
    "QmdfTbBqBPQ7VNxZEYEj14VmRuZBkqFbiwReogJgS1zR1n",
    "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e",
    "bafybeihdwdcefgh4dqkjv67uzcmw7ojee6xedzdetojuzjevtenxquvyku",
];

fn items(n: usize) -> Vec<DataItem> {
    (0..n)
        .map(|i| DataItem::new(CIDS[i % 3], CIDS[(i + 1) % 3], CIDS[(i + 2) % 3]))
        .collect()
}

/// Records every call; optionally fails the n-th gas estimate (1-based).
struct FakeContract {
    estimate: u64,
    fail_estimate_at: Option<usize>,
    estimates: AtomicUsize,
    sent: Mutex<Vec<(usize, u64)>>,
}

impl FakeContract {
    fn new(estimate: u64) -> Self {
        Self {
            estimate,
            fail_estimate_at: None,
            estimates: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(estimate: u64, n: usize) -> Self {
        Self {
            fail_estimate_at: Some(n),
            ..Self::new(estimate)
        }
    }

    fn sent(&self) -> Vec<(usize, u64)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BatchContract for FakeContract {
    fn address(&self) -> &str {
        "0x525E59e4DE2B51f52B9e30745a513E407652AB7c"
    }

    async fn estimate_gas(&self, _items: &[PreparedDataItem]) -> Result<u64, SubmitError> {
        let n = self.estimates.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_estimate_at == Some(n) {
            return Err(SubmitError::GasEstimationFailed {
                reason: "execution reverted: duplicate submission".into(),
            });
        }
        Ok(self.estimate)
    }

    async fn send_batch(
        &self,
        items: &[PreparedDataItem],
        gas_limit: u64,
    ) -> Result<String, SubmitError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((items.len(), gas_limit));
        Ok(format!("0x{:064x}", sent.len()))
    }

    async fn wait_for_receipt(&self, tx_hash: &str) -> Result<Option<TxReceipt>, SubmitError> {
        let n = u64::from_str_radix(tx_hash.trim_start_matches("0x"), 16).unwrap();
        Ok(Some(TxReceipt {
            transaction_hash: tx_hash.to_string(),
            block_number: 1_000 + n,
            gas_used: (self.estimate - 1).to_string(),
            success: true,
        }))
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn all_batches_succeed_in_order() {
    let sequencer = SubmissionSequencer::new(FakeContract::new(500_001), BatchSize::new(200));
    let results: Vec<_> = sequencer.submit_all(items(450)).collect().await;

    assert_eq!(results.len(), 3);
    let results: Vec<_> = results.into_iter().map(Result::unwrap).collect();
    let sizes: Vec<usize> = results.iter().map(|r| r.items_submitted).collect();
    assert_eq!(sizes, vec![200, 200, 50]);

    let blocks: Vec<u64> = results.iter().map(|r| r.block_number).collect();
    assert_eq!(blocks, vec![1_001, 1_002, 1_003]);
    assert_eq!(results[0].gas_used, "500000");

    let sent = sequencer.submitter().contract().sent();
    for (len, gas_limit) in &sent {
        assert!(*gas_limit >= 600_002, "gas limit {gas_limit} below 1.2x estimate");
        assert_eq!(*gas_limit, gas_limit_with_margin(500_001));
        assert!(*len <= 200);
    }
}

#[tokio::test]
async fn failure_at_batch_two_of_three_halts_the_run() {
    let sequencer =
        SubmissionSequencer::new(FakeContract::failing_at(50_000, 2), BatchSize::new(2));
    let results: Vec<_> = sequencer.submit_all(items(5)).collect().await;

    assert_eq!(results.len(), 2);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.items_submitted, 2);

    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.batch_number, 2);
    assert_eq!(err.total_batches, 3);
    assert_eq!(err.first_unsubmitted_item, 2);
    assert!(matches!(err.source, SubmitError::GasEstimationFailed { .. }));
    let msg = err.to_string();
    assert!(msg.contains("batch 2/3"), "{msg}");
    assert!(msg.contains("duplicate submission"), "{msg}");

    // Batch 3 was never estimated or sent.
    let contract = sequencer.submitter().contract();
    assert_eq!(contract.estimates.load(Ordering::SeqCst), 2);
    assert_eq!(contract.sent().len(), 1);
}

#[tokio::test]
async fn invalid_identifier_fails_its_batch_only_after_earlier_ones() {
    let mut input = items(4);
    input[3].property_cid = "definitely-not-a-cid".into();

    let sequencer = SubmissionSequencer::new(FakeContract::new(10), BatchSize::new(3));
    let results: Vec<_> = sequencer.submit_all(input).collect().await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert_eq!((err.batch_number, err.total_batches), (2, 2));
    assert!(matches!(err.source, SubmitError::InvalidIdentifier { .. }));
    assert_eq!(sequencer.submitter().contract().estimates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_input_yields_nothing() {
    let sequencer = SubmissionSequencer::new(FakeContract::new(10), BatchSize::default());
    let results: Vec<_> = sequencer.submit_all(Vec::new()).collect().await;
    assert!(results.is_empty());
    assert!(sequencer.submitter().contract().sent().is_empty());
}

#[tokio::test]
async fn submission_is_lazy() {
    let sequencer = SubmissionSequencer::new(FakeContract::new(10), BatchSize::new(1));
    let stream = sequencer.submit_all(items(3));
    futures::pin_mut!(stream);

    assert!(sequencer.submitter().contract().sent().is_empty());

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.items_submitted, 1);
    assert_eq!(sequencer.submitter().contract().sent().len(), 1);

    // The consumer stops pulling: the remaining batches are never sent.
    drop(stream);
    assert_eq!(sequencer.submitter().contract().sent().len(), 1);
}
