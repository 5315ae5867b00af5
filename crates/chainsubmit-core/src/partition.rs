//! Ordered, contiguous batch partitioning.

use crate::config::BatchSize;
use crate::types::{Batch, DataItem};

/// Split `items` into consecutive batches of at most `batch_size` items.
///
/// Concatenating the returned batches reproduces `items` in order; only the
/// last batch may be shorter than `batch_size`.
pub fn partition(items: Vec<DataItem>, batch_size: BatchSize) -> Vec<Batch> {
    let size = batch_size.get();
    let mut batches = Vec::with_capacity(items.len().div_ceil(size));
    let mut offset = 0usize;
    let mut rest = items.into_iter().peekable();

    while rest.peek().is_some() {
        let chunk: Vec<DataItem> = rest.by_ref().take(size).collect();
        let len = chunk.len();
        batches.push(Batch { offset, items: chunk });
        offset += len;
    }
    batches
}

/// Sizes of the batches [`partition`] would produce for `total` items.
pub fn plan_batch_sizes(total: usize, batch_size: BatchSize) -> Vec<usize> {
    let size = batch_size.get();
    (0..total)
        .step_by(size)
        .map(|start| size.min(total - start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<DataItem> {
        (0..n)
            .map(|i| DataItem::new(format!("p{i}"), format!("g{i}"), format!("d{i}")))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_batches() {
        assert!(partition(vec![], BatchSize::default()).is_empty());
        assert!(plan_batch_sizes(0, BatchSize::default()).is_empty());
    }

    #[test]
    fn four_fifty_by_two_hundred() {
        let batches = partition(items(450), BatchSize::new(200));
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![200, 200, 50]);
        assert_eq!(plan_batch_sizes(450, BatchSize::new(200)), vec![200, 200, 50]);
        let offsets: Vec<usize> = batches.iter().map(|b| b.offset).collect();
        assert_eq!(offsets, vec![0, 200, 400]);
    }

    #[test]
    fn batch_size_at_least_input_gives_one_batch() {
        let batches = partition(items(7), BatchSize::new(7));
        assert_eq!(batches.len(), 1);
        let batches = partition(items(7), BatchSize::new(500));
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 7);
    }

    #[test]
    fn partition_invariant_holds_across_sizes() {
        for n in [1usize, 2, 9, 10, 11, 199, 200, 201, 1000, 1001] {
            for b in [1usize, 2, 3, 10, 200, 500] {
                let input = items(n);
                let batches = partition(input.clone(), BatchSize::new(b));

                assert_eq!(batches.len(), n.div_ceil(b), "n={n} b={b}");
                for batch in &batches[..batches.len() - 1] {
                    assert_eq!(batch.len(), b);
                }
                let last = batches.last().unwrap().len();
                assert_eq!(last, if n % b == 0 { b } else { n % b });

                let rebuilt: Vec<DataItem> =
                    batches.into_iter().flat_map(|b| b.items).collect();
                assert_eq!(rebuilt, input);
                assert_eq!(
                    plan_batch_sizes(n, BatchSize::new(b)).iter().sum::<usize>(),
                    n
                );
            }
        }
    }
}
