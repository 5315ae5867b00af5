//! `chainsubmit submit` — send every CSV row to the contract, batch by batch.

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use chainsubmit_core::{
    load_records_from_path, plan_batch_sizes, BatchSubmissionResult, DataItem,
    SubmissionSequencer,
};
use chainsubmit_evm::RpcBatchContract;
use chainsubmit_rpc::HttpRpcClient;

use crate::settings::{ConnectionArgs, SubmitArgs};

pub async fn run(
    csv: &Path,
    skip: usize,
    connection: &ConnectionArgs,
    overrides: &SubmitArgs,
    as_json: bool,
) -> Result<()> {
    let mut file = connection.resolve()?;
    overrides.apply(&mut file.submit);
    let config = file.submit;
    config.validate()?;
    debug!(?config, "resolved configuration");

    let records = load_records_from_path(csv)
        .with_context(|| format!("load records from '{}'", csv.display()))?;
    println!(
        "Loaded {} records from {} ({} dropped with empty CIDs)",
        records.len(),
        csv.display(),
        records.dropped
    );

    let items = remaining_items(records.data_items(), skip)?;
    let sizes = plan_batch_sizes(items.len(), config.batch_size);
    println!(
        "Submitting {} items in {} batches of up to {} to {}",
        items.len(),
        sizes.len(),
        config.batch_size.get(),
        config.contract_address
    );

    let transport = Arc::new(HttpRpcClient::default_for(&config.rpc_url)?);
    let contract = RpcBatchContract::connect(transport, &config).await?;
    println!("Signer:  {} (chain {})", contract.from_address(), config.chain_id);

    let sequencer = SubmissionSequencer::new(contract, config.batch_size);
    let results = sequencer.submit_all(items);
    futures::pin_mut!(results);

    let total_batches = sizes.len();
    let mut confirmed: Vec<BatchSubmissionResult> = Vec::with_capacity(total_batches);
    while let Some(next) = results.next().await {
        match next {
            Ok(result) => {
                println!(
                    "  ✓ batch {}/{}  {}  items={}  block={}  gas={}",
                    confirmed.len() + 1,
                    total_batches,
                    result.transaction_hash,
                    result.items_submitted,
                    result.block_number,
                    result.gas_used
                );
                confirmed.push(result);
            }
            Err(e) => {
                print_summary(&confirmed, as_json)?;
                eprintln!("  ✗ {e}");
                eprintln!(
                    "Batches before {} are on-chain; resume with --skip {}",
                    e.batch_number,
                    skip + e.first_unsubmitted_item
                );
                return Err(e.into());
            }
        }
    }

    print_summary(&confirmed, as_json)
}

/// Drop the first `skip` items of a previous, partially confirmed run.
fn remaining_items(items: Vec<DataItem>, skip: usize) -> Result<Vec<DataItem>> {
    if skip >= items.len() {
        bail!(
            "--skip {} leaves nothing to submit ({} valid records)",
            skip,
            items.len()
        );
    }
    Ok(items.into_iter().skip(skip).collect())
}

fn print_summary(confirmed: &[BatchSubmissionResult], as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(confirmed)?);
        return Ok(());
    }
    let items: usize = confirmed.iter().map(|r| r.items_submitted).sum();
    println!();
    println!("Confirmed batches: {}", confirmed.len());
    println!("Items submitted:   {items}");
    Ok(())
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
    fn skip_drops_leading_items() {
        let rest = remaining_items(items(5), 2).unwrap();
        assert_eq!(rest.len(), 3);
        assert_eq!(rest[0].property_cid, "p2");
    }

    #[test]
    fn skip_past_the_end_is_an_error() {
        assert!(remaining_items(items(2), 2).is_err());
        assert_eq!(remaining_items(items(2), 0).unwrap().len(), 2);
    }
}
