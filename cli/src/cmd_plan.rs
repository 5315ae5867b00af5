//! `chainsubmit plan` and `chainsubmit hash` — offline checks, no network traffic.

use anyhow::{bail, Context, Result};
use std::path::Path;

use chainsubmit_core::{
    cid_to_hash_hex, load_records_from_path, plan_batch_sizes, prepare_item, BatchSize,
};

/// Validate every CID in `csv` and print the batch layout a `submit` would use.
pub fn run_plan(csv: &Path, batch_size: BatchSize, skip: usize, as_json: bool) -> Result<()> {
    let records = load_records_from_path(csv)
        .with_context(|| format!("load records from '{}'", csv.display()))?;
    let items: Vec<_> = records.data_items().into_iter().skip(skip).collect();

    let mut invalid = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if let Err(e) = prepare_item(item) {
            invalid.push((skip + i, e.to_string()));
        }
    }
    let sizes = plan_batch_sizes(items.len(), batch_size);

    if as_json {
        let plan = serde_json::json!({
            "records": records.len(),
            "dropped": records.dropped,
            "skipped": skip.min(records.len()),
            "batchSize": batch_size.get(),
            "batches": sizes,
            "invalid": invalid.iter().map(|(row, err)| {
                serde_json::json!({ "item": row, "error": err })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Records:     {} ({} dropped with empty CIDs)", records.len(), records.dropped);
        if skip > 0 {
            println!("Skipped:     {}", skip.min(records.len()));
        }
        println!("Batch size:  {}", batch_size.get());
        println!("Batches:     {}", sizes.len());
        for (n, size) in sizes.iter().enumerate() {
            println!("  batch {:>4}: {} items", n + 1, size);
        }
        for (row, err) in &invalid {
            println!("  ✗ item {row}: {err}");
        }
    }

    if !invalid.is_empty() {
        bail!("{} items carry CIDs that cannot be submitted", invalid.len());
    }
    Ok(())
}

/// Print the `bytes32` digest of each CID.
pub fn run_hash(cids: &[String]) -> Result<()> {
    let mut failed = 0usize;
    for cid in cids {
        match cid_to_hash_hex(cid) {
            Ok(hash) => println!("{cid}  {hash}"),
            Err(e) => {
                eprintln!("✗ {e}");
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} CIDs could not be converted", cids.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("chainsubmit-{}-{name}.csv", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    const HEADER: &str = "propertyCid,dataGroupCid,dataCid,filePath,uploadedAt\n";
    const CID: &str = "bafkreifzjut3te2nhyekklss27nh3k72ysco7y32koao5eei66wof36n5e";

    #[test]
    fn plan_accepts_valid_rows() {
        let body = format!("{HEADER}{CID},{CID},{CID},a.json,2024-01-01\n");
        let path = write_csv("valid", &body);
        run_plan(&path, BatchSize::default(), 0, true).unwrap();
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn plan_rejects_unconvertible_cids() {
        let body = format!("{HEADER}{CID},not-a-cid,{CID},a.json,2024-01-01\n");
        let path = write_csv("invalid", &body);
        let err = run_plan(&path, BatchSize::default(), 0, false).unwrap_err();
        assert!(err.to_string().contains("1 items"), "{err}");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn hash_reports_failures() {
        assert!(run_hash(&[CID.to_string()]).is_ok());
        assert!(run_hash(&[CID.to_string(), "nope".to_string()]).is_err());
    }
}
