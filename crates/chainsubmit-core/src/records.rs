//! CSV input loading.
//!
//! The input file carries one row per submission with the columns listed in
//! [`REQUIRED_COLUMNS`]. Rows missing any of the three CIDs are dropped; the
//! provenance columns are carried along but never reach the contract.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::RecordError;
use crate::types::DataItem;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "propertyCid",
    "dataGroupCid",
    "dataCid",
    "filePath",
    "uploadedAt",
];

/// One row of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvRecord {
    #[serde(default)]
    pub property_cid: String,
    #[serde(default)]
    pub data_group_cid: String,
    #[serde(default)]
    pub data_cid: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub uploaded_at: String,
}

impl CsvRecord {
    fn has_all_cids(&self) -> bool {
        !self.property_cid.trim().is_empty()
            && !self.data_group_cid.trim().is_empty()
            && !self.data_cid.trim().is_empty()
    }

    pub fn to_data_item(&self) -> DataItem {
        DataItem::new(
            self.property_cid.trim(),
            self.data_group_cid.trim(),
            self.data_cid.trim(),
        )
    }
}

/// Validated rows ready for partitioning.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub records: Vec<CsvRecord>,
    /// Rows discarded because a CID column was empty.
    pub dropped: usize,
}

impl RecordSet {
    pub fn data_items(&self) -> Vec<DataItem> {
        self.records.iter().map(CsvRecord::to_data_item).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read and validate CSV rows from `reader`.
pub fn load_records<R: Read>(reader: R) -> Result<RecordSet, RecordError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(RecordError::MissingColumns { missing });
    }

    let mut set = RecordSet::default();
    for row in rdr.deserialize::<CsvRecord>() {
        let record = row?;
        if record.has_all_cids() {
            set.records.push(record);
        } else {
            set.dropped += 1;
        }
    }

    if set.records.is_empty() {
        return Err(RecordError::NoValidRows);
    }

    if set.dropped > 0 {
        debug!(dropped = set.dropped, "skipped rows with empty CID columns");
    }
    info!(rows = set.records.len(), "loaded CSV records");
    Ok(set)
}

pub fn load_records_from_path(path: impl AsRef<Path>) -> Result<RecordSet, RecordError> {
    let file = std::fs::File::open(path)?;
    load_records(std::io::BufReader::new(file))
}
