//! Data model shared by every stage of the submission pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte digest as stored by the contract (`bytes32`).
pub type Bytes32 = [u8; 32];

/// Render a 32-byte value as `0x`-prefixed lowercase hex.
pub fn bytes32_hex(bytes: &Bytes32) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// One input row: three content identifiers naming the property, the data
/// group and the data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    pub property_cid: String,
    pub data_group_cid: String,
    pub data_cid: String,
}

impl DataItem {
    pub fn new(
        property_cid: impl Into<String>,
        data_group_cid: impl Into<String>,
        data_cid: impl Into<String>,
    ) -> Self {
        Self {
            property_cid: property_cid.into(),
            data_group_cid: data_group_cid.into(),
            data_cid: data_cid.into(),
        }
    }
}

/// A [`DataItem`] with every CID replaced by its embedded digest: the shape
/// of one element of the `submitBatchData` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedDataItem {
    pub property_hash: Bytes32,
    pub data_group_hash: Bytes32,
    pub data_hash: Bytes32,
}

impl fmt::Display for PreparedDataItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{propertyHash: {}, dataGroupHash: {}, dataHash: {}}}",
            bytes32_hex(&self.property_hash),
            bytes32_hex(&self.data_group_hash),
            bytes32_hex(&self.data_hash),
        )
    }
}

/// An ordered, contiguous run of input items submitted as one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Offset of the first item of this batch in the original input.
    pub offset: usize,
    pub items: Vec<DataItem>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of one confirmed batch transaction.
///
/// `gas_used` is a decimal string so that large values survive JSON
/// consumers without precision loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSubmissionResult {
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: String,
    pub items_submitted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_camel_case() {
        let result = BatchSubmissionResult {
            transaction_hash: "0xabc".into(),
            block_number: 42,
            gas_used: "21000".into(),
            items_submitted: 3,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"transactionHash\":\"0xabc\""));
        assert!(json.contains("\"gasUsed\":\"21000\""));
        assert!(json.contains("\"itemsSubmitted\":3"));
    }

    #[test]
    fn bytes32_hex_is_prefixed_and_fixed_width() {
        let mut b = [0u8; 32];
        b[31] = 0xff;
        let s = bytes32_hex(&b);
        assert_eq!(s.len(), 66);
        assert!(s.starts_with("0x00"));
        assert!(s.ends_with("ff"));
    }
}
