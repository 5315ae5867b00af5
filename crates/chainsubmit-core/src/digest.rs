//! CID → `bytes32` conversion.
//!
//! The contract stores the raw sha2-256 digest carried inside each content
//! identifier, so the digest is extracted from the CID's multihash rather than
//! computed over the CID string. Both CIDv0 (`Qm…`, base58btc) and CIDv1 in any
//! multibase encoding are accepted; the codec is ignored.

use cid::Cid;

use crate::error::SubmitError;
use crate::types::{bytes32_hex, Bytes32, DataItem, PreparedDataItem};

/// Multihash code for sha2-256.
pub const SHA2_256_CODE: u64 = 0x12;

/// Extract the 32-byte sha2-256 digest embedded in `cid`.
pub fn cid_to_digest(cid: &str) -> Result<Bytes32, SubmitError> {
    let trimmed = cid.trim();
    let cleaned = trimmed.strip_prefix('.').unwrap_or(trimmed);

    let parsed = Cid::try_from(cleaned).map_err(|e| SubmitError::InvalidIdentifier {
        cid: cid.to_string(),
        reason: e.to_string(),
    })?;

    let hash = parsed.hash();
    let digest = hash.digest();
    if hash.code() != SHA2_256_CODE || digest.len() != 32 {
        return Err(SubmitError::UnsupportedHashAlgorithm {
            cid: cid.to_string(),
            code: hash.code(),
            size: digest.len(),
        });
    }

    let mut out = [0u8; 32];
    out.copy_from_slice(digest);
    Ok(out)
}

/// Same as [`cid_to_digest`], rendered as `0x`-prefixed hex.
pub fn cid_to_hash_hex(cid: &str) -> Result<String, SubmitError> {
    cid_to_digest(cid).map(|d| bytes32_hex(&d))
}

/// Convert all three identifiers of an item. Fails on the first bad CID.
pub fn prepare_item(item: &DataItem) -> Result<PreparedDataItem, SubmitError> {
    Ok(PreparedDataItem {
        property_hash: cid_to_digest(&item.property_cid)?,
        data_group_hash: cid_to_digest(&item.data_group_cid)?,
        data_hash: cid_to_digest(&item.data_cid)?,
    })
}
