//! `eth_getTransactionReceipt` response parsing.

use alloy_primitives::U256;
use serde::Deserialize;

use chainsubmit_core::{SubmitError, TxReceipt};

/// A transaction receipt as returned by `eth_getTransactionReceipt`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    /// `null` on some nodes while the transaction is still pending.
    pub block_number: Option<String>,
    pub gas_used: String,
    /// `0x1` success, `0x0` reverted; absent before Byzantium.
    #[serde(default)]
    pub status: Option<String>,
}

impl RpcReceipt {
    pub fn is_mined(&self) -> bool {
        self.block_number.is_some()
    }

    /// Convert hex quantities into the pipeline's receipt.
    pub fn into_tx_receipt(self) -> Result<TxReceipt, SubmitError> {
        let block_number = self
            .block_number
            .as_deref()
            .ok_or_else(|| malformed("receipt has no block number"))
            .and_then(parse_quantity_u64)?;
        let gas_used = parse_quantity_u256(&self.gas_used)?.to_string();
        let success = match self.status.as_deref() {
            None => true,
            Some(s) => parse_quantity_u64(s)? == 1,
        };

        Ok(TxReceipt {
            transaction_hash: self.transaction_hash,
            block_number,
            gas_used,
            success,
        })
    }
}

/// Parse a `0x`-prefixed hex quantity into `u64`.
pub fn parse_quantity_u64(s: &str) -> Result<u64, SubmitError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| malformed(&format!("quantity '{s}': {e}")))
}

fn parse_quantity_u256(s: &str) -> Result<U256, SubmitError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    U256::from_str_radix(digits, 16).map_err(|e| malformed(&format!("quantity '{s}': {e}")))
}

fn malformed(reason: &str) -> SubmitError {
    SubmitError::Transport {
        reason: format!("malformed node response: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_mined_receipt() {
        let r: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x3a2b1c",
            "gasUsed": "0x5208",
            "status": "0x1",
            "logs": []
        }))
        .unwrap();
        assert!(r.is_mined());
        let receipt = r.into_tx_receipt().unwrap();
        assert_eq!(receipt.block_number, 0x3a2b1c);
        assert_eq!(receipt.gas_used, "21000");
        assert!(receipt.success);
    }

    #[test]
    fn reverted_status_is_not_success() {
        let r: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x1",
            "gasUsed": "0x1",
            "status": "0x0"
        }))
        .unwrap();
        assert!(!r.into_tx_receipt().unwrap().success);
    }

    #[test]
    fn gas_used_keeps_full_precision() {
        let r: RpcReceipt = serde_json::from_value(json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x1",
            "gasUsed": "0x1000000000000000000000000"
        }))
        .unwrap();
        assert_eq!(
            r.into_tx_receipt().unwrap().gas_used,
            "79228162514264337593543950336"
        );
    }

    #[test]
    fn bad_quantity_is_transport_error() {
        assert!(matches!(
            parse_quantity_u64("0xzz"),
            Err(SubmitError::Transport { .. })
        ));
        assert_eq!(parse_quantity_u64("0x89").unwrap(), 137);
    }
}
