//! ABI encoding for the data submission contract.
//!
//! # Usage
//! ```ignore
//! let abi = SubmitContractAbi::new()?;
//! let calldata = abi.encode_submit_batch(&prepared_items)?;
//! ```

use alloy_dyn_abi::{DynSolValue, JsonAbiExt};
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::B256;
use thiserror::Error;

use chainsubmit_core::{Bytes32, PreparedDataItem};

/// ABI fragments of the deployed data consensus contract.
pub const SUBMIT_CONTRACT_ABI: &str = r#"[
    {
        "type": "function",
        "name": "getCurrentFieldDataHash",
        "inputs": [
            {"internalType": "bytes32", "name": "propertyHash", "type": "bytes32"},
            {"internalType": "bytes32", "name": "dataGroupHash", "type": "bytes32"}
        ],
        "outputs": [{"internalType": "bytes32", "name": "", "type": "bytes32"}],
        "stateMutability": "view"
    },
    {
        "type": "function",
        "name": "submitBatchData",
        "inputs": [
            {
                "components": [
                    {"internalType": "bytes32", "name": "propertyHash", "type": "bytes32"},
                    {"internalType": "bytes32", "name": "dataGroupHash", "type": "bytes32"},
                    {"internalType": "bytes32", "name": "dataHash", "type": "bytes32"}
                ],
                "internalType": "struct IPropertyDataConsensus.DataItem[]",
                "name": "items",
                "type": "tuple[]"
            }
        ],
        "outputs": [],
        "stateMutability": "nonpayable"
    },
    {
        "type": "event",
        "name": "DataSubmitted",
        "anonymous": false,
        "inputs": [
            {"indexed": true, "internalType": "bytes32", "name": "propertyHash", "type": "bytes32"},
            {"indexed": true, "internalType": "bytes32", "name": "dataGroupHash", "type": "bytes32"},
            {"indexed": true, "internalType": "address", "name": "submitter", "type": "address"},
            {"indexed": false, "internalType": "bytes32", "name": "dataHash", "type": "bytes32"}
        ]
    }
]"#;

/// Errors from ABI parsing, encoding and decoding.
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("invalid ABI JSON: {0}")]
    InvalidAbi(#[from] serde_json::Error),

    #[error("function '{name}' not found in ABI")]
    FunctionNotFound { name: String },

    #[error("encode '{function}': {reason}")]
    Encode { function: String, reason: String },

    #[error("decode: {reason}")]
    Decode { reason: String },
}

/// Encoder for the two contract functions ChainSubmit calls.
#[derive(Debug, Clone)]
pub struct SubmitContractAbi {
    submit_batch: Function,
    current_field_data_hash: Function,
}

impl SubmitContractAbi {
    /// Build from the bundled [`SUBMIT_CONTRACT_ABI`].
    pub fn new() -> Result<Self, AbiError> {
        Self::from_abi_json(SUBMIT_CONTRACT_ABI)
    }

    /// Build from a standard Ethereum ABI JSON string containing both functions.
    pub fn from_abi_json(abi_json: &str) -> Result<Self, AbiError> {
        let abi: JsonAbi = serde_json::from_str(abi_json)?;
        Ok(Self {
            submit_batch: find_function(&abi, "submitBatchData")?,
            current_field_data_hash: find_function(&abi, "getCurrentFieldDataHash")?,
        })
    }

    /// `submitBatchData` calldata: selector followed by the encoded tuple array.
    pub fn encode_submit_batch(&self, items: &[PreparedDataItem]) -> Result<Vec<u8>, AbiError> {
        let tuples = items
            .iter()
            .map(|item| {
                DynSolValue::Tuple(vec![
                    bytes32_value(&item.property_hash),
                    bytes32_value(&item.data_group_hash),
                    bytes32_value(&item.data_hash),
                ])
            })
            .collect();

        self.submit_batch
            .abi_encode_input(&[DynSolValue::Array(tuples)])
            .map_err(|e| AbiError::Encode {
                function: self.submit_batch.name.clone(),
                reason: e.to_string(),
            })
    }

    /// `getCurrentFieldDataHash(propertyHash, dataGroupHash)` calldata.
    pub fn encode_current_field_data_hash(
        &self,
        property_hash: &Bytes32,
        data_group_hash: &Bytes32,
    ) -> Result<Vec<u8>, AbiError> {
        self.current_field_data_hash
            .abi_encode_input(&[bytes32_value(property_hash), bytes32_value(data_group_hash)])
            .map_err(|e| AbiError::Encode {
                function: self.current_field_data_hash.name.clone(),
                reason: e.to_string(),
            })
    }

    /// Decode a single `bytes32` return value.
    pub fn decode_bytes32_output(data: &[u8]) -> Result<Bytes32, AbiError> {
        if data.len() < 32 {
            return Err(AbiError::Decode {
                reason: format!("expected 32 bytes of return data, got {}", data.len()),
            });
        }
        let mut out = [0u8; 32];
        out.copy_from_slice(&data[..32]);
        Ok(out)
    }

    pub fn submit_batch_selector(&self) -> [u8; 4] {
        self.submit_batch.selector().0
    }

    pub fn submit_batch_signature(&self) -> String {
        self.submit_batch.signature()
    }
}

fn find_function(abi: &JsonAbi, name: &str) -> Result<Function, AbiError> {
    abi.function(name)
        .and_then(|overloads| overloads.first())
        .cloned()
        .ok_or_else(|| AbiError::FunctionNotFound {
            name: name.to_string(),
        })
}

fn bytes32_value(bytes: &Bytes32) -> DynSolValue {
    DynSolValue::FixedBytes(B256::from(*bytes), 32)
}
