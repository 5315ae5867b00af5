//! chainsubmit-evm — EVM binding for ChainSubmit.
//!
//! - [`SubmitContractAbi`] — ABI encoding for `submitBatchData` and
//!   `getCurrentFieldDataHash`, built on alloy-rs
//! - [`RpcBatchContract`] — a [`BatchContract`](chainsubmit_core::BatchContract)
//!   that signs through a wallet-backed JSON-RPC endpoint (`eth_sendTransaction`)

pub mod abi;
pub mod contract;
pub mod receipt;

pub use abi::{AbiError, SubmitContractAbi, SUBMIT_CONTRACT_ABI};
pub use contract::RpcBatchContract;
pub use receipt::RpcReceipt;
