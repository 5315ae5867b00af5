//! `chainsubmit query` — read the current data hash of a (property, data group) pair.

use anyhow::Result;
use std::sync::Arc;

use chainsubmit_core::types::bytes32_hex;
use chainsubmit_core::cid_to_digest;
use chainsubmit_evm::RpcBatchContract;
use chainsubmit_rpc::HttpRpcClient;

use crate::settings::ConnectionArgs;

pub async fn run(property_cid: &str, data_group_cid: &str, connection: &ConnectionArgs) -> Result<()> {
    let config = connection.resolve()?.submit;
    config.validate()?;

    let property_hash = cid_to_digest(property_cid)?;
    let data_group_hash = cid_to_digest(data_group_cid)?;

    // eth_call is sent without a sender; the account is only a placeholder.
    let from = config.from.clone().unwrap_or_else(|| format!("0x{}", "0".repeat(40)));
    let transport = Arc::new(HttpRpcClient::default_for(&config.rpc_url)?);
    let contract = RpcBatchContract::new(transport, config.contract_address.clone(), from)?;

    let current = contract
        .current_field_data_hash(&property_hash, &data_group_hash)
        .await?;

    println!("Property:    {property_cid}  {}", bytes32_hex(&property_hash));
    println!("Data group:  {data_group_cid}  {}", bytes32_hex(&data_group_hash));
    if current == [0u8; 32] {
        println!("Data hash:   (none submitted)");
    } else {
        println!("Data hash:   {}", bytes32_hex(&current));
    }
    Ok(())
}
