//! ChainSubmit CLI — anchor CID triples on the data submission contract.
//!
//! # Commands
//! ```
//! chainsubmit submit --csv <path> [--batch-size <n>] [--skip <n>] [--rpc-url <url>]
//! chainsubmit plan   --csv <path> [--batch-size <n>] [--skip <n>]
//! chainsubmit hash   <cid>...
//! chainsubmit query  --property <cid> --data-group <cid>
//! chainsubmit info
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chainsubmit_core::BatchSize;

mod cmd_plan;
mod cmd_query;
mod cmd_submit;
mod logging;
mod settings;

use logging::init_tracing;
use settings::{ConnectionArgs, FileConfig, SubmitArgs};

#[derive(Parser)]
#[command(
    name = "chainsubmit",
    about = "Submit CID batches to the data submission contract — ChainSubmit CLI",
    long_about = "
ChainSubmit CLI: convert IPFS CIDs to bytes32 digests and submit them in
batches through a wallet-backed JSON-RPC endpoint (eth_sendTransaction).

ENVIRONMENT VARIABLES:
  CHAINSUBMIT_CONFIG            YAML config file
  CHAINSUBMIT_RPC_URL           Wallet / node JSON-RPC URL
  CHAINSUBMIT_CONTRACT          Contract address
  CHAINSUBMIT_CHAIN_ID          Expected chain id (default 137)
  CHAINSUBMIT_FROM              Sending account
  CHAINSUBMIT_BATCH_SIZE        Items per transaction (1-500)
  CHAINSUBMIT_RECEIPT_TIMEOUT   Receipt wait limit in seconds
  RUST_LOG                      Log filter (overrides the config file)
",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit every row of an upload CSV, one transaction per batch
    Submit {
        /// CSV with propertyCid, dataGroupCid, dataCid, filePath, uploadedAt columns
        #[arg(long)]
        csv: PathBuf,
        /// Skip the first n valid records (resume a failed run)
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Print the confirmed batches as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        connection: ConnectionArgs,
        #[command(flatten)]
        overrides: SubmitArgs,
    },

    /// Validate a CSV and print its batch plan without sending anything
    Plan {
        #[arg(long)]
        csv: PathBuf,
        /// Items per transaction (clamped to 1..=500)
        #[arg(long, default_value_t = BatchSize::DEFAULT)]
        batch_size: usize,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert CIDs to their bytes32 digests
    Hash {
        #[arg(required = true)]
        cids: Vec<String>,
    },

    /// Read the current data hash for a property and data group
    Query {
        /// Property CID
        #[arg(long)]
        property: String,
        /// Data group CID
        #[arg(long)]
        data_group: String,
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Show ChainSubmit build and default settings
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.command {
        Commands::Submit { connection, .. } | Commands::Query { connection, .. } => {
            connection.config.clone()
        }
        _ => None,
    };
    let mut log = FileConfig::load(config_path.as_deref())
        .map(|f| f.log)
        .unwrap_or_default();
    if cli.verbose {
        log.level = "debug".into();
    }
    log.json |= cli.log_json;
    init_tracing(&log);

    match cli.command {
        Commands::Submit { csv, skip, json, connection, overrides } => {
            cmd_submit::run(&csv, skip, &connection, &overrides, json).await
        }

        Commands::Plan { csv, batch_size, skip, json } => {
            cmd_plan::run_plan(&csv, BatchSize::new(batch_size), skip, json)
        }

        Commands::Hash { cids } => cmd_plan::run_hash(&cids),

        Commands::Query { property, data_group, connection } => {
            cmd_query::run(&property, &data_group, &connection).await
        }

        Commands::Info => cmd_info(),
    }
}

fn cmd_info() -> Result<()> {
    use chainsubmit_core::config::{DEFAULT_CHAIN_ID, DEFAULT_CONTRACT_ADDRESS, DEFAULT_RPC_URL};
    use chainsubmit_core::GAS_MARGIN_PERCENT;
    use chainsubmit_evm::SubmitContractAbi;

    let abi = SubmitContractAbi::new()?;

    println!("ChainSubmit v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Defaults:");
    println!("  Contract:    {DEFAULT_CONTRACT_ADDRESS}");
    println!("  RPC URL:     {DEFAULT_RPC_URL}");
    println!("  Chain id:    {DEFAULT_CHAIN_ID} (Polygon)");
    println!("  Batch size:  {} (max {})", BatchSize::DEFAULT, BatchSize::MAX);
    println!("  Gas margin:  +{GAS_MARGIN_PERCENT}%");
    println!();
    println!("Contract call:");
    println!(
        "  {}  0x{}",
        abi.submit_batch_signature(),
        hex::encode(abi.submit_batch_selector())
    );
    println!();
    println!("Identifiers: CIDv0 / CIDv1 with sha2-256 multihash");
    Ok(())
}
