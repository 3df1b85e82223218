use std::process::ExitCode;

use clap::{Parser, Subcommand};
use inspector_core::fee_estimator::{FeeEstimator, FeeEstimatorConfig};
use inspector_core::{estimate_transfer, inspect_transaction, network_fee, InspectError};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tx-inspect", about = "Decode Solana transactions and estimate fees", version)]
struct Args {
    #[command(subcommand)]
    cmd: Cmd,

    /// Network key: mainnet, testnet or devnet
    #[arg(long, global = true, env = "TX_INSPECT_NETWORK", default_value = "mainnet")]
    network: String,

    /// Override the network's RPC endpoint
    #[arg(long, global = true, env = "TX_INSPECT_RPC_URL")]
    rpc_url: Option<String>,

    /// RPC request timeout in milliseconds
    #[arg(long, global = true, env = "TX_INSPECT_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,

    /// Priority fee (lamports) reported when recent fees are all zero
    #[arg(long, global = true, env = "TX_INSPECT_MIN_PRIORITY_FEE", default_value_t = 1_000)]
    min_priority_fee: u64,
}

#[derive(Subcommand)]
enum Cmd {
    /// Decode a base64 transaction and print it as JSON
    Decode { base64: String },
    /// Print the current network fee
    Fee,
    /// Estimate the total cost of a SOL transfer
    Estimate {
        /// Amount in SOL
        #[arg(long)]
        amount: f64,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), InspectError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn build_estimator(args: &Args) -> Result<FeeEstimator, InspectError> {
    let config = FeeEstimatorConfig {
        min_priority_fee_lamports: args.min_priority_fee,
        request_timeout_ms: args.timeout_ms,
        ..FeeEstimatorConfig::default()
    };
    let mut estimator = FeeEstimator::new(config)?;
    if let Some(url) = &args.rpc_url {
        let network = estimator.resolve_network(&args.network);
        estimator.register_network(network.with_rpc_url(url.clone()));
    }
    Ok(estimator)
}

async fn run(args: Args) -> Result<(), InspectError> {
    match &args.cmd {
        Cmd::Decode { base64 } => print_json(&inspect_transaction(base64)?),
        Cmd::Fee => {
            let estimator = build_estimator(&args)?;
            print_json(&network_fee(&estimator, &args.network).await)
        }
        Cmd::Estimate { amount } => {
            let estimator = build_estimator(&args)?;
            print_json(&estimate_transfer(&estimator, *amount, &args.network).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            if let Some(decode) = e.decode_error() {
                eprintln!("diagnostic: {decode:?}");
            }
            ExitCode::FAILURE
        }
    }
}
