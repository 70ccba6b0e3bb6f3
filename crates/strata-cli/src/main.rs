//! # strata-cli
//!
//! Command-line interface for invoking Strata smart contracts.
//!
//! ## Usage
//!
//! ```bash
//! # Print the call payload
//! strata encode --method 'transfer(address,uint256)' \
//!     --params '[{"address":"TLZVYZskxoJt4M4bYHPJm5hdM4PUWSGNPr"},{"uint256":"1000"}]'
//!
//! # Compute a transaction id
//! strata txid --tx f8...
//!
//! # Call a contract and wait for the receipt
//! strata trigger --contract TBXSw8fM4jpQkGc6zZjsVABFpVN7UvXPdV \
//!     --method 'transfer(address,uint256)' --params '[...]' --key ac09...
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Strata CLI
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// RPC endpoint URL
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the ABI-encoded call payload
    Encode(commands::encode::EncodeArgs),
    /// Compute a transaction id
    Txid(commands::txid::TxidArgs),
    /// Call a contract: assemble, sign, broadcast, confirm
    Trigger(commands::trigger::TriggerArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set RPC URL
        #[arg(long)]
        set_rpc: Option<String>,
        /// Set the default fee limit
        #[arg(long)]
        set_fee_limit: Option<u64>,
        /// Set the confirmation wait in seconds
        #[arg(long)]
        set_wait: Option<u32>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut config = Config::load();
    if let Some(rpc_url) = cli.rpc_url {
        config.rpc_url = rpc_url;
    }

    let result = match cli.command {
        Commands::Encode(args) => args.execute(cli.json),
        Commands::Txid(args) => args.execute(cli.json),
        Commands::Trigger(args) => args.execute(&config, cli.json).await,
        Commands::Config {
            show,
            set_rpc,
            set_fee_limit,
            set_wait,
        } => handle_config(&mut config, show, set_rpc, set_fee_limit, set_wait, cli.json),
    };

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

fn handle_config(
    config: &mut Config,
    show: bool,
    set_rpc: Option<String>,
    set_fee_limit: Option<u64>,
    set_wait: Option<u32>,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(rpc) = set_rpc {
        config.rpc_url = rpc;
        modified = true;
    }
    if let Some(fee_limit) = set_fee_limit {
        config.fee_limit = fee_limit;
        modified = true;
    }
    if let Some(wait) = set_wait {
        config.confirmation_wait = wait;
        modified = true;
    }

    if modified {
        let path = config.save()?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &path.display().to_string())
            .line(format!("Configuration saved to {}", path.display()))
            .print();
    } else if show {
        Output::new(json)
            .field("rpc_url", &config.rpc_url)
            .field_u64("rpc_timeout_ms", config.rpc_timeout_ms)
            .field_u64("fee_limit", config.fee_limit)
            .field_u64("confirmation_wait", u64::from(config.confirmation_wait))
            .line(format!("RPC URL: {}", config.rpc_url))
            .line(format!("RPC timeout: {} ms", config.rpc_timeout_ms))
            .line(format!("Fee limit: {}", config.fee_limit))
            .line(format!("Confirmation wait: {} s", config.confirmation_wait))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-rpc/--set-fee-limit/--set-wait to modify")
            .print();
    }

    Ok(())
}
