//! loanlens CLI entry point
//!
//! Command-line front end for the loan board: fetch and render the active
//! loan listing once, or keep it current against wallet events.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::process;
use std::sync::Arc;

use loanlens::board::BoardState;
use loanlens::chain::{ContractLoanRegistry, LoanRegistry};
use loanlens::config::LensConfig;
use loanlens::loader::fetch_active_loans;
use loanlens::logging::init_tracing;
use loanlens::metadata::{NftMetadataClient, OpenSeaClient};
use loanlens::render::render_board;
use loanlens::session::{LocalWalletBridge, WalletBridge};
use loanlens::watch::LoanWatcher;

//-----------------------------------------------------------------------------
// Command Definition
//-----------------------------------------------------------------------------

/// Microloan active-loan viewer
///
/// Reads active loan requests from the deployed Microloan contract and
/// resolves each loan's collateral NFT image.
#[derive(Debug, Parser)]
#[command(name = "loanlens", about = "Active-loan viewer for the Microloan contract")]
struct Cli {
    /// Log level directive (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the active loan listing once and render it
    List {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Render the listing and refetch on wallet account or chain changes
    Watch {
        #[command(flatten)]
        connection: ConnectionArgs,
    },
}

/// Connection settings, overriding environment configuration
#[derive(Debug, Args)]
struct ConnectionArgs {
    /// RPC URL of the EVM node
    #[arg(long)]
    rpc_url: Option<String>,

    /// Address of the deployed Microloan contract
    #[arg(long)]
    contract: Option<String>,

    /// Numeric chain ID
    #[arg(long)]
    chain_id: Option<u64>,

    /// BIP-39 mnemonic for the local wallet
    #[arg(long)]
    mnemonic: Option<String>,

    /// Base URL of the NFT metadata API
    #[arg(long)]
    metadata_url: Option<String>,

    /// Chain slug used in metadata API paths
    #[arg(long)]
    chain_slug: Option<String>,
}

impl ConnectionArgs {
    /// Environment configuration with CLI overrides applied
    fn into_config(self) -> anyhow::Result<LensConfig> {
        let mut config = LensConfig::from_env()?;
        if let Some(rpc_url) = self.rpc_url {
            config.rpc_url = rpc_url;
        }
        if let Some(contract) = self.contract {
            config.contract_address = contract;
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        if let Some(mnemonic) = self.mnemonic {
            config.mnemonic = mnemonic;
        }
        if let Some(metadata_url) = self.metadata_url {
            config.metadata_base_url = metadata_url;
        }
        if let Some(chain_slug) = self.chain_slug {
            config.chain_slug = chain_slug;
        }
        config.validate()?;
        Ok(config)
    }
}

//-----------------------------------------------------------------------------
// Main Function
//-----------------------------------------------------------------------------

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_level.as_deref(), cli.json_logs) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let result = match cli.command {
        Command::List { connection } => handle_list_command(connection).await,
        Command::Watch { connection } => handle_watch_command(connection).await,
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".red().bold(), err);
        process::exit(1);
    }
}

//-----------------------------------------------------------------------------
// Command Handlers
//-----------------------------------------------------------------------------

/// Handle the list command
async fn handle_list_command(connection: ConnectionArgs) -> anyhow::Result<()> {
    let config = connection.into_config()?;

    println!("{}", "Fetching active loans...".cyan().bold());

    let bridge = LocalWalletBridge::new(config.mnemonic.clone(), config.chain_id)?;
    let registry = ContractLoanRegistry::new(&config)?;
    let nft = OpenSeaClient::new(&config)?;

    let batch = fetch_active_loans(Some(&bridge), &registry, &nft).await?;
    println!("{}", render_board(&BoardState::Loaded(batch)));

    Ok(())
}

/// Handle the watch command
async fn handle_watch_command(connection: ConnectionArgs) -> anyhow::Result<()> {
    let config = connection.into_config()?;

    let bridge: Arc<dyn WalletBridge> =
        Arc::new(LocalWalletBridge::new(config.mnemonic.clone(), config.chain_id)?);
    let registry: Arc<dyn LoanRegistry> = Arc::new(ContractLoanRegistry::new(&config)?);
    let nft: Arc<dyn NftMetadataClient> = Arc::new(OpenSeaClient::new(&config)?);

    let watcher = LoanWatcher::new(bridge, registry, nft);
    let mut updates = watcher.subscribe_updates();
    let runner = tokio::spawn(watcher.run());

    println!(
        "{}",
        "Watching for wallet events. Press Ctrl+C to stop.".cyan().bold()
    );

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    tracing::warn!("Board update channel closed, stopping watch loop");
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!("{}", render_board(&snapshot));
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopping watcher".yellow());
                break;
            }
        }
    }

    runner.abort();
    let _ = runner.await;
    Ok(())
}
