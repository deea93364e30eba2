//! walletmux CLI
//!
//! Inspect the network table and the persisted session, and drive the
//! connection controller against simulated wallets.

#![allow(clippy::print_stdout)] // CLI program intentionally uses stdout

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use walletmux::error::{DisplayError, ErrorContext, Result, WalletMuxError};
use walletmux::prelude::*;
use walletmux::sim::SimHost;

/// How long `simulate` waits for the controller to react to a wallet event.
const EVENT_WAIT: Duration = Duration::from_secs(2);

/// walletmux - wallet provider aggregator
#[derive(Parser)]
#[command(name = "walletmux")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "WALLETMUX_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration
    Init(InitArgs),

    /// List supported networks
    Networks(NetworksArgs),

    /// Show configuration and the persisted session
    Status,

    /// Clear the persisted session
    Logout,

    /// Run the controller against a simulated wallet
    Simulate(SimulateArgs),
}

/// Arguments for the init command
#[derive(Args)]
struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    force: bool,
}

/// Arguments for the networks command
#[derive(Args)]
struct NetworksArgs {
    /// Only networks this provider may drive
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the simulate command
#[derive(Args)]
struct SimulateArgs {
    /// Provider to connect through
    #[arg(short, long, default_value = "injected-evm")]
    provider: ProviderKind,

    /// Chain the simulated wallet starts on
    #[arg(long, default_value = "1")]
    chain: ChainId,

    /// Network (slug or name) to switch to after connecting
    #[arg(long)]
    switch_to: Option<String>,

    /// Chain the wallet moves to on its own after connecting
    #[arg(long)]
    drift_to: Option<ChainId>,

    /// Sign out at the end
    #[arg(long)]
    signout: bool,

    /// Persist the session record to the configured session file
    #[arg(long)]
    persist: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", DisplayError(&e));
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging with the given verbosity level.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("walletmux={level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .init();
}

/// Main async entry point.
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => cmd_init(args, cli.config).await,
        Commands::Networks(args) => cmd_networks(args, cli.config).await,
        Commands::Status => cmd_status(cli.config).await,
        Commands::Logout => cmd_logout(cli.config).await,
        Commands::Simulate(args) => cmd_simulate(args, cli.config).await,
    }
}

/// Load the configuration from `path`, or the default location.
async fn config_from(path: Option<&PathBuf>) -> Result<WalletMuxConfig> {
    let config = match path {
        Some(path) => walletmux::config::load_config_from(path).await?,
        None => load_config().await?,
    };
    Ok(config)
}

/// Write the default configuration.
async fn cmd_init(args: InitArgs, path: Option<PathBuf>) -> Result<()> {
    let config_file = path.unwrap_or_else(config_path);

    if config_file.exists() && !args.force {
        println!("Configuration already exists at: {}", config_file.display());
        println!("Use --force to overwrite.");
        return Ok(());
    }

    save_config(&WalletMuxConfig::default(), &config_file)
        .await
        .context("failed to initialize config")?;

    println!("Configuration created: {}", config_file.display());
    Ok(())
}

/// List networks.
async fn cmd_networks(args: NetworksArgs, path: Option<PathBuf>) -> Result<()> {
    let config = config_from(path.as_ref()).await?;
    let networks = config.network_registry()?;

    let chains: Vec<&ChainDescriptor> = match args.provider {
        Some(kind) => networks.supported_by(kind).collect(),
        None => networks.iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&chains)?);
        return Ok(());
    }

    println!("{:<12} {:<10} {:<20} {:<6} PROVIDERS", "SLUG", "CHAIN ID", "NAME", "COIN");
    for chain in chains {
        let providers: Vec<&str> = chain.providers.iter().map(|k| k.as_str()).collect();
        println!(
            "{:<12} {:<10} {:<20} {:<6} {}",
            chain.slug,
            chain.chain_id.to_string(),
            chain.name,
            chain.native_currency.symbol,
            providers.join(", ")
        );
    }
    Ok(())
}

/// Show status.
async fn cmd_status(path: Option<PathBuf>) -> Result<()> {
    let config_file = path.clone().unwrap_or_else(config_path);

    println!("walletmux Status\n");

    println!("Configuration:");
    println!("  Path:   {}", config_file.display());
    println!(
        "  Exists: {}",
        if config_file.exists() { "yes" } else { "no" }
    );

    let config = match config_from(path.as_ref()).await {
        Ok(config) => {
            println!("  Valid:  yes");
            config
        }
        Err(e) => {
            println!("  Valid:  no ({e})");
            return Ok(());
        }
    };

    let store = FileSessionStore::new(config.session_path());
    println!();
    println!("Session:");
    println!("  Path:   {}", store.path().display());
    match store.read().await {
        Ok(record) => match record.resumable() {
            Some(kind) => println!(
                "  Signed in through {} ({kind}); will resume on next start",
                kind.wallet_name()
            ),
            None => println!("  Signed out"),
        },
        Err(e) => println!("  Unreadable ({e}); will be cleared on next start"),
    }
    Ok(())
}

/// Clear the persisted session.
async fn cmd_logout(path: Option<PathBuf>) -> Result<()> {
    let config = config_from(path.as_ref()).await?;
    let store = FileSessionStore::new(config.session_path());
    store.clear().await?;
    println!("Session cleared: {}", store.path().display());
    Ok(())
}

/// Drive the controller against a simulated wallet.
async fn cmd_simulate(args: SimulateArgs, path: Option<PathBuf>) -> Result<()> {
    let config = config_from(path.as_ref()).await?;

    let (host, wallet) = SimHost::with_wallet(args.provider, &args.chain).ok_or_else(|| {
        WalletMuxError::config(format!(
            "{} needs a numeric chain id, got {}",
            args.provider, args.chain
        ))
    })?;

    let store: Arc<dyn SessionStore> = if args.persist {
        Arc::new(FileSessionStore::new(config.session_path()))
    } else {
        Arc::new(MemorySessionStore::new())
    };
    let adapters = AdapterRegistry::with_defaults(
        Arc::new(host),
        SettlePolicy::immediate(),
        config.wallet_connect.clone(),
    );
    let controller = ConnectionController::new(config.network_registry()?, adapters, store);

    if args.persist {
        controller.restore().await;
        report(&controller, "restore");
    }

    let result = controller.connect(args.provider).await;
    let connected = print_outcome("connect", &result);
    report(&controller, "connect");
    if !connected {
        return Ok(());
    }

    if let Some(network) = &args.switch_to {
        let result = controller.switch_chain(network).await;
        print_outcome("switch", &result);
        report(&controller, "switch");
    }

    if let Some(chain) = &args.drift_to {
        let mut identity = controller.subscribe();
        if wallet.drift_to(chain) {
            if tokio::time::timeout(EVENT_WAIT, identity.changed()).await.is_err() {
                println!("drift: no identity change within {EVENT_WAIT:?}");
            }
            report(&controller, "drift");
            if controller.take_unknown_chain() {
                println!("drift: wallet moved to an unsupported network and was logged out");
            }
        } else {
            println!("drift: {} cannot change network", args.provider);
        }
    }

    if args.signout {
        controller.signout().await;
        report(&controller, "signout");
    }

    Ok(())
}

/// Print the outcome of `step` and return whether it succeeded.
fn print_outcome(step: &str, result: &ConnectResult) -> bool {
    let outcome = ConnectOutcome::from(result);
    match serde_json::to_string(&outcome) {
        Ok(json) => println!("{step}: {json}"),
        Err(e) => println!("{step}: <unprintable outcome: {e}>"),
    }
    outcome.is_success()
}

fn report(controller: &ConnectionController, step: &str) {
    let identity = controller.identity();
    println!(
        "{step}: state={:?} address={:?} network={} provider={}",
        controller.state(),
        identity.address,
        controller
            .selected_network_name()
            .or_else(|| identity.chain_id.as_ref().map(ToString::to_string))
            .unwrap_or_else(|| "-".to_owned()),
        controller.selected_provider_name().unwrap_or("-"),
    );
}
