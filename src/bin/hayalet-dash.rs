// Hayalet Dashboard - operator CLI
// Live view of the trading engine plus the control panel commands

use clap::{Parser, Subcommand};
use tracing::{error, info, warn, Level};
use hayalet_dashboard::{CommandType, Config, DashboardError, DashboardResult};

// Load command modules from cli directory
#[path = "../cli/control_commands.rs"]
mod control_commands;
#[path = "../cli/watch_commands.rs"]
mod watch_commands;

#[derive(Parser)]
#[command(name = "hayalet-dash")]
#[command(version = "0.2.0")]
#[command(about = "Hayalet engine dashboard and control panel", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Live dashboard, kept in sync over push with pull fallback
    Watch {
        /// Render the first snapshot and exit
        #[arg(long)]
        once: bool,
    },

    /// Fetch and print the engine status once
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Engine health check
    Health,

    /// Pause the engine
    Pause,

    /// Resume a paused or frozen engine
    Resume,

    /// Hedge every open position
    HedgeAll,

    /// Close every open position
    CloseAll {
        /// Confirm the close-all
        #[arg(short, long)]
        yes: bool,
    },

    /// Freeze the engine
    Freeze,

    /// Open a position
    Open {
        /// Symbol (e.g., EURUSD)
        symbol: String,

        /// BUY or SELL
        side: String,

        /// Lots
        volume: f64,

        /// Limit price (market order when omitted)
        #[arg(long)]
        price: Option<f64>,

        /// Take profit
        #[arg(long)]
        tp: Option<f64>,

        /// Stop loss
        #[arg(long)]
        sl: Option<f64>,

        /// Magic number
        #[arg(long)]
        magic: Option<i64>,

        /// Target account
        #[arg(long)]
        account: Option<String>,
    },

    /// Close one position
    Close {
        /// Position ticket
        ticket: i64,

        /// Target account
        #[arg(long)]
        account: Option<String>,
    },

    /// Change take profit / stop loss of a position
    Modify {
        /// Position ticket
        ticket: i64,

        #[arg(long)]
        tp: Option<f64>,

        #[arg(long)]
        sl: Option<f64>,

        /// Target account
        #[arg(long)]
        account: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging first (before config load so we can see config errors)
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Config::from_file(&cli.config)
            .ok()
            .and_then(|config| config.logging.level.parse().ok())
            .unwrap_or(Level::INFO)
    };
    // stderr keeps log lines out of the watch redraw on stdout
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("👻 Hayalet Dashboard v0.2.0");

    let result = match cli.command {
        // Init doesn't require config (it creates it)
        Commands::Init { force } => init_config(force, &cli.config),
        command => {
            let config = load_config_or_exit(&cli.config);
            run(command, &config).await
        }
    };

    if let Err(e) = result {
        error!("❌ [{}] {}", e.category(), e.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> DashboardResult<()> {
    match command {
        Commands::Init { .. } => Ok(()),
        Commands::Watch { once } => watch_commands::watch(once, config).await,
        Commands::Status { json } => watch_commands::status(json, config).await,
        Commands::Health => watch_commands::health(config).await,
        Commands::Pause => control_commands::send_lifecycle(CommandType::Pause, true, config).await,
        Commands::Resume => control_commands::send_lifecycle(CommandType::Resume, true, config).await,
        Commands::HedgeAll => control_commands::send_lifecycle(CommandType::HedgeAll, true, config).await,
        Commands::CloseAll { yes } => control_commands::send_lifecycle(CommandType::CloseAll, yes, config).await,
        Commands::Freeze => control_commands::send_lifecycle(CommandType::Freeze, true, config).await,
        Commands::Open { symbol, side, volume, price, tp, sl, magic, account } => {
            control_commands::open_order(symbol, &side, volume, price, tp, sl, magic, account, config).await
        }
        Commands::Close { ticket, account } => control_commands::close_order(ticket, account, config).await,
        Commands::Modify { ticket, tp, sl, account } => {
            control_commands::modify_order(ticket, tp, sl, account, config).await
        }
    }
}

/// Load config, or fall back to defaults when the file is missing
fn load_config_or_exit(path: &str) -> Config {
    match Config::load_or_default(path) {
        Ok(config) => {
            if !std::path::Path::new(path).exists() {
                warn!("⚠️  {} not found, using defaults (engine at {})", path, config.api.base_url);
            }
            config
        }
        Err(e) => {
            let e = DashboardError::from(e);
            error!("❌ Configuration Error");
            error!("{}", e.user_message());
            std::process::exit(1);
        }
    }
}

fn init_config(force: bool, config_path: &str) -> DashboardResult<()> {
    info!("🔧 Initializing configuration...");

    if std::path::Path::new(config_path).exists() && !force {
        warn!("⚠️  {} already exists, skipping (use --force to overwrite)", config_path);
        return Ok(());
    }

    let default_config = include_str!("../../config.toml.example");
    std::fs::write(config_path, default_config)?;
    info!("📝 Created {}", config_path);

    info!("✅ Configuration initialized!");
    info!("💡 Next steps:");
    info!("   1. Set api.base_url in {} (or export HAYALET_API_URL)", config_path);
    info!("   2. Run: hayalet-dash health");
    info!("   3. Run: hayalet-dash watch");

    Ok(())
}
