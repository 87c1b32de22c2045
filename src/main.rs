use anyhow::Result;
use btc_supply::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for btc_supply::AppCommand {
    fn from(cmd: Commands) -> btc_supply::AppCommand {
        match cmd {
            Commands::Status { json } => btc_supply::AppCommand::Status { json },
            Commands::Watch => btc_supply::AppCommand::Watch,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch once and display the supply dashboard
    Status {
        /// Print state and projections as JSON
        #[arg(long)]
        json: bool,
    },
    /// Keep polling and redraw the dashboard until Ctrl-C
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => btc_supply::cli::setup::setup_at_path(path),
            None => btc_supply::cli::setup::setup(),
        },
        Some(cmd) => btc_supply::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
