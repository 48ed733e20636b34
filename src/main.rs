use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrates::core::log::init_logging;

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

impl From<Commands> for xrates::AppCommand {
    fn from(cmd: Commands) -> xrates::AppCommand {
        match cmd {
            Commands::Rates { filter, pages } => xrates::AppCommand::Rates { filter, pages },
            Commands::Currencies { filter, pages } => {
                xrates::AppCommand::Currencies { filter, pages }
            }
            Commands::Convert { amount, from, to } => {
                xrates::AppCommand::Convert { amount, from, to }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the latest exchange rates
    Rates {
        /// Only show codes containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Display the supported currencies
    Currencies {
        /// Only show codes containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
        /// Number of pages to show
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        #[arg(short, long)]
        amount: String,
        /// Source currency code
        #[arg(short, long)]
        from: String,
        /// Target currency code
        #[arg(short, long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xrates::cli::setup::setup(),
        Some(cmd) => xrates::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
