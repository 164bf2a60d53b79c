//! gwt - drive a Global Workspace from the terminal
//!
//! Loads configuration, feeds context snapshots into a workspace manager
//! with the reference evaluators, and reports every broadcast along with
//! the final statistics.

use clap::{Parser, Subcommand};
use gwt_runtime::WorkspaceConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::GoalArg;

/// Global Workspace CLI
#[derive(Parser)]
#[command(name = "gwt")]
#[command(about = "Global Workspace - coalition competition and broadcast", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GWT_CONFIG")]
    config: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table", global = true)]
    output: output::OutputFormat,

    /// Top-down attention goal as `content_type=priority`, repeatable
    #[arg(short, long = "goal", value_parser = commands::parse_goal, global = true)]
    goals: Vec<GoalArg>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the built-in scenarios
    Demo,

    /// Run one cycle per context in a JSON or YAML file
    Run {
        /// File holding a list of workspace contexts
        contexts: String,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = WorkspaceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Demo => commands::demo::execute(config, &cli.goals, cli.output).await?,
        Commands::Run { contexts } => {
            commands::run::execute(config, &contexts, &cli.goals, cli.output).await?
        }
        Commands::Config => output::print_single(&config, cli.output)?,
    }

    Ok(())
}
