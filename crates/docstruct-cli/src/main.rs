//! CLI application for turning a biography document into key/value rows.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use commands::{config, process, rules};

/// docstruct - Extract structured key/value rows from unstructured documents
#[derive(Parser)]
#[command(name = "docstruct")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract rows from a document and write the table and JSON outputs
    Process(process::ProcessArgs),

    /// Inspect and check rule sets
    Rules(rules::RulesArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity; RUST_LOG takes precedence
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = FmtSubscriber::builder()
        .with_target(false)
        .with_writer(std::io::stderr);

    match EnvFilter::try_from_default_env() {
        Ok(filter) => tracing::subscriber::set_global_default(builder.with_env_filter(filter).finish())?,
        Err(_) => tracing::subscriber::set_global_default(builder.with_max_level(level).finish())?,
    }

    // Execute command
    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()),
        Commands::Rules(args) => rules::run(args),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
