//! CLI application for railway receipt extraction.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract};

/// Railway receipt extractor - pull RR fields out of PDF documents
#[derive(Parser)]
#[command(name = "rrx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file (default: the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract RR fields from a single PDF
    Extract(extract::ExtractArgs),

    /// Extract RR fields from many PDFs
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The model API key may live in a .env file next to the working directory
    dotenvy::dotenv().ok();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = config::resolve_config_path(cli.config.as_deref());
    debug!("Using config file {:?}", config_path);

    // Execute command
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path.as_deref()).await,
        Commands::Batch(args) => batch::run(args, config_path.as_deref()).await,
        Commands::Config(args) => config::run(args, config_path.as_deref()).await,
    }
}
