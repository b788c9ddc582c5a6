//! tabscan - HTTP relay that extracts tablet details from photos.
//!
//! Accepts a tablet image over `POST /upload`, forwards it to Gemini with a
//! fixed extraction prompt, and returns the model's free-text answer.
//!
//! # Usage
//!
//! ```bash
//! # Run the relay (requires GEMINI_API_KEY)
//! tabscan serve
//!
//! # One-shot extraction for a local file
//! tabscan analyze tablet1.jpg
//!
//! # View configuration
//! tabscan config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// tabscan - tablet image extraction relay.
#[derive(Parser, Debug)]
#[command(name = "tabscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP relay server
    Serve(cli::serve::ServeArgs),

    /// Analyze a local image file and print the extraction
    Analyze(cli::analyze::AnalyzeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Note: logging isn't initialized yet, so use eprintln for config warnings.
    let config = match &cli.config {
        Some(path) => tabscan_core::Config::load_from(path)?,
        None => match tabscan_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `tabscan config path`."
                );
                tabscan_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("tabscan v{}", tabscan_core::VERSION);

    // Dispatch to the appropriate command handler
    match cli.command {
        Commands::Serve(args) => cli::serve::execute(config, args).await,
        Commands::Analyze(args) => cli::analyze::execute(config, args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
