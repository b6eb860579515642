//! # shortwire CLI
//!
//! Command-line front door for the shortwire mapping runtime.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shortwire")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the durable mapping state
    #[arg(long, env = "SHORTWIRE_DATA_DIR", default_value = ".shortwire")]
    data_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Issue a short key for a URL
    Shorten {
        /// The full URL to shorten
        url: String,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Resolve a short key to its target URL
    Resolve {
        /// The short key to resolve
        key: String,
    },

    /// Write a mapping for a chosen key
    Set {
        /// The short key to write
        key: String,

        /// The full URL the key should resolve to
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so command output stays clean
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Shorten { url, json } => commands::shorten_url(&cli.data_dir, &url, json).await,
        Commands::Resolve { key } => commands::resolve_key(&cli.data_dir, &key).await,
        Commands::Set { key, url } => commands::set_mapping(&cli.data_dir, &key, &url).await,
    }
}
