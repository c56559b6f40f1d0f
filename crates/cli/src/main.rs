//! Return Desk CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (return requests + sessions)
//! rd-cli migrate
//!
//! # Check which Gemini models the configured key can use
//! rd-cli probe-models
//! rd-cli probe-models --model gemini-2.5-flash --model gemini-1.5-flash
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `probe-models` - Send a test prompt to each Gemini model

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rd-cli")]
#[command(author, version, about = "Return Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Send a test prompt to Gemini models and report which ones answer
    ProbeModels {
        /// Model to probe (repeatable; defaults to a known list)
        #[arg(short, long = "model")]
        models: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::ProbeModels { models } => {
            let report = commands::probe::run(&models).await?;
            if report.working == 0 {
                return Err("no Gemini model answered".into());
            }
        }
    }
    Ok(())
}
