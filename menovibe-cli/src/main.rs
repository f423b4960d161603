mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        eprintln!("Loaded config from: {}", path.display());
    }

    let cli = Cli::parse();
    if let Err(e) = menovibe_telemetry::init_telemetry("menovibe") {
        eprintln!("Failed to initialize telemetry: {}", e);
    }

    match cli.command {
        Commands::Invoke { url, stream_timeout, text } => {
            commands::invoke(&url, stream_timeout, &text.join(" ")).await
        }
        Commands::Agents { offline } => commands::agents(offline).await,
        Commands::Relay { target, port } => commands::relay(&target, port).await,
    }
}
