mod cli;
mod server;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use homerelay::config::RelayConfig;

#[derive(Parser)]
#[command(name = "homerelay", version, about = "Voice/text command relay for a home-automation hub")]
struct Cli {
    /// Config file (defaults to ~/.homerelay/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the relay HTTP server
    Serve,
    /// Interactive room/command loop against a running relay
    Chat,
    /// Send a single command to a running relay
    Ask {
        /// The command text
        #[arg(required = true)]
        text: Vec<String>,
        /// Room the command is spoken in
        #[arg(long)]
        room: Option<String>,
    },
    /// Inspect or reset the memory file
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },
    /// Check config, memory file, hub, and model settings
    Doctor,
}

#[derive(Subcommand)]
enum MemoryAction {
    /// List pending tasks
    Tasks,
    /// Show the most recent events
    Events {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete all events and tasks
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RelayConfig::load_from(path)?,
        None => RelayConfig::load()?,
    };

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve(config).await?,
        Command::Chat => cli::chat::chat(&config.client).await?,
        Command::Ask { text, room } => {
            cli::chat::ask(&config.client, &text.join(" "), room.as_deref()).await?
        }
        Command::Memory { action } => match action {
            MemoryAction::Tasks => cli::memory::tasks(&config)?,
            MemoryAction::Events { limit } => cli::memory::events(&config, limit)?,
            MemoryAction::Reset => cli::memory::reset(&config)?,
        },
        Command::Doctor => cli::doctor::doctor(&config).await?,
    }

    Ok(())
}
