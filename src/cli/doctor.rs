//! CLI `doctor` command: check the memory file, hub, and model settings.

use anyhow::{Context, Result};

use homerelay::config::RelayConfig;
use homerelay::hub::HubClient;
use homerelay::memory::MemoryStore;

/// Print a health report for everything the relay depends on.
pub async fn doctor(config: &RelayConfig) -> Result<()> {
    println!("homerelay Health Report");
    println!("=======================");
    println!();

    let memory_path = config.resolved_memory_path();
    let store = MemoryStore::new(&memory_path);
    println!("Memory file:       {}", memory_path.display());
    if !memory_path.exists() {
        println!("  Status:          not created yet (written on first interaction)");
    } else {
        match store.try_load() {
            Ok(doc) => {
                println!("  Status:          OK");
                println!("  Events:          {}", doc.events.len());
                println!("  Pending tasks:   {}", doc.pending_tasks().len());
            }
            Err(e) => {
                println!("  Status:          UNREADABLE ({e})");
                println!("  It will be reset to empty on the next write.");
            }
        }
    }
    println!();

    println!("Hub:               {}", config.hub.url);
    println!(
        "  Token:           {}",
        if config.hub.token.is_empty() { "(not set)" } else { "set" }
    );
    let hub = HubClient::new(&config.hub).context("failed to build hub client")?;
    match hub.check().await {
        Ok(status) if (200..300).contains(&status) => {
            println!("  Status:          OK (HTTP {status})");
        }
        Ok(401) => println!("  Status:          FAILED (HTTP 401, check HA_TOKEN)"),
        Ok(status) => println!("  Status:          FAILED (HTTP {status})"),
        Err(e) => println!("  Status:          UNREACHABLE ({e})"),
    }
    println!();

    println!("Model:");
    println!("  Provider:        {}", config.model.provider);
    println!("  Endpoint:        {}", config.model.base_url);
    println!("  Model:           {}", config.model.model);
    println!("  Max tokens:      {}", config.model.max_tokens);
    if let Err(e) = homerelay::model::create_provider(&config.model) {
        println!("  WARNING: {e}");
    }

    Ok(())
}
