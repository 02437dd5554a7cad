//! CLI `memory` commands: list tasks and events, or wipe the memory file.

use anyhow::{bail, Result};
use std::io::Write;

use homerelay::config::RelayConfig;
use homerelay::memory::MemoryStore;

/// Print every pending task.
pub fn tasks(config: &RelayConfig) -> Result<()> {
    let store = MemoryStore::new(config.resolved_memory_path());
    let tasks = store.pending_tasks();

    if tasks.is_empty() {
        println!("No pending tasks.");
        return Ok(());
    }

    println!("Pending tasks ({})", tasks.len());
    println!("{}", "=".repeat(40));
    for (i, t) in tasks.iter().enumerate() {
        println!("  {}. {}  (added {})", i + 1, t.task, t.created);
    }
    Ok(())
}

/// Print the last `limit` events, oldest first.
pub fn events(config: &RelayConfig, limit: usize) -> Result<()> {
    let store = MemoryStore::new(config.resolved_memory_path());
    let events = store.recent_events(limit);

    if events.is_empty() {
        println!("No events recorded.");
        return Ok(());
    }

    for e in &events {
        println!("  {:<28} {}", e.time, e.event);
    }
    Ok(())
}

/// Clear all events and tasks after user confirmation.
pub fn reset(config: &RelayConfig) -> Result<()> {
    let path = config.resolved_memory_path();

    println!("WARNING: This will permanently delete ALL events and tasks.");
    println!("Memory file: {}", path.display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    MemoryStore::new(path).clear()?;

    println!("All memories deleted.");
    Ok(())
}
