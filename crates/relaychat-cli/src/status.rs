//! `relaychat status`: show configuration and credential status.

use anyhow::Result;
use colored::Colorize;

use relaychat_core::config::{get_config_path, load_config};
use relaychat_core::session::parse_snapshot;
use relaychat_core::{FileSnapshotStore, SnapshotStore};

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "💬 relaychat status".cyan().bold());
    println!();

    println!(
        "  {:<14} {} {}",
        "Config:".bold(),
        config_path.display(),
        found_mark(config_path.exists())
    );

    let snapshot_path = config.client.snapshot_path();
    let store = FileSnapshotStore::new(&snapshot_path);
    let snapshot = match snapshot_summary(&store) {
        SnapshotSummary::Missing => found_mark(false),
        SnapshotSummary::Loaded { groups, messages } => {
            format!("{groups} groups, {messages} messages").dimmed().to_string()
        }
        SnapshotSummary::Unreadable(reason) => format!("(unreadable: {reason})").red().to_string(),
    };
    println!(
        "  {:<14} {} {}",
        "History:".bold(),
        snapshot_path.display(),
        snapshot
    );

    // Client
    println!();
    println!("  {}", "Client:".bold());
    println!("    {:<12} {}", "Relay URL:", config.client.relay_url);
    println!("    {:<12} {}", "Model:", config.client.model);
    println!(
        "    {:<12} {}",
        "Parameters:",
        format!(
            "max_tokens: {} | context: {} pairs",
            config.client.max_tokens, config.client.context_size
        )
        .dimmed()
    );

    // Relay
    println!();
    println!("  {}", "Relay:".bold());
    println!("    {:<12} {}", "Bind:", config.relay.bind_addr());
    println!("    {:<12} {}", "Upstream:", config.relay.upstream_url);
    let key = if config.relay.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured".dimmed())
    };
    println!("    {:<12} {}", "API key:", key);
    println!();

    Ok(())
}

/// What the history file holds, as far as `status` cares.
#[derive(Debug, PartialEq, Eq)]
enum SnapshotSummary {
    Missing,
    Loaded { groups: usize, messages: usize },
    Unreadable(String),
}

fn snapshot_summary(store: &dyn SnapshotStore) -> SnapshotSummary {
    let raw = match store.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return SnapshotSummary::Missing,
        Err(e) => return SnapshotSummary::Unreadable(e.to_string()),
    };
    match parse_snapshot(&raw) {
        Ok(groups) => SnapshotSummary::Loaded {
            groups: groups.len(),
            messages: groups.values().map(Vec::len).sum(),
        },
        Err(e) => SnapshotSummary::Unreadable(e.to_string()),
    }
}

fn found_mark(exists: bool) -> String {
    if exists {
        "✓".green().to_string()
    } else {
        "(not found)".red().to_string()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
