//! Serve command: runs the relay in the foreground.
//!
//! Startup sequence:
//! 1. Load config, apply `--host` / `--port`
//! 2. Print the banner and credential status
//! 3. Serve `POST /api/chat` until Ctrl+C

use anyhow::{Context, Result};
use colored::Colorize;
use tracing::info;

use relaychat_core::config::load_config;

/// Run the relay server.
pub async fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut config = load_config(None);
    if let Some(host) = host {
        config.relay.host = host;
    }
    if let Some(port) = port {
        config.relay.port = port;
    }
    let relay = config.relay;

    println!();
    println!("{}  {}", "💬 relaychat".cyan().bold(), "relay".dimmed());
    println!("  Listening: http://{}/api/chat", relay.bind_addr());
    println!("  Upstream:  {}", relay.upstream_url);
    if relay.is_configured() {
        println!("  API key:   {}", "✓ set".green());
    } else {
        println!(
            "  API key:   {}",
            "✗ not set (export CLAUDE_API_KEY or set relay.apiKey)".red()
        );
    }
    println!();

    tokio::select! {
        result = relaychat_relay::serve(&relay) => {
            result.with_context(|| format!("relay failed on {}", relay.bind_addr()))?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down relay");
        }
    }

    Ok(())
}
