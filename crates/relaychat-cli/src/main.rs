//! relaychat CLI: entry point.
//!
//! # Commands
//!
//! - `relaychat serve [--host H] [--port P]`: run the relay server
//! - `relaychat chat [-m MESSAGE] [-g GROUP]`: chat (single-shot or REPL)
//! - `relaychat groups <list|show|new|export|import|clear>`: manage chat groups
//! - `relaychat status`: show configuration and credential status
//! - `relaychat init [--force]`: write a default config file

mod groups_cmd;
mod helpers;
mod init;
mod repl;
mod serve;
mod status;

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use relaychat_client::{ChatClient, ChatSettings, RelayClient};
use relaychat_core::config::{load_config, Config};
use relaychat_core::{ChatSession, FileSnapshotStore, Role};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// relaychat: grouped chat history in the terminal, relayed to Claude
#[derive(Parser)]
#[command(name = "relaychat", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay server (POST /api/chat)
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Chat through the relay (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Group to use; created if it does not exist
        #[arg(short, long)]
        group: Option<String>,

        /// Model identifier (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Context window size in exchange pairs (overrides config)
        #[arg(short, long)]
        context: Option<usize>,

        /// Relay endpoint URL (overrides config)
        #[arg(long)]
        relay_url: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Manage chat groups and history files
    Groups {
        #[command(subcommand)]
        action: groups_cmd::GroupsCommands,
    },

    /// Show configuration and credential status
    Status,

    /// Write a default config file to ~/.relaychat/config.json
    Init {
        /// Overwrite an existing config
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Options for the `chat` command.
struct ChatOptions {
    message: Option<String>,
    group: Option<String>,
    model: Option<String>,
    context: Option<usize>,
    relay_url: Option<String>,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(if logs { "relaychat=debug,tower_http=debug,info" } else { "info" });
            serve::run(host, port).await
        }
        Commands::Chat {
            message,
            group,
            model,
            context,
            relay_url,
            logs,
        } => {
            init_logging(if logs { "relaychat=debug,info" } else { "warn" });
            run_chat(ChatOptions {
                message,
                group,
                model,
                context,
                relay_url,
            })
            .await
        }
        Commands::Groups { action } => {
            init_logging("warn");
            groups_cmd::dispatch(action)
        }
        Commands::Status => status::run(),
        Commands::Init { force } => init::run(force),
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(opts: ChatOptions) -> Result<()> {
    let mut config = load_config(None);
    if let Some(model) = opts.model {
        config.client.model = model;
    }
    if let Some(context) = opts.context {
        config.client.context_size = context;
    }
    if let Some(url) = opts.relay_url {
        config.client.relay_url = url;
    }

    let mut client = build_chat_client(&config);
    if let Some(group) = opts.group.as_deref() {
        let session = client.session_mut();
        if !session.switch_group(group) {
            session.create_group(group);
        }
    }

    match opts.message {
        Some(msg) => {
            // Single-shot mode
            info!(group = client.session().current_group(), "sending single message");
            let appended = client.send_message(&msg).await;
            match appended.last() {
                Some(reply) => helpers::print_message(reply),
                None => helpers::print_notice("(empty message, nothing sent)"),
            }
            let failed = appended.last().is_some_and(|m| m.role == Role::System);
            client.close();
            if failed {
                anyhow::bail!("chat request failed");
            }
        }
        None => {
            // Interactive REPL mode
            repl::run(client).await?;
        }
    }

    Ok(())
}

/// Build a `ChatClient` from the loaded configuration.
fn build_chat_client(config: &Config) -> ChatClient {
    let store = FileSnapshotStore::new(config.client.snapshot_path());
    debug!(snapshot = %store.path().display(), "opening chat history");
    let session = ChatSession::open(store);

    let backend = RelayClient::new(config.client.relay_url.clone());
    debug!(relay = backend.url(), model = %config.client.model, "chat backend ready");

    ChatClient::new(session, Arc::new(backend), ChatSettings::from(&config.client))
}

/// Initialize tracing/logging.
fn init_logging(directives: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
