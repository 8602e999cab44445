//! `relaychat groups`: manage chat groups and history files from the CLI.
//!
//! - `relaychat groups list`: list groups with message counts
//! - `relaychat groups show <NAME>`: print one group's messages
//! - `relaychat groups new <NAME>`: create an empty group
//! - `relaychat groups export [--dir DIR]`: write `chat_export_<date>.json`
//! - `relaychat groups import <FILE>`: replace all groups with a file
//! - `relaychat groups clear [--yes]`: delete all chat history

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use relaychat_core::config::load_config;
use relaychat_core::utils::{expand_home, truncate_string};
use relaychat_core::{ChatSession, FileSnapshotStore};

use crate::helpers;

// ─────────────────────────────────────────────
// Subcommand enum
// ─────────────────────────────────────────────

/// Groups subcommands.
#[derive(Subcommand)]
pub enum GroupsCommands {
    /// List groups with message counts
    List,

    /// Print every message of a group
    Show {
        /// Group name
        name: String,
    },

    /// Create an empty group
    New {
        /// Group name
        name: String,
    },

    /// Export all groups to a dated JSON file
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(short, long, default_value = ".")]
        dir: String,
    },

    /// Replace all groups with the contents of a JSON file
    Import {
        /// Path to a previously exported file
        file: String,
    },

    /// Delete all chat history
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
}

// ─────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────

/// Dispatch a groups subcommand against the configured history file.
pub fn dispatch(cmd: GroupsCommands) -> Result<()> {
    let config = load_config(None);
    dispatch_at(&config.client.snapshot_path(), cmd)
}

/// Dispatch against the history file at `snapshot`.
fn dispatch_at(snapshot: &Path, cmd: GroupsCommands) -> Result<()> {
    let mut session = ChatSession::open(FileSnapshotStore::new(snapshot));
    let result = apply(&mut session, cmd);
    session.close();
    result
}

/// Run one subcommand against an open session.
fn apply(session: &mut ChatSession, cmd: GroupsCommands) -> Result<()> {
    match cmd {
        GroupsCommands::List => list_groups(session),
        GroupsCommands::Show { name } => {
            if !session.switch_group(&name) {
                anyhow::bail!("no group named '{name}'");
            }
            helpers::print_history(session);
        }
        GroupsCommands::New { name } => {
            if session.create_group(&name) {
                println!("{} Created group '{}'", "✓".green(), name.trim());
            } else {
                println!("{} Group '{}' already exists or name is blank", "·".dimmed(), name.trim());
            }
        }
        GroupsCommands::Export { dir } => {
            let path = session
                .export_to_dir(&expand_home(&dir))
                .with_context(|| format!("failed to export chat history to {dir}"))?;
            println!("{} Chat history exported to {}", "✓".green(), path.display());
        }
        GroupsCommands::Import { file } => {
            let count = session
                .import_file(&expand_home(&file))
                .with_context(|| format!("failed to import {file}"))?;
            println!("{} Chat history loaded ({count} groups) and saved", "✓".green());
        }
        GroupsCommands::Clear { yes } => {
            if yes || confirm_stdin("Clear all chat history? This cannot be undone.")? {
                session.clear_all();
                println!("{} All chat history cleared", "✓".green());
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

fn list_groups(session: &ChatSession) {
    println!();
    for (name, messages) in session.groups() {
        let preview = messages
            .last()
            .map(|m| format!("{}: {}", m.role, truncate_string(&m.content.replace('\n', " "), 48)))
            .unwrap_or_default();
        println!(
            "  {:<24} {:>4} messages  {}",
            name.bold(),
            messages.len(),
            preview.dimmed()
        );
    }
    println!();
}

fn confirm_stdin(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(helpers::is_yes(&answer))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
