//! Interactive REPL.
//!
//! Uses `rustyline` for readline-style editing with persistent history.

use anyhow::Result;
use rustyline::config::Configurer;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing::debug;

use relaychat_client::{ChatClient, Command, Outcome, Prompter};
use relaychat_core::Role;

use crate::helpers;

/// Confirms through the same line editor the REPL reads from.
struct EditorPrompter<'a> {
    editor: &'a mut Editor<(), DefaultHistory>,
}

impl Prompter for EditorPrompter<'_> {
    fn confirm(&mut self, question: &str) -> bool {
        match self.editor.readline(&format!("{question} [y/N] ")) {
            Ok(answer) => helpers::is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Run the interactive REPL loop.
pub async fn run(mut client: ChatClient) -> Result<()> {
    helpers::print_banner(client.settings());
    helpers::print_groups(client.session());
    helpers::print_history(client.session());

    let mut editor = create_editor()?;

    loop {
        let prompt = format!("{} › ", client.session().current_group());
        let input = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                // Ctrl-C: exit cleanly
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                // Ctrl-D: exit cleanly
                break;
            }
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        debug!(group = client.session().current_group(), input = trimmed, "processing input");
        let mut prompter = EditorPrompter {
            editor: &mut editor,
        };
        if !dispatch_line(&mut client, trimmed, &mut prompter).await {
            println!("\nGoodbye! 👋");
            break;
        }
    }

    save_history(&mut editor);
    client.close();

    Ok(())
}

/// Handle one line and render its outcome. Returns `false` on exit.
async fn dispatch_line(client: &mut ChatClient, line: &str, prompter: &mut dyn Prompter) -> bool {
    let command = Command::parse(line);
    let is_send = matches!(command, Command::Send(_));
    if is_send {
        helpers::print_thinking();
    }
    let outcome = client.handle(command, prompter).await;
    if is_send {
        helpers::clear_thinking();
    }

    match outcome {
        Outcome::Appended(messages) => {
            // The user's own line is already on screen.
            messages
                .iter()
                .filter(|m| !(is_send && m.role == Role::User))
                .for_each(helpers::print_message);
        }
        Outcome::Rerender(notice) => {
            helpers::print_groups(client.session());
            helpers::print_history(client.session());
            if let Some(notice) = notice {
                helpers::print_notice(&notice);
            }
        }
        Outcome::Groups => helpers::print_groups(client.session()),
        Outcome::Notice(notice) => helpers::print_notice(&notice),
        Outcome::Help => helpers::print_help(),
        Outcome::Unchanged => {}
        Outcome::Exit => return false,
    }
    true
}

/// Create a rustyline editor with history.
fn create_editor() -> Result<Editor<(), DefaultHistory>> {
    let mut editor = DefaultEditor::new()?;
    editor.set_max_history_size(1000)?;

    // Load history from ~/.relaychat/history/cli_history
    let history_path = history_path();
    if history_path.exists() {
        let _ = editor.load_history(&history_path);
        debug!("loaded REPL history from {}", history_path.display());
    }

    Ok(editor)
}

/// Save history to disk.
fn save_history(editor: &mut Editor<(), DefaultHistory>) {
    let path = history_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Err(e) = editor.save_history(&path) {
        debug!("failed to save history: {e}");
    }
}

/// Path to the history file.
fn history_path() -> std::path::PathBuf {
    relaychat_core::utils::get_data_path()
        .join("history")
        .join("cli_history")
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
