//! Shared CLI helpers: message rendering, banner, prompts.

use colored::Colorize;

use relaychat_client::{ChatSettings, HELP};
use relaychat_core::render::{segments, Segment};
use relaychat_core::{ChatSession, Message, Role};

/// Whether a confirmation answer means yes. Anything else is no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Label printed above a message.
fn role_label(role: Role) -> colored::ColoredString {
    match role {
        Role::User => "You".green().bold(),
        Role::Assistant => "Claude".cyan().bold(),
        Role::System => "System".yellow().bold(),
    }
}

/// Print one message, code blocks set apart from prose.
pub fn print_message(message: &Message) {
    println!();
    println!("{}", role_label(message.role));
    if message.content.is_empty() {
        println!("{}", "(empty)".dimmed());
    }
    for segment in segments(&message.content) {
        match segment {
            Segment::Text(text) => {
                let text = text.trim_matches('\n');
                if text.is_empty() {
                    continue;
                }
                if message.role == Role::System {
                    println!("{}", text.yellow());
                } else {
                    println!("{text}");
                }
            }
            Segment::Code(code) => {
                println!("{}", "┌─ code".dimmed());
                for line in code.lines() {
                    println!("{} {}", "│".dimmed(), line.bright_white().on_black());
                }
                println!("{}", "└─".dimmed());
            }
        }
    }
}

/// Print every message of the current group.
pub fn print_history(session: &ChatSession) {
    let messages = session.current_messages();
    if messages.is_empty() {
        println!("{}", "(no messages in this group yet)".dimmed());
        return;
    }
    messages.iter().for_each(print_message);
    println!();
}

/// Print the group tabs, current one highlighted.
pub fn print_groups(session: &ChatSession) {
    let current = session.current_group();
    let tabs: Vec<String> = session
        .groups()
        .iter()
        .map(|(name, messages)| {
            let tab = format!("{name} ({})", messages.len());
            if name == current {
                format!("[{}]", tab.cyan().bold())
            } else {
                format!(" {} ", tab.dimmed())
            }
        })
        .collect();
    println!("{} {}", "Groups:".bold(), tabs.join(" "));
}

/// Print a short status line.
pub fn print_notice(notice: &str) {
    println!("{}", format!("• {notice}").dimmed());
}

/// Print the command table.
pub fn print_help() {
    println!();
    for (usage, summary) in HELP {
        println!("  {:<18} {}", usage.cyan(), summary);
    }
    println!();
}

/// Print the banner shown at REPL start.
pub fn print_banner(settings: &ChatSettings) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "💬 relaychat".cyan().bold(), version.dimmed());
    println!(
        "{}",
        format!(
            "model {} · last {} exchange pairs as context",
            settings.model, settings.context_size
        )
        .dimmed()
    );
    println!(
        "{}",
        "Type a message, /help for commands, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder while waiting for a reply.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
