//! Chat commands: what a line of user input means.
//!
//! Plain text is a message to send; lines starting with `/` are commands.

/// Exit words (case-insensitive match).
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// A parsed line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Send a message to the current group.
    Send(String),
    /// `/new <name>`: create a group and switch to it.
    NewGroup(String),
    /// `/switch <name>`: make another group current.
    Switch(String),
    /// `/groups`: list groups.
    Groups,
    /// `/history`: redraw the current group.
    History,
    /// `/clear`: erase every group (asks first).
    Clear,
    /// `/export [dir]`: write a dated export file.
    Export(Option<String>),
    /// `/import <file>`: replace all groups with a file's contents.
    Import(String),
    /// `/context <pairs>`: change the context window size.
    Context(usize),
    /// `/model <id>`: change the model.
    Model(String),
    /// `/help`
    Help,
    /// Leave the REPL.
    Exit,
    /// Blank input.
    Empty,
    /// A command that could not be understood; carries a usage hint.
    Invalid(String),
}

impl Command {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }
        if is_exit_command(trimmed) {
            return Command::Exit;
        }
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Send(trimmed.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match (name.to_lowercase().as_str(), arg) {
            ("new", "") => Command::Invalid("usage: /new <group name>".into()),
            ("new", name) => Command::NewGroup(name.to_string()),
            ("switch", "") => Command::Invalid("usage: /switch <group name>".into()),
            ("switch", name) => Command::Switch(name.to_string()),
            ("groups", _) => Command::Groups,
            ("history", _) => Command::History,
            ("clear", _) => Command::Clear,
            ("export", "") => Command::Export(None),
            ("export", dir) => Command::Export(Some(dir.to_string())),
            ("import", "") => Command::Invalid("usage: /import <file>".into()),
            ("import", file) => Command::Import(file.to_string()),
            ("context", n) => match n.parse::<usize>() {
                Ok(n) => Command::Context(n),
                Err(_) => Command::Invalid("usage: /context <number of exchange pairs>".into()),
            },
            ("model", "") => Command::Invalid("usage: /model <model id>".into()),
            ("model", id) => Command::Model(id.to_string()),
            ("help", _) | ("?", _) => Command::Help,
            (other, _) => Command::Invalid(format!("unknown command: /{other} (try /help)")),
        }
    }
}

/// Check if input is an exit command.
pub fn is_exit_command(input: &str) -> bool {
    let lower = input.to_lowercase();
    EXIT_COMMANDS.contains(&lower.as_str())
}

/// One line per command, for `/help`.
pub const HELP: &[(&str, &str)] = &[
    ("/new <name>", "create a group and switch to it"),
    ("/switch <name>", "switch to another group"),
    ("/groups", "list groups"),
    ("/history", "show the current group"),
    ("/context <n>", "resend the last n exchange pairs as context"),
    ("/model <id>", "change the model"),
    ("/export [dir]", "write chat_export_<date>.json"),
    ("/import <file>", "replace all groups with a file"),
    ("/clear", "delete all chat history"),
    ("exit", "quit"),
];
