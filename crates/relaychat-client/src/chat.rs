//! Chat client: the send flow and command handlers over a [`ChatSession`].
//!
//! Handlers take explicit input and return an [`Outcome`] telling the UI
//! what to redraw; they never print. Anything needing the user's consent
//! goes through a [`Prompter`].

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info};

use relaychat_core::config::ClientConfig;
use relaychat_core::types::{ChatRequest, Message, Role};
use relaychat_core::utils::expand_home;
use relaychat_core::{build_context_window, ChatError, ChatSession};

use crate::backend::ChatBackend;
use crate::commands::Command;

/// Asks the user to confirm destructive actions.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> bool;
}

/// What the UI should do after a command ran.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// New messages were appended to the current group; show them.
    Appended(Vec<Message>),
    /// Groups or the current group changed; redraw, then show the notice.
    Rerender(Option<String>),
    /// Show the group list.
    Groups,
    /// Show a message to the user; history is unchanged.
    Notice(String),
    /// Show command help.
    Help,
    /// Nothing to do.
    Unchanged,
    /// Leave the chat loop.
    Exit,
}

/// Request settings that can change mid-session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatSettings {
    pub model: String,
    pub max_tokens: u32,
    /// Context window size in exchange pairs.
    pub context_size: usize,
}

impl From<&ClientConfig> for ChatSettings {
    fn from(config: &ClientConfig) -> Self {
        Self {
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            context_size: config.context_size,
        }
    }
}

// ─────────────────────────────────────────────
// ChatClient
// ─────────────────────────────────────────────

/// Owns the session and sends turns through a backend.
pub struct ChatClient {
    session: ChatSession,
    backend: Arc<dyn ChatBackend>,
    settings: ChatSettings,
}

impl ChatClient {
    pub fn new(session: ChatSession, backend: Arc<dyn ChatBackend>, settings: ChatSettings) -> Self {
        Self {
            session,
            backend,
            settings,
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    /// Drop the session; everything was saved as it changed.
    pub fn close(self) {
        self.session.close();
    }

    /// Send one user message in the current group.
    ///
    /// The context window is built from the history *before* the new
    /// message. Returns the messages appended: the user message plus either
    /// the assistant reply or a system error message. Blank input appends
    /// nothing.
    pub async fn send_message(&mut self, text: &str) -> Vec<Message> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let window = build_context_window(
            self.session.current_messages(),
            self.settings.context_size,
            text,
        );
        let user = self.session.append_message(Role::User, text).clone();

        let request = ChatRequest {
            messages: window,
            model: self.settings.model.clone(),
            max_tokens: self.settings.max_tokens,
        };
        debug!(
            group = self.session.current_group(),
            messages = request.messages.len(),
            "messages to send"
        );

        let reply = match self.backend.send(&request).await {
            Ok(reply) => self.session.append_message(Role::Assistant, reply).clone(),
            Err(e) => self.report_error(&e),
        };

        vec![user, reply]
    }

    /// Run a command, turning any failure into a system message in the
    /// current group. The chat loop never dies on a handler error.
    pub async fn handle(&mut self, command: Command, prompter: &mut dyn Prompter) -> Outcome {
        match self.execute(command, prompter).await {
            Ok(outcome) => outcome,
            Err(e) => Outcome::Appended(vec![self.report_error(&e)]),
        }
    }

    /// Run a command.
    pub async fn execute(
        &mut self,
        command: Command,
        prompter: &mut dyn Prompter,
    ) -> Result<Outcome, ChatError> {
        let outcome = match command {
            Command::Send(text) => Outcome::Appended(self.send_message(&text).await),
            Command::NewGroup(name) => {
                if self.session.create_group(&name) {
                    Outcome::Rerender(None)
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Switch(name) => {
                if self.session.switch_group(&name) {
                    Outcome::Rerender(None)
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Groups => Outcome::Groups,
            Command::History => Outcome::Rerender(None),
            Command::Clear => {
                if prompter.confirm("Clear all chat history? This cannot be undone.") {
                    self.session.clear_all();
                    Outcome::Rerender(Some("All chat history cleared".to_string()))
                } else {
                    Outcome::Unchanged
                }
            }
            Command::Export(dir) => {
                let dir = dir.map(|d| expand_home(&d)).unwrap_or_else(|| PathBuf::from("."));
                let path = self.session.export_to_dir(&dir)?;
                Outcome::Notice(format!("Chat history exported to {}", path.display()))
            }
            Command::Import(file) => {
                let count = self.session.import_file(&expand_home(&file))?;
                Outcome::Rerender(Some(format!(
                    "Chat history loaded ({count} groups) and saved"
                )))
            }
            Command::Context(pairs) => {
                self.settings.context_size = pairs;
                Outcome::Notice(format!("Context window: last {pairs} exchange pairs"))
            }
            Command::Model(model) => {
                info!(model = %model, "model changed");
                self.settings.model = model;
                Outcome::Notice(format!("Model: {}", self.settings.model))
            }
            Command::Help => Outcome::Help,
            Command::Exit => Outcome::Exit,
            Command::Empty => Outcome::Unchanged,
            Command::Invalid(hint) => Outcome::Notice(hint),
        };
        Ok(outcome)
    }

    fn report_error(&mut self, e: &ChatError) -> Message {
        error!(error = %e, "chat error");
        self.session
            .append_message(Role::System, format!("Error: {e}"))
            .clone()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
