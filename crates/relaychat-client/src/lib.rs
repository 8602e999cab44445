//! Chat client for relaychat.
//!
//! - [`backend`]: `ChatBackend` trait and the HTTP `RelayClient`
//! - [`chat`]: `ChatClient`: send flow and command handlers
//! - [`commands`]: parsing a line of input into a `Command`

pub mod backend;
pub mod chat;
pub mod commands;

pub use backend::{ChatBackend, RelayClient};
pub use chat::{ChatClient, ChatSettings, Outcome, Prompter};
pub use commands::{Command, HELP};
