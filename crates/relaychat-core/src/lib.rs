//! relaychat core: message types, context windowing, and group sessions.
//!
//! This crate contains:
//! - **types**: chat messages, roles, and the relay request/response shapes
//! - **window**: the alternation-trimmed context window sent upstream
//! - **session**: named chat groups with snapshot persistence
//! - **render**: plain-text / code-block segmentation of message content
//! - **config**: `~/.relaychat/config.json` schema, loading, env overrides

pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod types;
pub mod utils;
pub mod window;

pub use error::ChatError;
pub use session::{ChatSession, FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
pub use types::{ChatRequest, Groups, Message, Role};
pub use window::build_context_window;
