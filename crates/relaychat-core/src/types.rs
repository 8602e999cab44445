//! Core types: chat messages, roles, and the request sent to the relay.
//!
//! Messages are plain `{ "role": ..., "content": ... }` objects on the wire,
//! in the snapshot file, and in import/export files.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

// ─────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Legacy snapshots spell this role `human`.
    #[serde(alias = "human")]
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// All chat groups, keyed by name, in creation order.
pub type Groups = IndexMap<String, Vec<Message>>;

// ─────────────────────────────────────────────
// Relay request / response
// ─────────────────────────────────────────────

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub max_tokens: u32,
}

/// Pull the assistant reply text out of an upstream response body.
///
/// Two shapes are recognized:
/// - `{ "content": [{ "text": "..." }, ...] }`: first block wins
/// - `{ "content": "..." }`
pub fn extract_reply(body: &serde_json::Value) -> Result<String, ChatError> {
    match body.get("content") {
        Some(serde_json::Value::Array(blocks)) if !blocks.is_empty() => blocks[0]
            .get("text")
            .and_then(|t| t.as_str())
            .map(String::from)
            .ok_or(ChatError::UnexpectedResponseShape),
        Some(serde_json::Value::String(text)) => Ok(text.clone()),
        _ => Err(ChatError::UnexpectedResponseShape),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
