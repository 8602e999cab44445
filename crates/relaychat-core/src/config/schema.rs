//! Configuration schema.
//!
//! Hierarchy: `Config` → `RelayConfig`, `ClientConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::utils;

/// Default upstream endpoint (Anthropic Messages API).
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.anthropic.com/v1/messages";
/// Value sent in the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration: loaded from `~/.relaychat/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub relay: RelayConfig,
    pub client: ClientConfig,
}

// ─────────────────────────────────────────────
// Relay
// ─────────────────────────────────────────────

/// Relay server settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RelayConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Server-held credential for the upstream API. Empty means unset.
    pub api_key: String,
    /// Upstream endpoint the relay forwards to.
    pub upstream_url: String,
    /// Upstream API version header value.
    pub api_version: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_key: String::new(),
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl RelayConfig {
    /// Whether the upstream credential is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────

/// Chat client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// Full URL of the relay's chat endpoint.
    pub relay_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// `max_tokens` sent with every request.
    pub max_tokens: u32,
    /// Context window size in exchange pairs.
    pub context_size: usize,
    /// Where the group snapshot lives (`~` is expanded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_path: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://localhost:3000/api/chat".to_string(),
            model: "claude-3-5-sonnet-20240620".to_string(),
            max_tokens: 4000,
            context_size: 5,
            snapshot_path: None,
        }
    }
}

impl ClientConfig {
    /// Resolved snapshot location.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_path
            .as_deref()
            .map(utils::expand_home)
            .unwrap_or_else(utils::get_snapshot_path)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
