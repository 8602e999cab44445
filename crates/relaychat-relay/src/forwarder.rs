//! Relay forwarder: normalizes a conversation and forwards it upstream
//! with the server-held credential.
//!
//! The request body is treated as mostly opaque: only `role` values are
//! rewritten, every other field (known or not) passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::{debug, error, info};

use relaychat_core::config::RelayConfig;

use crate::error::RelayError;

/// Role name older clients send instead of `user`.
const LEGACY_USER_ROLE: &str = "human";

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// One message as received from a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelayMessage {
    pub role: String,
    /// `content` and anything else the client sent.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelayRequest {
    pub messages: Vec<RelayMessage>,
    pub model: String,
    /// Any JSON number; forwarded exactly as the client wrote it.
    pub max_tokens: Number,
    /// Extra request fields forwarded verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RelayRequest {
    /// Rewrite legacy `human` roles to `user`.
    pub fn normalize_roles(&mut self) {
        for msg in &mut self.messages {
            if msg.role == LEGACY_USER_ROLE {
                msg.role = "user".to_string();
            }
        }
    }
}

// ─────────────────────────────────────────────
// Relay
// ─────────────────────────────────────────────

/// Stateless forwarder. Cheap to share behind an `Arc`; concurrent requests
/// touch no mutable state.
pub struct Relay {
    client: reqwest::Client,
    upstream_url: String,
    api_version: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("upstream_url", &self.upstream_url)
            .field("api_version", &self.api_version)
            .field("has_credential", &self.has_credential())
            .finish()
    }
}

impl Relay {
    pub fn new(config: &RelayConfig) -> Self {
        let api_key = config
            .is_configured()
            .then(|| config.api_key.trim().to_string());

        Relay {
            client: reqwest::Client::new(),
            upstream_url: config.upstream_url.clone(),
            api_version: config.api_version.clone(),
            api_key,
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Forward one conversation upstream.
    ///
    /// Returns the upstream body text exactly as received. The upstream is
    /// never contacted when no credential is configured.
    pub async fn forward(&self, mut request: RelayRequest) -> Result<String, RelayError> {
        info!(
            payload = %serde_json::to_string(&request).unwrap_or_default(),
            "received chat request"
        );

        let api_key = self.api_key.as_deref().ok_or(RelayError::MissingCredential)?;

        request.normalize_roles();

        debug!(
            model = %request.model,
            messages = request.messages.len(),
            url = %self.upstream_url,
            "forwarding upstream"
        );

        let response = self
            .client
            .post(&self.upstream_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        info!(status = %status, "upstream responded");

        let body = response.text().await?;

        if !status.is_success() {
            error!(status = %status, body = %body, "upstream error response");
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        if let Err(e) = serde_json::from_str::<serde::de::IgnoredAny>(&body) {
            error!(error = %e, "upstream body is not JSON");
            return Err(RelayError::InvalidResponse(e.to_string()));
        }

        debug!(body = %body, "upstream response body");
        Ok(body)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
