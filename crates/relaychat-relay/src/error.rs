//! Relay-side failures.
//!
//! All of them reach the client as HTTP 500 with `{ "error": "<message>" }`;
//! the variants only matter for logging.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The server has no upstream API key configured.
    #[error("CLAUDE_API_KEY is not set in the environment variables")]
    MissingCredential,

    /// Upstream answered with a non-2xx status.
    #[error("HTTP error! status: {status}, message: {body}")]
    Upstream { status: u16, body: String },

    /// Upstream could not be reached or the body could not be read.
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The inbound body was not a valid chat request.
    #[error("invalid request body: {0}")]
    InvalidRequest(String),

    /// Upstream answered 2xx with a body that is not JSON.
    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!(error = %self, "chat request failed");
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
