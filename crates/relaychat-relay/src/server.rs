//! HTTP surface of the relay: a single `POST /api/chat` endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use relaychat_core::config::RelayConfig;

use crate::error::RelayError;
use crate::forwarder::{Relay, RelayRequest};

/// Build the relay router.
pub fn router(relay: Arc<Relay>) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// POST /api/chat: forward one conversation upstream.
async fn chat(
    State(relay): State<Arc<Relay>>,
    payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<Response, RelayError> {
    let Json(request) = payload.map_err(|e| RelayError::InvalidRequest(e.body_text()))?;
    let body = relay.forward(request).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Bind and run the relay until the process is stopped.
pub async fn serve(config: &RelayConfig) -> std::io::Result<()> {
    let relay = Arc::new(Relay::new(config));
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;

    info!(upstream = relay.upstream_url(), "Server running at http://{}", addr);
    if relay.has_credential() {
        info!("API key: is set");
    } else {
        warn!("API key: is NOT set; requests will fail until CLAUDE_API_KEY is configured");
    }

    axum::serve(listener, router(relay)).await
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Start the relay on an ephemeral port and return its chat URL.
    async fn spawn_relay(api_key: &str, upstream: &str) -> String {
        let config = RelayConfig {
            api_key: api_key.to_string(),
            upstream_url: format!("{upstream}/v1/messages"),
            ..RelayConfig::default()
        };
        let app = router(Arc::new(Relay::new(&config)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/api/chat")
    }

    #[tokio::test]
    async fn test_chat_success_passthrough() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "messages": [{"role": "user", "content": "hi"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Hello from upstream"}]
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let url = spawn_relay("sk-ant-test", &upstream.uri()).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&json!({
                "messages": [{"role": "human", "content": "hi"}],
                "model": "claude-3-haiku-20240307",
                "max_tokens": 4000
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["content"][0]["text"], "Hello from upstream");
    }

    #[tokio::test]
    async fn test_chat_without_credential_is_500() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&upstream)
            .await;

        let url = spawn_relay("", &upstream.uri()).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&json!({
                "messages": [{"role": "user", "content": "hi"}],
                "model": "m",
                "max_tokens": 1
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("CLAUDE_API_KEY"));
        assert_eq!(upstream.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_chat_upstream_error_is_500_with_message() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&upstream)
            .await;

        let url = spawn_relay("key", &upstream.uri()).await;
        let resp = reqwest::Client::new()
            .post(&url)
            .json(&json!({
                "messages": [{"role": "user", "content": "hi"}],
                "model": "m",
                "max_tokens": 1
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("529"));
        assert!(message.contains("overloaded"));
    }

    #[tokio::test]
    async fn test_chat_malformed_body_is_500() {
        let upstream = MockServer::start().await;
        let url = spawn_relay("key", &upstream.uri()).await;

        let resp = reqwest::Client::new()
            .post(&url)
            .json(&json!({"model": "m"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status(), 500);
        let body: Value = resp.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
        assert!(upstream.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let upstream = MockServer::start().await;
        let url = spawn_relay("key", &upstream.uri()).await;
        let resp = reqwest::get(url.replace("/api/chat", "/api/other"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }
}
