//! Chat backends: where a built context window gets sent.
//!
//! The main implementation is [`RelayClient`], which POSTs to the relay's
//! `/api/chat` endpoint.

use async_trait::async_trait;
use tracing::{debug, error};

use relaychat_core::types::{extract_reply, ChatRequest};
use relaychat_core::ChatError;

/// Anything that can turn a conversation into an assistant reply.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `request` and return the reply text.
    ///
    /// No retries: one failure is one error.
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError>;
}

// ─────────────────────────────────────────────
// RelayClient
// ─────────────────────────────────────────────

/// HTTP client for the relay endpoint.
#[derive(Clone, Debug)]
pub struct RelayClient {
    client: reqwest::Client,
    url: String,
}

impl RelayClient {
    /// `url` is the full endpoint, e.g. `http://localhost:3000/api/chat`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatBackend for RelayClient {
    async fn send(&self, request: &ChatRequest) -> Result<String, ChatError> {
        debug!(
            url = %self.url,
            model = %request.model,
            messages = request.messages.len(),
            "sending to relay"
        );

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| ChatError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::NetworkFailure(e.to_string()))?;

        if !status.is_success() {
            error!(status = %status, body = %body, "relay returned an error");
            return Err(ChatError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| ChatError::UnexpectedResponseShape)?;
        debug!(response = %value, "relay response");
        extract_reply(&value)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use relaychat_core::Message;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(text: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![Message::user(text)],
            model: "claude-3-haiku-20240307".to_string(),
            max_tokens: 4000,
        }
    }

    async fn client_for(server: &MockServer) -> RelayClient {
        RelayClient::new(format!("{}/api/chat", server.uri()))
    }

    #[tokio::test]
    async fn test_send_block_array_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "messages": [{"role": "user", "content": "hello"}],
                "model": "claude-3-haiku-20240307",
                "max_tokens": 4000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "Hi!"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).await.send(&request("hello")).await.unwrap();
        assert_eq!(reply, "Hi!");
    }

    #[tokio::test]
    async fn test_send_string_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"content": "plain"})))
            .mount(&server)
            .await;

        let reply = client_for(&server).await.send(&request("x")).await.unwrap();
        assert_eq!(reply, "plain");
    }

    #[tokio::test]
    async fn test_send_relay_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "CLAUDE_API_KEY is not set"})),
            )
            .mount(&server)
            .await;

        match client_for(&server).await.send(&request("x")).await.unwrap_err() {
            ChatError::UpstreamError { status, body } => {
                assert_eq!(status, 500);
                assert!(body.contains("CLAUDE_API_KEY"));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_unexpected_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server).await.send(&request("x")).await.unwrap_err();
        assert!(matches!(err, ChatError::UnexpectedResponseShape));
    }

    #[tokio::test]
    async fn test_send_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.send(&request("x")).await.unwrap_err();
        assert!(matches!(err, ChatError::UnexpectedResponseShape));
    }

    #[tokio::test]
    async fn test_send_network_failure() {
        let client = RelayClient::new("http://127.0.0.1:1/api/chat");
        let err = client.send(&request("x")).await.unwrap_err();
        assert!(matches!(err, ChatError::NetworkFailure(_)));
    }
}
