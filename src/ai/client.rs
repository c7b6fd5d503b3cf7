use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("completion reply had no content")]
    EmptyReply,
}

/// Single capability the prompt-orchestration layer needs from the hosted
/// model: text in, free-text reply out. Injected so tests can substitute a
/// deterministic double.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
    async fn complete_vision(
        &self,
        prompt: &str,
        image: &[u8],
        mime: &str,
    ) -> Result<String, CompletionError>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct HttpCompletionClient {
    http: reqwest::Client,
    config: AiConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl HttpCompletionClient {
    pub fn new(http: reqwest::Client, config: AiConfig) -> Self {
        Self { http, config }
    }

    async fn send(
        &self,
        model: &str,
        content: serde_json::Value,
    ) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            max_tokens: 4096,
            temperature: 0.2,
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = resp.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::EmptyReply)?;
        debug!(model = %model, chars = content.len(), "completion reply received");
        Ok(content)
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.send(&self.config.model, json!(prompt)).await
    }

    async fn complete_vision(
        &self,
        prompt: &str,
        image: &[u8],
        mime: &str,
    ) -> Result<String, CompletionError> {
        let data_url = format!("data:{};base64,{}", mime, BASE64.encode(image));
        let content = json!([
            { "type": "text", "text": prompt },
            { "type": "image_url", "image_url": { "url": data_url } }
        ]);
        self.send(&self.config.vision_model, content).await
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server_uri: &str) -> HttpCompletionClient {
        HttpCompletionClient::new(
            reqwest::Client::new(),
            AiConfig {
                base_url: server_uri.to_string(),
                api_key: "test".into(),
                model: "test-model".into(),
                vision_model: "test-vision".into(),
            },
        )
    }

    #[tokio::test]
    async fn parses_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [ { "message": { "role": "assistant", "content": "hello" } } ]
            })))
            .mount(&server)
            .await;

        let reply = client_for(&server.uri()).complete("say hello").await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn surfaces_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).complete("hi").await.unwrap_err();
        match err {
            CompletionError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_choices_reported_as_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server.uri()).complete("hi").await.unwrap_err();
        assert!(matches!(err, CompletionError::EmptyReply));
    }
}
