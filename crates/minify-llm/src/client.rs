//! OpenAI-compatible chat completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LlmError, Result};

/// Chat completion request payload
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

/// Anything that can answer a chat completion request with text
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Send `request` and return the first choice's message content
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Clone)]
pub struct ApiSettings {
    /// Base URL, e.g. `https://api.openai.com/v1`
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("minify/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(LlmError::Client)?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    /// `{endpoint}/chat/completions`
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let url = self.completions_url();
        debug!("POST {} (model {})", url, request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::compression_request;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(endpoint: String) -> ApiSettings {
        ApiSettings {
            endpoint,
            api_key: "test-key".to_string(),
            model: "gpt-4o".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_completions_url() {
        let client = OpenAiClient::new(&settings("https://api.openai.com/v1/".into())).unwrap();
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", settings("http://localhost".into()));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn complete_posts_expected_payload() {
        let server = MockServer::start_async().await;

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer test-key")
                    .json_body_partial(r#"{"model":"gpt-4o","temperature":0.2}"#);
                then.status(200).json_body(json!({
                    "choices": [
                        { "message": { "role": "assistant", "content": "compressed" } }
                    ]
                }));
            })
            .await;

        let client = OpenAiClient::new(&settings(server.url("/v1"))).unwrap();
        let output = client
            .complete(&compression_request("gpt-4o", "original text"))
            .await
            .expect("request should succeed");

        assert_eq!(output, "compressed");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn complete_reports_api_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/chat/completions");
                then.status(401).body("invalid api key");
            })
            .await;

        let client = OpenAiClient::new(&settings(server.url("/v1"))).unwrap();
        let err = client
            .complete(&compression_request("gpt-4o", "text"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 401, ref body } if body == "invalid api key"));
    }

    #[tokio::test]
    async fn complete_rejects_malformed_and_empty_responses() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/bad/chat/completions");
                then.status(200).body("not json");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/empty/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let request = compression_request("gpt-4o", "text");

        let client = OpenAiClient::new(&settings(server.url("/bad"))).unwrap();
        assert!(matches!(
            client.complete(&request).await.unwrap_err(),
            LlmError::Decode(_)
        ));

        let client = OpenAiClient::new(&settings(server.url("/empty"))).unwrap();
        assert!(matches!(
            client.complete(&request).await.unwrap_err(),
            LlmError::EmptyResponse
        ));
    }
}
