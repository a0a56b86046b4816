use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::config::Config;

/// Fixed decoding parameters: low temperature for repeatable structure,
/// bounded output for cost.
pub const TEMPERATURE: f64 = 0.2;
pub const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
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

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Completion API key not configured. Set LLM_API_KEY (or GROQ_API_KEY) in the environment")]
    MissingCredential,

    #[error("Invalid completion API key. Check LLM_API_KEY")]
    InvalidCredential,

    #[error("Completion API rate limit exceeded. Please try again later")]
    RateLimited,

    #[error("Completion API error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unreadable completion response: {0}")]
    Decode(String),
}

impl SynthesisError {
    /// Map a non-success status and its body to an error kind.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => Self::InvalidCredential,
            429 => Self::RateLimited,
            code => Self::Service { status: code, body },
        }
    }
}

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.llm_timeout)
            .build()
            .context("Failed to create LLM HTTP client")?;

        Ok(Self {
            client,
            base_url: config.endpoints.llm.clone(),
            model: config.model.clone(),
            api_key: config.credentials.llm.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve the chat completions endpoint from the base URL.
    fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }

    /// Non-streaming chat completion. Returns the first choice's content, or
    /// an empty string when the service sends none.
    pub async fn chat(&self, messages: &[Message]) -> Result<String, SynthesisError> {
        let Some(key) = &self.api_key else {
            return Err(SynthesisError::MissingCredential);
        };

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let resp = self
            .client
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            error!(status = status.as_u16(), body = %text, "completion API error");
            return Err(SynthesisError::from_status(status, text));
        }

        let json: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| SynthesisError::Decode(e.to_string()))?;

        // choices[0].message.content may be null
        let content = json["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .unwrap_or("")
            .to_string();

        info!(model = %self.model, answer_len = content.len(), "completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::config_for;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> LlmClient {
        let mut config = config_for(&format!("{}/openai/v1", server.uri()));
        config.credentials.llm = key.map(str::to_string);
        LlmClient::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_resolution() {
        let mut config = Config::default();
        for (base, expected) in [
            ("https://api.groq.com/openai/v1", "https://api.groq.com/openai/v1/chat/completions"),
            ("http://localhost:1234/v1/", "http://localhost:1234/v1/chat/completions"),
            ("http://localhost:8080", "http://localhost:8080/v1/chat/completions"),
            ("http://h/v1/chat/completions", "http://h/v1/chat/completions"),
        ] {
            config.endpoints.llm = base.to_string();
            assert_eq!(LlmClient::new(&config).unwrap().endpoint(), expected);
        }
    }

    #[tokio::test]
    async fn test_chat_sends_fixed_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3-70b-8192",
                "temperature": 0.2,
                "max_tokens": 2000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "role": "assistant", "content": "1. Detailed Analysis" } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        let answer = client.chat(&[Message::user("hi")]).await.unwrap();
        assert_eq!(answer, "1. Detailed Analysis");
    }

    #[tokio::test]
    async fn test_null_content_is_empty_answer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": null } }]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        assert_eq!(client.chat(&[Message::user("hi")]).await.unwrap(), "");
    }

    async fn error_for(status: u16) -> SynthesisError {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("sk-test"));
        client.chat(&[Message::user("hi")]).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_status_classification() {
        assert!(matches!(error_for(401).await, SynthesisError::InvalidCredential));
        assert!(matches!(error_for(429).await, SynthesisError::RateLimited));
        match error_for(503).await {
            SynthesisError::Service { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.is_configured());
        let err = client.chat(&[Message::user("hi")]).await.unwrap_err();
        assert!(matches!(err, SynthesisError::MissingCredential));
    }
}
