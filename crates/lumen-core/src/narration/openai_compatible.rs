//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API.
//! The default endpoint is Groq's hosted API; local servers such as vLLM or
//! llama-server work too when `LUMEN_NARRATION_URL` points at them.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{Credential, NarrationConfig};
use crate::error::{Error, Result};

use super::types::NarrationRequest;
use super::NarrationBackend;

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    url: String,
    model: String,
    credential: Option<Credential>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

impl OpenAICompatibleBackend {
    /// Create from resolved config
    pub fn from_config(config: &NarrationConfig, credential: Option<Credential>) -> Result<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            url: config.url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            credential,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Sibling `/models` endpoint used for health checks
    fn models_url(&self) -> String {
        match self.url.strip_suffix("/chat/completions") {
            Some(base) => format!("{}/models", base),
            None => self.url.clone(),
        }
    }

    fn build_body(&self, request: &NarrationRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if !request.system.trim().is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.user.clone(),
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// OpenAI chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Pull `choices[0].message.content` out of a reply body
fn extract_content(body: &str) -> Result<String> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("Reply is not a chat completion: {}", e)))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| Error::MalformedResponse("Reply has no choices[0].message.content".into()))?;

    let content = content.trim();
    if content.is_empty() {
        return Err(Error::MalformedResponse("Reply content is empty".into()));
    }
    Ok(content.to_string())
}

#[async_trait]
impl NarrationBackend for OpenAICompatibleBackend {
    async fn complete(&self, request: &NarrationRequest) -> Result<String> {
        let credential = self.credential.as_ref().ok_or_else(|| {
            Error::Configuration(
                "API key not configured. Set LUMEN_API_KEY or GROQ_API_KEY, or add it to .env"
                    .into(),
            )
        })?;

        debug!(
            url = %self.url,
            model = %self.model,
            key = %credential.redacted(),
            "Sending narration request"
        );

        let response = self
            .http_client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", credential.key()))
            .json(&self.build_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Narration endpoint returned an error");
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        extract_content(&body)
    }

    async fn health_check(&self) -> bool {
        let mut req = self.http_client.get(self.models_url());
        if let Some(ref credential) = self.credential {
            req = req.header("Authorization", format!("Bearer {}", credential.key()));
        }

        match req.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Narration health check failed");
                false
            }
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CredentialSource;
    use crate::test_utils::{MockChatServer, ServerMode};

    fn backend_for(url: &str, with_key: bool) -> OpenAICompatibleBackend {
        let config = NarrationConfig {
            url: url.to_string(),
            ..Default::default()
        };
        let credential = with_key
            .then(|| Credential::new("gsk_test", CredentialSource::Env("LUMEN_API_KEY")))
            .flatten();
        OpenAICompatibleBackend::from_config(&config, credential).unwrap()
    }

    fn request() -> NarrationRequest {
        NarrationRequest {
            system: "You are an analyst.".into(),
            user: "How is revenue?".into(),
        }
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  Executive Summary: ok \n"}}]}"#;
        assert_eq!(extract_content(body).unwrap(), "Executive Summary: ok");
    }

    #[test]
    fn test_extract_content_malformed() {
        for body in [
            "not json",
            r#"{"choices":[]}"#,
            r#"{"error":{"message":"x"}}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
        ] {
            assert!(
                matches!(extract_content(body), Err(Error::MalformedResponse(_))),
                "body: {}",
                body
            );
        }
    }

    #[test]
    fn test_request_body_shape() {
        let backend = backend_for("http://localhost:1/v1/chat/completions", true);
        let body = serde_json::to_value(backend.build_body(&request())).unwrap();

        assert_eq!(body["model"], "mixtral-8x7b-32768");
        assert_eq!(body["max_tokens"], 1500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "How is revenue?");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((body["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_models_url() {
        let backend = backend_for("https://api.groq.com/openai/v1/chat/completions/", false);
        assert_eq!(backend.models_url(), "https://api.groq.com/openai/v1/models");
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let server = MockChatServer::start(ServerMode::Reply("unused".into())).await;
        let backend = backend_for(&server.chat_url(), false);

        let result = backend.complete(&request()).await;
        assert!(matches!(result, Err(Error::Configuration(_))));
        assert_eq!(server.request_count(), 0);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server =
            MockChatServer::start(ServerMode::Reply("Executive Summary: Fine.".into())).await;
        let backend = backend_for(&server.chat_url(), true);

        let reply = backend.complete(&request()).await.unwrap();
        assert_eq!(reply, "Executive Summary: Fine.");
        assert_eq!(server.request_count(), 1);

        let sent = server.last_request().unwrap();
        assert_eq!(sent["messages"][0]["content"], "You are an analyst.");
        assert_eq!(server.last_authorization().as_deref(), Some("Bearer gsk_test"));
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let server = MockChatServer::start(ServerMode::Status(503)).await;
        let backend = backend_for(&server.chat_url(), true);

        let result = backend.complete(&request()).await;
        assert!(matches!(result, Err(Error::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_complete_malformed() {
        let server = MockChatServer::start(ServerMode::Malformed).await;
        let backend = backend_for(&server.chat_url(), true);

        let result = backend.complete(&request()).await;
        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport() {
        // Port 9 (discard) on localhost is closed on test machines
        let backend = backend_for("http://127.0.0.1:9/v1/chat/completions", true);
        let result = backend.complete(&request()).await;
        assert!(matches!(result, Err(Error::Http(_))));
        assert!(!backend.health_check().await);
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockChatServer::start(ServerMode::Reply("ok".into())).await;
        let backend = backend_for(&server.chat_url(), true);
        assert!(backend.health_check().await);
    }
}
