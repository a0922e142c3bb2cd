//! OpenAI-compatible `/chat/completions` backend.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::{CompletionBackend, CompletionRequest, Result};

/// Connection settings for [`OpenAiBackend`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Environment variable holding the bearer token.
    pub api_key_env: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Backend for OpenAI-compatible chat APIs.
pub struct OpenAiBackend {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl OpenAiBackend {
    /// Create a backend with an explicit API key.
    pub fn new(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey("api key".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(base_url),
            api_key,
        })
    }

    /// Create a backend reading the API key from the configured variable.
    pub fn from_env(settings: &OpenAiSettings) -> Result<Self> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(settings.api_key_env.clone()))?;

        Self::new(&settings.base_url, api_key, settings.timeout)
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let start = Instant::now();
        debug!(
            "Posting {} message(s) to {} (model {})",
            request.messages.len(),
            self.endpoint,
            request.model
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Model API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let content = first_choice(&body)?;
        debug!(
            "Model replied with {} chars in {}ms",
            content.len(),
            start.elapsed().as_millis()
        );
        Ok(content)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// Pull the first choice's text out of a response body.
fn first_choice(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(LlmError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_chat_endpoint_trims_trailing_slash() {
        assert_eq!(
            chat_endpoint("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            chat_endpoint("http://localhost:8080/v1"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_first_choice() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "{\"RR No\": \"1\"}"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        }"#;

        assert_eq!(first_choice(body).unwrap(), r#"{"RR No": "1"}"#);
    }

    #[test]
    fn test_first_choice_empty() {
        assert!(matches!(
            first_choice(r#"{"choices": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            first_choice(r#"{"choices": [{"message": {"content": null}}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_first_choice_invalid_body() {
        assert!(matches!(
            first_choice("<html>bad gateway</html>"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_new_rejects_blank_key() {
        let result = OpenAiBackend::new("http://localhost", "  ", Duration::from_secs(1));
        assert!(matches!(result, Err(LlmError::MissingApiKey(_))));
    }

    #[test]
    fn test_from_env_missing_key() {
        let settings = OpenAiSettings {
            api_key_env: "RRX_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };

        match OpenAiBackend::from_env(&settings) {
            Err(LlmError::MissingApiKey(var)) => assert_eq!(var, "RRX_TEST_KEY_THAT_IS_NEVER_SET"),
            other => panic!("expected MissingApiKey, got {:?}", other.map(|b| b.endpoint().to_string())),
        }
    }

    #[test]
    fn test_new_builds_endpoint() {
        let backend = OpenAiBackend::new("http://localhost:1234/v1/", "sk-test", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:1234/v1/chat/completions");
        assert_eq!(backend.name(), "openai");
    }

    #[tokio::test]
    async fn test_complete_reports_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let backend = OpenAiBackend::new("http://127.0.0.1:9/v1", "sk-test", Duration::from_secs(2)).unwrap();
        let request = CompletionRequest::single("gpt-test", "hi", 0.2);

        let result = backend.complete(&request).await;
        assert!(matches!(result, Err(LlmError::Http(_))));
    }
}
