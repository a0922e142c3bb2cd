//! Model-based receipt extraction.
//!
//! The document text is embedded in a fixed instruction prompt and sent to a
//! chat-completion backend. The reply is parsed permissively: the first `{`
//! through the last `}` is decoded as JSON. A reply that cannot be decoded
//! is a [`ModelReply`] variant, not an error.

use std::time::Instant;

use rrx_llm::{CompletionBackend, CompletionRequest};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::config::LlmConfig;
use crate::models::receipt::{ExtractedRecord, FIELD_NAMES};

use super::rules::JSON_SPAN;

/// Warning shown when the reply held a brace span that failed to decode.
pub const MALFORMED_WARNING: &str = "Couldn't parse JSON from model response.";

/// Warning shown when the reply held no brace span at all.
pub const NO_JSON_WARNING: &str = "Model response didn't contain valid JSON.";

/// Outcome of parsing a model reply.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// A JSON value was decoded from the reply.
    Parsed(Value),
    /// The reply contained no `{...}` span.
    NoJson,
    /// A span was found but did not decode.
    Malformed(String),
}

impl ModelReply {
    /// User-facing warning for unparsed replies.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            ModelReply::Parsed(_) => None,
            ModelReply::NoJson => Some(NO_JSON_WARNING),
            ModelReply::Malformed(_) => Some(MALFORMED_WARNING),
        }
    }
}

/// Result of model extraction.
#[derive(Debug, Clone)]
pub struct ModelExtraction {
    /// Parsed reply.
    pub reply: ModelReply,
    /// Reply text as returned by the service.
    pub raw_reply: String,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ModelExtraction {
    /// Decoded JSON, if the reply parsed.
    pub fn data(&self) -> Option<&Value> {
        match &self.reply {
            ModelReply::Parsed(value) => Some(value),
            _ => None,
        }
    }

    /// Record view of a parsed JSON object.
    pub fn record(&self) -> Option<ExtractedRecord> {
        self.data()
            .and_then(Value::as_object)
            .map(ExtractedRecord::from_json_object)
    }
}

/// Build the extraction prompt for a document.
pub fn build_prompt(text: &str) -> String {
    let bullets: String = FIELD_NAMES
        .iter()
        .map(|name| format!("- {}\n", name))
        .collect();

    let example: Vec<String> = FIELD_NAMES
        .iter()
        .map(|name| format!("  \"{}\": \"...\"", name))
        .collect();

    format!(
        "\nExtract the following fields from the text:\n\n{}\nText:\n{}\n\nRespond in this JSON format:\n{{\n{}\n}}\n",
        bullets,
        text,
        example.join(",\n")
    )
}

/// Parse a model reply into JSON.
pub fn parse_reply(reply: &str) -> ModelReply {
    let Some(span) = JSON_SPAN.find(reply) else {
        return ModelReply::NoJson;
    };

    match serde_json::from_str(span.as_str()) {
        Ok(value) => ModelReply::Parsed(value),
        Err(e) => ModelReply::Malformed(e.to_string()),
    }
}

/// Receipt extractor backed by a chat-completion model.
pub struct ModelExtractor<B> {
    backend: B,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl<B: CompletionBackend> ModelExtractor<B> {
    /// Create an extractor using the model settings from `config`.
    pub fn new(backend: B, config: &LlmConfig) -> Self {
        Self {
            backend,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Model identifier sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request that would be sent for `text`.
    pub fn request_for(&self, text: &str) -> CompletionRequest {
        CompletionRequest::single(&self.model, build_prompt(text), self.temperature)
            .with_max_tokens(self.max_tokens)
    }

    /// Send the document to the model and parse its reply.
    ///
    /// Service failures are returned as errors; an unparseable reply is a
    /// successful [`ModelExtraction`] carrying a warning.
    pub async fn extract(&self, text: &str) -> crate::Result<ModelExtraction> {
        let start = Instant::now();
        info!(
            "Requesting extraction from {} ({}) for {} characters",
            self.backend.name(),
            self.model,
            text.len()
        );

        let request = self.request_for(text);
        let raw_reply = self.backend.complete(&request).await?;
        let reply = parse_reply(&raw_reply);

        match &reply {
            ModelReply::Parsed(_) => debug!("Model reply parsed as JSON"),
            ModelReply::NoJson => warn!("Model reply contained no JSON object"),
            ModelReply::Malformed(e) => warn!("Model reply JSON did not decode: {}", e),
        }

        Ok(ModelExtraction {
            reply,
            raw_reply,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rrx_llm::LlmError;
    use std::sync::Mutex;

    /// Backend returning a canned reply and remembering the request.
    struct CannedBackend {
        reply: std::result::Result<String, u16>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl CannedBackend {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionBackend for CannedBackend {
        async fn complete(&self, request: &CompletionRequest) -> rrx_llm::Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    body: "rate limited".to_string(),
                }),
            }
        }

        fn name(&self) -> &str {
            "canned"
        }
    }

    #[test]
    fn test_prompt_is_deterministic_and_embeds_text() {
        let text = "RR No: 77\nStation From: Howrah";
        let prompt = build_prompt(text);

        assert_eq!(prompt, build_prompt(text));
        assert!(prompt.starts_with("\nExtract the following fields from the text:\n\n- RR No\n"));
        assert!(prompt.contains("- Actual Weight\n\nText:\nRR No: 77\nStation From: Howrah\n\n"));
        for name in FIELD_NAMES {
            assert!(prompt.contains(&format!("- {}\n", name)));
        }
    }

    #[test]
    fn test_prompt_example_is_valid_json() {
        let prompt = build_prompt("irrelevant");
        let tail = prompt.split("Respond in this JSON format:").nth(1).unwrap();

        let ModelReply::Parsed(Value::Object(example)) = parse_reply(tail) else {
            panic!("example block did not parse");
        };
        let mut keys: Vec<&str> = example.keys().map(String::as_str).collect();
        keys.sort();
        let mut expected = FIELD_NAMES.to_vec();
        expected.sort();
        assert_eq!(keys, expected);
        assert!(example.values().all(|v| v == "..."));
    }

    #[test]
    fn test_parse_reply_with_surrounding_text() {
        let reply = "Sure! Here is the data:\n{\"RR No\": \"RR5\", \"No. of Wagon\": \"3\"}\nLet me know.";
        assert_eq!(
            parse_reply(reply),
            ModelReply::Parsed(serde_json::json!({"RR No": "RR5", "No. of Wagon": "3"}))
        );
    }

    #[test]
    fn test_parse_reply_in_code_fence() {
        let reply = "```json\n{\n  \"RR Date\": \"01.02.2024\"\n}\n```";
        assert_eq!(
            parse_reply(reply),
            ModelReply::Parsed(serde_json::json!({"RR Date": "01.02.2024"}))
        );
    }

    #[test]
    fn test_parse_reply_without_braces() {
        let reply = parse_reply("I could not find any railway receipt fields.");
        assert_eq!(reply, ModelReply::NoJson);
        assert_eq!(reply.warning(), Some(NO_JSON_WARNING));
    }

    #[test]
    fn test_parse_reply_malformed() {
        // Greedy span covers both objects and the text between them.
        let reply = parse_reply("{\"a\": 1} and also {\"b\": 2}");
        assert!(matches!(reply, ModelReply::Malformed(_)));
        assert_eq!(reply.warning(), Some(MALFORMED_WARNING));

        assert!(matches!(parse_reply("{not json}"), ModelReply::Malformed(_)));
    }

    #[tokio::test]
    async fn test_extract_sends_prompt_and_parses_reply() {
        let backend = CannedBackend::replying(
            "Here you go: {\"RR No\": \"RR123\", \"No. of Wagon\": 5, \"Station To\": \"Mumbai\"}",
        );
        let config = LlmConfig::default();
        let extractor = ModelExtractor::new(backend, &config);

        let result = extractor.extract("RR No: RR123").await.unwrap();

        assert!(result.reply.warning().is_none());
        let record = result.record().unwrap();
        assert_eq!(record.rr_no, "RR123");
        assert_eq!(record.no_of_wagon, "5");
        assert_eq!(record.station_to, "Mumbai");
        assert_eq!(record.actual_weight, "");

        let seen = extractor.backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model, "gpt-3.5-turbo-1106");
        assert_eq!(seen[0].temperature, 0.2);
        assert_eq!(seen[0].messages.len(), 1);
        assert_eq!(seen[0].messages[0].content, build_prompt("RR No: RR123"));
    }

    #[tokio::test]
    async fn test_extract_unparsed_reply_is_not_an_error() {
        let extractor = ModelExtractor::new(CannedBackend::replying("no idea"), &LlmConfig::default());

        let result = extractor.extract("text").await.unwrap();
        assert_eq!(result.reply, ModelReply::NoJson);
        assert_eq!(result.raw_reply, "no idea");
        assert!(result.data().is_none());
        assert!(result.record().is_none());
    }

    #[tokio::test]
    async fn test_extract_propagates_service_failure() {
        let extractor = ModelExtractor::new(CannedBackend::failing(429), &LlmConfig::default());

        let err = extractor.extract("text").await.unwrap_err();
        assert!(matches!(
            err,
            crate::RrxError::Llm(LlmError::Api { status: 429, .. })
        ));
    }

    #[test]
    fn test_request_honours_config() {
        let config = LlmConfig {
            model: "local-model".to_string(),
            temperature: 0.0,
            max_tokens: Some(300),
            ..Default::default()
        };
        let extractor = ModelExtractor::new(CannedBackend::replying(""), &config);
        let request = extractor.request_for("abc");

        assert_eq!(extractor.model(), "local-model");
        assert_eq!(request.max_tokens, Some(300));
        assert_eq!(request.temperature, 0.0);
    }
}
