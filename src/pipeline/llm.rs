//! edgequake-llm backend: any chat provider that accepts attachments.
//!
//! Used when a provider other than Gemini is selected (OpenAI, Anthropic,
//! Ollama, …). These providers cannot enforce a response schema, so the
//! schema travels inside the system message and the answer goes through
//! [`crate::pipeline::postprocess`] before parsing.
//!
//! ## Message Layout
//!
//! 1. **System message**: instruction prompt + JSON-only suffix with the schema
//! 2. **User message**: the PDF as a base64 attachment (empty text)
//!
//! The empty user text mirrors the page-image calls of the Markdown pipeline:
//! the attachment carries all the content.

use crate::contract;
use crate::error::Pdf2SlidesError;
use crate::pipeline::analyze::{ContentGenerator, GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider, LlmError};
use std::sync::Arc;
use tracing::debug;

/// [`ContentGenerator`] over an edgequake-llm provider.
pub struct LlmGenerator {
    provider: Arc<dyn LLMProvider>,
    label: String,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LLMProvider>, label: impl Into<String>) -> Self {
        Self {
            provider,
            label: label.into(),
        }
    }
}

#[async_trait]
impl ContentGenerator for LlmGenerator {
    fn name(&self) -> &str {
        &self.label
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, Pdf2SlidesError> {
        let messages = build_messages(request);
        let options = build_options(request);

        let response = self
            .provider
            .chat(&messages, Some(&options))
            .await
            .map_err(|e| map_llm_error(&self.label, e))?;

        debug!(
            "{}: {} chars of content",
            self.label,
            response.content.len()
        );

        Ok(GenerationResponse {
            text: (!response.content.trim().is_empty()).then_some(response.content),
            input_tokens: response.prompt_tokens,
            output_tokens: response.completion_tokens,
        })
    }
}

/// Translate a provider error. Only rate limits, timeouts, transport and
/// upstream API failures are marked retryable.
fn map_llm_error(label: &str, err: LlmError) -> Pdf2SlidesError {
    match err {
        LlmError::AuthError(detail) => Pdf2SlidesError::AuthError {
            provider: label.to_string(),
            detail,
        },
        LlmError::RateLimited(_) => Pdf2SlidesError::RateLimitExceeded {
            provider: label.to_string(),
            retry_after_secs: None,
        },
        e @ (LlmError::NetworkError(_) | LlmError::ApiError(_) | LlmError::Timeout) => {
            Pdf2SlidesError::LlmApiError {
                message: format!("{label}: {e}"),
                transient: true,
            }
        }
        e => Pdf2SlidesError::LlmApiError {
            message: format!("{label}: {e}"),
            transient: false,
        },
    }
}

fn build_messages(request: &GenerationRequest<'_>) -> Vec<ChatMessage> {
    let attachment = ImageData::new(
        request.document.as_str().to_string(),
        request.document.mime_type(),
    );
    vec![
        ChatMessage::system(contract::schema_instructions(request.prompt, request.schema)),
        ChatMessage::user_with_images("", vec![attachment]),
    ]
}

fn build_options(request: &GenerationRequest<'_>) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(request.temperature),
        max_tokens: Some(request.max_output_tokens),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::encode_bytes;
    use serde_json::json;

    #[test]
    fn build_options_carries_request_knobs() {
        let payload = encode_bytes(b"%PDF");
        let req = GenerationRequest {
            document: &payload,
            prompt: "p",
            schema: contract::presentation_schema(),
            temperature: 0.3,
            max_output_tokens: 8192,
        };
        let opts = build_options(&req);
        assert_eq!(opts.temperature, Some(0.3));
        assert_eq!(opts.max_tokens, Some(8192));
    }

    #[test]
    fn schema_goes_into_system_message() {
        let payload = encode_bytes(b"%PDF");
        let req = GenerationRequest {
            document: &payload,
            prompt: "Design slides.",
            schema: contract::presentation_schema(),
            temperature: 0.3,
            max_output_tokens: 100,
        };
        let messages = build_messages(&req);
        assert_eq!(messages.len(), 2);
        let system = format!("{:?}", messages[0]);
        assert!(system.contains("Design slides."));
        assert!(system.contains("speakerNotes"));
    }

    #[test]
    fn system_message_uses_request_schema() {
        let payload = encode_bytes(b"%PDF");
        let schema = json!({ "type": "OBJECT", "properties": { "headline": { "type": "STRING" } } });
        let req = GenerationRequest {
            document: &payload,
            prompt: "Summarise.",
            schema: &schema,
            temperature: 0.3,
            max_output_tokens: 100,
        };
        let system = format!("{:?}", build_messages(&req)[0]);
        assert!(system.contains("headline"));
        assert!(!system.contains("speakerNotes"));
    }

    #[test]
    fn only_transient_provider_errors_are_retryable() {
        let retryable = |e: LlmError| map_llm_error("openai", e).is_retryable();

        assert!(retryable(LlmError::RateLimited("slow down".into())));
        assert!(retryable(LlmError::NetworkError("reset".into())));
        assert!(retryable(LlmError::ApiError("502".into())));
        assert!(retryable(LlmError::Timeout));

        assert!(!retryable(LlmError::AuthError("bad key".into())));
        assert!(!retryable(LlmError::InvalidRequest("no".into())));
        assert!(!retryable(LlmError::ModelNotFound("gpt-x".into())));
        assert!(!retryable(LlmError::ConfigError("missing".into())));
        assert!(!retryable(LlmError::TokenLimitExceeded { max: 10, got: 20 }));
        assert!(!retryable(LlmError::NotSupported("pdf".into())));
        assert!(!retryable(LlmError::ProviderError("boom".into())));
        assert!(!retryable(LlmError::Unknown("?".into())));
    }

    #[test]
    fn auth_and_rate_limit_keep_their_kind() {
        match map_llm_error("anthropic", LlmError::AuthError("invalid x-api-key".into())) {
            Pdf2SlidesError::AuthError { provider, detail } => {
                assert_eq!(provider, "anthropic");
                assert_eq!(detail, "invalid x-api-key");
            }
            other => panic!("expected AuthError, got {other:?}"),
        }
        assert!(matches!(
            map_llm_error("openai", LlmError::RateLimited("429".into())),
            Pdf2SlidesError::RateLimitExceeded { .. }
        ));
        let msg = map_llm_error("ollama", LlmError::ModelNotFound("llava".into())).to_string();
        assert!(msg.contains("ollama") && msg.contains("llava"), "got: {msg}");
    }
}
