//! Native Gemini backend: inline PDF attachment + `responseSchema`.
//!
//! Gemini reads PDFs natively and enforces a JSON schema on its output, which
//! is exactly the contract this crate needs. The edgequake-llm providers treat
//! attachments as images and cannot pass a schema, so Gemini is called over
//! its REST API directly.
//!
//! ```text
//! POST {base}/models/{model}:generateContent
//! x-goog-api-key: …
//! {
//!   "contents": [{ "role": "user", "parts": [
//!       { "inlineData": { "mimeType": "application/pdf", "data": "<base64>" } },
//!       { "text": "<prompt>" } ] }],
//!   "generationConfig": { "responseMimeType": "application/json",
//!                         "responseSchema": { … }, "temperature": 0.3,
//!                         "maxOutputTokens": 8192 }
//! }
//! ```

use crate::error::Pdf2SlidesError;
use crate::pipeline::analyze::{ContentGenerator, GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

const PROVIDER: &str = "gemini";

/// Gemini REST client.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiGenerator {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, Pdf2SlidesError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Pdf2SlidesError::ProviderNotConfigured {
                provider: PROVIDER.to_string(),
                hint: "The Gemini API key is empty. Pass --api-key or set GEMINI_API_KEY.".into(),
            });
        }
        let client = Client::builder()
            .build()
            .map_err(|e| Pdf2SlidesError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ContentGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, Pdf2SlidesError> {
        let body = build_request_body(request);
        debug!(
            "POST {} ({} bytes of attachment)",
            self.endpoint(),
            request.document.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Pdf2SlidesError::LlmApiError {
                message: format!("request to Gemini failed: {e}"),
                transient: e.is_timeout() || e.is_connect() || e.is_request(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_secs = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let detail = response.text().await.unwrap_or_default();
            return Err(classify_status(status, retry_after_secs, detail));
        }

        let parsed: GenerateContentResponse =
            response
                .json()
                .await
                .map_err(|e| Pdf2SlidesError::LlmApiError {
                    message: format!("unreadable Gemini response: {e}"),
                    transient: false,
                })?;

        Ok(parsed.into_generation_response())
    }
}

/// Map a non-2xx status onto the error taxonomy.
fn classify_status(
    status: StatusCode,
    retry_after_secs: Option<u64>,
    detail: String,
) -> Pdf2SlidesError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Pdf2SlidesError::AuthError {
            provider: PROVIDER.to_string(),
            detail: truncate(&detail, 300),
        },
        StatusCode::TOO_MANY_REQUESTS => Pdf2SlidesError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
            retry_after_secs,
        },
        s => Pdf2SlidesError::LlmApiError {
            message: format!("HTTP {}: {}", s.as_u16(), truncate(&detail, 300)),
            transient: s.is_server_error(),
        },
    }
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}\u{2026}", &s[..idx]),
        None => s.to_string(),
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
    temperature: f32,
    max_output_tokens: usize,
}

fn build_request_body<'a>(request: &GenerationRequest<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: request.document.mime_type(),
                        data: request.document.as_str(),
                    },
                },
                Part::Text {
                    text: request.prompt,
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: request.schema,
            temperature: request.temperature,
            max_output_tokens: request.max_output_tokens,
        },
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_generation_response(self) -> GenerationResponse {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.is_empty());
        let usage = self.usage_metadata.unwrap_or_default();

        GenerationResponse {
            text,
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::presentation_schema;
    use crate::pipeline::encode::encode_bytes;

    #[test]
    fn request_body_matches_wire_contract() {
        let payload = encode_bytes(b"%PDF-1.4");
        let req = GenerationRequest {
            document: &payload,
            prompt: "make slides",
            schema: presentation_schema(),
            temperature: 0.3,
            max_output_tokens: 1024,
        };
        let body = serde_json::to_value(build_request_body(&req)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "JVBERi0xLjQ=");
        assert_eq!(parts[1]["text"], "make slides");

        let cfg = &body["generationConfig"];
        assert_eq!(cfg["responseMimeType"], "application/json");
        assert_eq!(cfg["responseSchema"]["type"], "OBJECT");
        assert_eq!(cfg["maxOutputTokens"], 1024);
        assert!((cfg["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn response_text_parts_are_joined() {
        let raw = r#"{
            "candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}],
            "usageMetadata": {"promptTokenCount": 1200, "candidatesTokenCount": 300}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let r = parsed.into_generation_response();
        assert_eq!(r.text.as_deref(), Some("{\"a\":1}"));
        assert_eq!(r.input_tokens, 1200);
        assert_eq!(r.output_tokens, 300);
    }

    #[test]
    fn response_without_candidates_has_no_text() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert_eq!(parsed.into_generation_response().text, None);

        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#).unwrap();
        assert_eq!(parsed.into_generation_response().text, None);
    }

    #[test]
    fn status_classification() {
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, None, "denied".into()),
            Pdf2SlidesError::AuthError { .. }
        ));
        match classify_status(StatusCode::TOO_MANY_REQUESTS, Some(7), String::new()) {
            Pdf2SlidesError::RateLimitExceeded {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, Some(7)),
            other => panic!("unexpected {other:?}"),
        }
        let e = classify_status(StatusCode::SERVICE_UNAVAILABLE, None, "busy".into());
        assert!(e.is_retryable());
        let e = classify_status(StatusCode::BAD_REQUEST, None, "bad schema".into());
        assert!(!e.is_retryable());
        assert!(e.to_string().contains("400"));
    }

    #[test]
    fn empty_key_is_rejected() {
        let err = GeminiGenerator::new(" ", "gemini-2.5-flash", "http://x").unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::ProviderNotConfigured { .. }));
    }

    #[test]
    fn endpoint_includes_model() {
        let g = GeminiGenerator::new("k", "gemini-2.5-flash", "http://localhost:1/v1beta/").unwrap();
        assert_eq!(
            g.endpoint(),
            "http://localhost:1/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(!format!("{g:?}").contains("\"k\""));
    }
}
