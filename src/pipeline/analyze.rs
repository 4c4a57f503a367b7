//! Analysis: send the encoded PDF and the content contract to the AI model and
//! turn its answer into a validated [`PresentationResult`].
//!
//! Two seams keep the orchestrator independent of any SDK:
//!
//! * [`ContentGenerator`]: the raw AI collaborator. One request in, optional
//!   text out. Implemented by [`crate::pipeline::gemini::GeminiGenerator`] and
//!   [`crate::pipeline::llm::LlmGenerator`].
//! * [`PresentationAnalyzer`]: the `analyze(payload)` capability the
//!   orchestrator calls. [`AnalysisClient`] implements it over any generator.
//!
//! ## Retry Strategy
//!
//! A single attempt by default. With `max_retries > 0`, only transient
//! failures (timeout, 429, 5xx, transport) are retried, waiting
//! `retry_backoff_ms * 2^(attempt-1)` between attempts. An answer that
//! arrives but is empty or malformed is final: asking again for the same
//! document rarely helps and doubles the cost.

use crate::config::SlidesConfig;
use crate::contract;
use crate::error::Pdf2SlidesError;
use crate::output::PresentationResult;
use crate::pipeline::encode::EncodedPayload;
use crate::pipeline::postprocess;
use crate::progress::ProgressCallback;
use crate::prompts::DEFAULT_INSTRUCTION_PROMPT;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Everything the AI collaborator receives for one call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// The document, attached with `document.mime_type()`.
    pub document: &'a EncodedPayload,
    /// Natural-language instruction.
    pub prompt: &'a str,
    /// Output-shape constraint.
    pub schema: &'a Value,
    pub temperature: f32,
    pub max_output_tokens: usize,
}

/// The collaborator's answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationResponse {
    /// Textual body; `None` when the model produced no text part at all.
    pub text: Option<String>,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

/// The raw AI collaborator.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Short provider label for logs and error messages.
    fn name(&self) -> &str;

    /// Run one generation request. Implementations must not retry.
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, Pdf2SlidesError>;
}

/// The analysis capability the orchestrator depends on.
#[async_trait]
pub trait PresentationAnalyzer: Send + Sync {
    async fn analyze(&self, payload: &EncodedPayload)
        -> Result<PresentationResult, Pdf2SlidesError>;
}

/// Knobs for [`AnalysisClient`].
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: usize,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub timeout: Option<Duration>,
}

impl AnalysisOptions {
    pub fn from_config(config: &SlidesConfig) -> Self {
        Self {
            prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_INSTRUCTION_PROMPT.to_string()),
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
            timeout: config.api_timeout_secs.map(Duration::from_secs),
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&SlidesConfig::default())
    }
}

/// [`PresentationAnalyzer`] over any [`ContentGenerator`].
pub struct AnalysisClient {
    generator: Arc<dyn ContentGenerator>,
    options: AnalysisOptions,
    progress: Option<ProgressCallback>,
}

impl AnalysisClient {
    pub fn new(generator: Arc<dyn ContentGenerator>, options: AnalysisOptions) -> Self {
        Self {
            generator,
            options,
            progress: None,
        }
    }

    pub fn with_progress(mut self, cb: Option<ProgressCallback>) -> Self {
        self.progress = cb;
        self
    }

    /// One bounded call to the collaborator.
    async fn call_once(
        &self,
        request: &GenerationRequest<'_>,
    ) -> Result<GenerationResponse, Pdf2SlidesError> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.generate(request))
                .await
                .map_err(|_| Pdf2SlidesError::ApiTimeout {
                    secs: limit.as_secs(),
                })?,
            None => self.generator.generate(request).await,
        }
    }

    fn backoff_before(&self, attempt: u32, last_err: Option<&Pdf2SlidesError>) -> Duration {
        let exp = (attempt.saturating_sub(2)).min(16);
        let mut ms = self.options.retry_backoff_ms.saturating_mul(1u64 << exp);
        if let Some(Pdf2SlidesError::RateLimitExceeded {
            retry_after_secs: Some(secs),
            ..
        }) = last_err
        {
            ms = ms.max(secs.saturating_mul(1000));
        }
        Duration::from_millis(ms)
    }
}

#[async_trait]
impl PresentationAnalyzer for AnalysisClient {
    async fn analyze(
        &self,
        payload: &EncodedPayload,
    ) -> Result<PresentationResult, Pdf2SlidesError> {
        let request = GenerationRequest {
            document: payload,
            prompt: &self.options.prompt,
            schema: contract::presentation_schema(),
            temperature: self.options.temperature,
            max_output_tokens: self.options.max_output_tokens,
        };
        let provider = self.generator.name().to_string();
        let max_attempts = self.options.max_retries + 1;
        let start = Instant::now();
        let mut last_err: Option<Pdf2SlidesError> = None;
        let mut attempt = 0u32;

        let response = loop {
            attempt += 1;
            if attempt > 1 {
                let wait = self.backoff_before(attempt, last_err.as_ref());
                warn!(
                    "Analysis retry {}/{} after {}ms",
                    attempt - 1,
                    self.options.max_retries,
                    wait.as_millis()
                );
                sleep(wait).await;
            }
            if let Some(ref cb) = self.progress {
                cb.on_analysis_attempt(attempt, max_attempts);
            }

            match self.call_once(&request).await {
                Ok(r) => break r,
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!("Analysis attempt {} failed: {}", attempt, e);
                    last_err = Some(e);
                }
                Err(e) => return Err(e),
            }
        };

        debug!(
            "{}: {} input tokens, {} output tokens, {:?}",
            provider,
            response.input_tokens,
            response.output_tokens,
            start.elapsed()
        );

        let result = parse_presentation(response.text.as_deref(), &provider)?;
        info!(
            "Analysis produced '{}' with {} slides",
            result.topic,
            result.slides.len()
        );
        Ok(result)
    }
}

/// Parse and validate the collaborator's text.
///
/// Empty or whitespace-only text is [`Pdf2SlidesError::EmptyResponse`];
/// anything `serde_json` rejects, or that fails
/// [`PresentationResult::validate`], is [`Pdf2SlidesError::MalformedResponse`].
pub fn parse_presentation(
    text: Option<&str>,
    provider: &str,
) -> Result<PresentationResult, Pdf2SlidesError> {
    let empty = || Pdf2SlidesError::EmptyResponse {
        provider: provider.to_string(),
    };

    let raw = text.map(str::trim).filter(|t| !t.is_empty()).ok_or_else(empty)?;
    let cleaned = postprocess::clean_json_response(raw);
    if cleaned.is_empty() {
        return Err(empty());
    }

    let result: PresentationResult =
        serde_json::from_str(&cleaned).map_err(|e| Pdf2SlidesError::MalformedResponse {
            detail: e.to_string(),
        })?;
    result.validate()?;
    Ok(result)
}
