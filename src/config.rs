//! Configuration types for PDF-to-presentation conversion.
//!
//! All behaviour is controlled through [`SlidesConfig`], built via its
//! [`SlidesConfigBuilder`]. Credentials are part of the config: nothing in the
//! library reads an API key from the process environment behind the caller's
//! back (the CLI maps `GEMINI_API_KEY` into [`SlidesConfig::api_key`]).

use crate::error::Pdf2SlidesError;
use crate::pipeline::analyze::ContentGenerator;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Largest document accepted by default: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Model used by the native Gemini backend when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini REST endpoint root.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for a PDF-to-presentation conversion.
///
/// # Example
/// ```rust
/// use edgequake_pdf2slides::SlidesConfig;
///
/// let config = SlidesConfig::builder()
///     .api_key("AIza...")
///     .model("gemini-2.5-flash")
///     .output_dir("decks")
///     .build()
///     .unwrap();
/// assert_eq!(config.temperature, 0.3);
/// ```
#[derive(Clone)]
pub struct SlidesConfig {
    /// Model identifier. If None, the backend default is used
    /// (`gemini-2.5-flash` for the native Gemini backend).
    pub model: Option<String>,

    /// Provider name. `"gemini"` (or None with an `api_key`) selects the native
    /// Gemini backend; any other name is resolved through edgequake-llm's
    /// `ProviderFactory` ("openai", "anthropic", "ollama", …).
    pub provider_name: Option<String>,

    /// Pre-constructed edgequake-llm provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed collaborator. Takes precedence over everything else;
    /// mostly useful for tests and custom transports.
    pub generator: Option<Arc<dyn ContentGenerator>>,

    /// API key for the native Gemini backend.
    pub api_key: Option<String>,

    /// Gemini REST root. Default: [`DEFAULT_GEMINI_BASE_URL`].
    pub gemini_base_url: String,

    /// Sampling temperature. Default: 0.3.
    ///
    /// Low enough to keep the deck grounded in the document, high enough for
    /// slide titles that do not read like a table of contents.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 8192.
    ///
    /// Twelve slides with five bullets and a paragraph of notes each come to
    /// roughly 3 000 tokens; 8 192 leaves room for verbose models.
    pub max_tokens: usize,

    /// Retry attempts on a transient AI failure. Default: 0 (single attempt).
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    pub retry_backoff_ms: u64,

    /// Per-call timeout for the AI request in seconds. Default: Some(120).
    /// `None` leaves the bound to the transport.
    pub api_timeout_secs: Option<u64>,

    /// Custom instruction prompt. If None, uses the built-in default.
    pub system_prompt: Option<String>,

    /// Largest accepted document in bytes. Default: 10 MiB.
    pub max_file_bytes: u64,

    /// Bullet glyph for content slides. Default: [`BulletStyle::Round`].
    pub bullet_style: BulletStyle,

    /// Directory the exported `.pptx` is written to. Default: current directory.
    pub output_dir: PathBuf,

    /// Optional status-transition callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SlidesConfig {
    fn default() -> Self {
        Self {
            model: None,
            provider_name: None,
            provider: None,
            generator: None,
            api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: 0.3,
            max_tokens: 8192,
            max_retries: 0,
            retry_backoff_ms: 500,
            api_timeout_secs: Some(120),
            system_prompt: None,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            bullet_style: BulletStyle::default(),
            output_dir: PathBuf::from("."),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SlidesConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidesConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("max_file_bytes", &self.max_file_bytes)
            .field("bullet_style", &self.bullet_style)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl SlidesConfig {
    /// Create a new builder for `SlidesConfig`.
    pub fn builder() -> SlidesConfigBuilder {
        SlidesConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SlidesConfig`].
#[derive(Debug)]
pub struct SlidesConfigBuilder {
    config: SlidesConfig,
}

impl SlidesConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn ContentGenerator>) -> Self {
        self.config.generator = Some(generator);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.gemini_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    /// Bound each AI call; `0` disables the bound.
    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = (secs > 0).then_some(secs);
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_file_bytes(mut self, bytes: u64) -> Self {
        self.config.max_file_bytes = bytes;
        self
    }

    pub fn bullet_style(mut self, style: BulletStyle) -> Self {
        self.config.bullet_style = style;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SlidesConfig, Pdf2SlidesError> {
        let c = &self.config;
        if c.max_file_bytes == 0 {
            return Err(Pdf2SlidesError::InvalidConfig(
                "max_file_bytes must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(Pdf2SlidesError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if matches!(c.model.as_deref(), Some(m) if m.trim().is_empty()) {
            return Err(Pdf2SlidesError::InvalidConfig(
                "model must not be empty".into(),
            ));
        }
        if c.gemini_base_url.is_empty() {
            return Err(Pdf2SlidesError::InvalidConfig(
                "gemini_base_url must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Glyph used for the bullet list on content slides.
///
/// One style applies to the whole deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BulletStyle {
    /// Round bullet `•` (U+2022). (default)
    #[default]
    Round,
    /// Arabic numerals: `1.`, `2.`, `3.`
    Numbered,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let c = SlidesConfig::default();
        assert_eq!(c.temperature, 0.3);
        assert_eq!(c.max_retries, 0);
        assert_eq!(c.max_file_bytes, 10 * 1024 * 1024);
        assert_eq!(c.bullet_style, BulletStyle::Round);
        assert_eq!(c.api_timeout_secs, Some(120));
    }

    #[test]
    fn builder_clamps_and_validates() {
        let c = SlidesConfig::builder()
            .temperature(9.0)
            .api_timeout_secs(0)
            .gemini_base_url("http://localhost:8080/")
            .build()
            .unwrap();
        assert_eq!(c.temperature, 2.0);
        assert_eq!(c.api_timeout_secs, None);
        assert_eq!(c.gemini_base_url, "http://localhost:8080");

        assert!(SlidesConfig::builder().max_file_bytes(0).build().is_err());
        assert!(SlidesConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let c = SlidesConfig::builder().api_key("secret-key").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<redacted>"));
    }
}
