//! Error types for the edgequake-pdf2slides library.
//!
//! Two shapes serve two audiences:
//!
//! * [`Pdf2SlidesError`]: the typed error every fallible operation returns.
//!   Variants are grouped by the stage that produces them (selection, read,
//!   analysis, export) so callers can match on exactly what went wrong.
//!
//! * [`ProcessingError`]: the flat `{ message, details }` record the
//!   [`crate::orchestrator::Orchestrator`] stores in its state for the
//!   presentation layer. It is built from a `Pdf2SlidesError` at the
//!   orchestrator boundary and never travels back into the pipeline.

use crate::orchestrator::ProcessingStatus;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// User-facing message for any failure during extraction or analysis.
pub const PROCESSING_FAILED_MESSAGE: &str = "Failed to process document";

/// User-facing message for a failed export.
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate PPT file.";

/// All errors returned by the edgequake-pdf2slides library.
#[derive(Debug, Error)]
pub enum Pdf2SlidesError {
    // ── Selection (validation) errors ─────────────────────────────────────
    /// The selected file is not a PDF.
    #[error("'{name}' is not a PDF (media type '{media_type}').\nOnly PDF documents can be converted.")]
    InvalidFileType { name: String, media_type: String },

    /// The selected file exceeds the configured size limit.
    #[error("'{name}' is {size} bytes, which exceeds the {limit}-byte limit.\nSplit the document or raise --max-file-size.")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    /// The input path does not exist.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    // ── State machine errors ──────────────────────────────────────────────
    /// A processing cycle is already in flight.
    #[error("A document is already being processed (status: {status}).\nWait for it to finish before selecting another file.")]
    Busy { status: ProcessingStatus },

    /// The requested action is not legal in the current status.
    #[error("Cannot {action} while status is {status}")]
    InvalidState {
        action: &'static str,
        status: ProcessingStatus,
    },

    // ── Read errors ───────────────────────────────────────────────────────
    /// The document bytes could not be read.
    #[error("Failed to read '{name}': {source}")]
    ReadFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Analysis errors ───────────────────────────────────────────────────
    /// The configured AI provider is not initialised (missing API key etc.).
    #[error("AI provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The AI collaborator returned no textual payload.
    #[error("The AI model returned an empty response (provider '{provider}')")]
    EmptyResponse { provider: String },

    /// The AI collaborator returned text that is not a valid presentation.
    #[error("The AI model returned a malformed presentation: {detail}")]
    MalformedResponse { detail: String },

    /// The AI API returned an error.
    ///
    /// `transient` is set for 5xx responses and transport failures, which a
    /// retry may fix.
    #[error("AI API error: {message}")]
    LlmApiError { message: String, transient: bool },

    /// The AI API returned HTTP 429.
    #[error("Rate limit exceeded for provider '{provider}'")]
    RateLimitExceeded {
        provider: String,
        retry_after_secs: Option<u64>,
    },

    /// The AI API rejected the credentials (401/403).
    #[error("Authentication error from provider '{provider}': {detail}")]
    AuthError { provider: String, detail: String },

    /// The AI call exceeded the configured bound.
    #[error("AI call timed out after {secs}s\nIncrease --api-timeout.")]
    ApiTimeout { secs: u64 },

    // ── Export errors ─────────────────────────────────────────────────────
    /// The presentation file could not be assembled.
    #[error("Failed to build presentation file: {detail}")]
    ExportFailed { detail: String },

    /// The presentation file could not be written.
    #[error("Failed to write presentation file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2SlidesError {
    /// True for errors raised by file-selection validation, before any
    /// asynchronous work starts.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidFileType { .. } | Self::FileTooLarge { .. } | Self::FileNotFound { .. }
        )
    }

    /// True for collaborator failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiTimeout { .. } | Self::RateLimitExceeded { .. } => true,
            Self::LlmApiError { transient, .. } => *transient,
            _ => false,
        }
    }

    /// True for failures of the export step.
    pub fn is_export(&self) -> bool {
        matches!(self, Self::ExportFailed { .. } | Self::OutputWriteFailed { .. })
    }
}

/// The `{ message, details }` record shown to the user after a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ProcessingError {
    /// Wrap an extraction/analysis failure.
    pub fn pipeline(err: &Pdf2SlidesError) -> Self {
        Self {
            message: PROCESSING_FAILED_MESSAGE.to_string(),
            details: Some(err.to_string()),
        }
    }

    /// Wrap an export failure.
    pub fn export(err: &Pdf2SlidesError) -> Self {
        Self {
            message: EXPORT_FAILED_MESSAGE.to_string(),
            details: Some(err.to_string()),
        }
    }
}

impl std::fmt::Display for ProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(d) => write!(f, "{}: {}", self.message, d),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_display() {
        let e = Pdf2SlidesError::FileTooLarge {
            name: "big.pdf".into(),
            size: 11_000_000,
            limit: 10_485_760,
        };
        let msg = e.to_string();
        assert!(msg.contains("big.pdf"), "got: {msg}");
        assert!(msg.contains("10485760"), "got: {msg}");
        assert!(e.is_validation());
    }

    #[test]
    fn empty_response_mentions_empty() {
        let e = Pdf2SlidesError::EmptyResponse {
            provider: "gemini".into(),
        };
        assert!(e.to_string().contains("empty response"));
        assert!(!e.is_retryable());
    }

    #[test]
    fn retryable_classification() {
        assert!(Pdf2SlidesError::ApiTimeout { secs: 5 }.is_retryable());
        assert!(Pdf2SlidesError::RateLimitExceeded {
            provider: "gemini".into(),
            retry_after_secs: None,
        }
        .is_retryable());
        assert!(Pdf2SlidesError::LlmApiError {
            message: "HTTP 503".into(),
            transient: true,
        }
        .is_retryable());
        assert!(!Pdf2SlidesError::LlmApiError {
            message: "HTTP 400".into(),
            transient: false,
        }
        .is_retryable());
        assert!(!Pdf2SlidesError::MalformedResponse {
            detail: "eof".into()
        }
        .is_retryable());
    }

    #[test]
    fn processing_error_wraps_details() {
        let e = Pdf2SlidesError::MalformedResponse {
            detail: "expected value at line 1".into(),
        };
        let pe = ProcessingError::pipeline(&e);
        assert_eq!(pe.message, PROCESSING_FAILED_MESSAGE);
        assert!(pe.details.as_deref().unwrap().contains("line 1"));

        let pe = ProcessingError::export(&Pdf2SlidesError::ExportFailed {
            detail: "zip".into(),
        });
        assert_eq!(pe.message, "Failed to generate PPT file.");
    }

    #[test]
    fn processing_error_serialises_without_empty_details() {
        let pe = ProcessingError {
            message: "x".into(),
            details: None,
        };
        let json = serde_json::to_string(&pe).unwrap();
        assert_eq!(json, r#"{"message":"x"}"#);
    }
}
