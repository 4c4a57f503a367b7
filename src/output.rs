//! Presentation data produced by analysis and consumed by preview and export.
//!
//! Field names follow the JSON the AI model is asked to produce
//! (`speakerNotes` is camelCase on the wire). The model is expected to honour
//! the schema but is not trusted blindly: [`PresentationResult::validate`]
//! rejects output the rest of the pipeline cannot render, while tolerating
//! slide and bullet counts outside the nominal ranges.

use crate::contract::{MAX_BULLETS, MAX_SLIDES, MIN_BULLETS, MIN_SLIDES};
use crate::error::Pdf2SlidesError;
use crate::pipeline::export::ExportedFile;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// One content slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub speaker_notes: String,
}

/// The single aggregate an analysis produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationResult {
    pub topic: String,
    pub summary: String,
    pub slides: Vec<Slide>,
}

impl PresentationResult {
    /// Check the invariants the preview and export steps rely on.
    ///
    /// Hard failures: blank topic, blank summary, no slides, a slide with a
    /// blank title.
    /// Counts outside the prompt's nominal ranges are only logged.
    pub fn validate(&self) -> Result<(), Pdf2SlidesError> {
        if self.topic.trim().is_empty() {
            return Err(malformed("topic is empty"));
        }
        if self.summary.trim().is_empty() {
            return Err(malformed("summary is empty"));
        }
        if self.slides.is_empty() {
            return Err(malformed("presentation has no slides"));
        }
        if let Some(pos) = self.slides.iter().position(|s| s.title.trim().is_empty()) {
            return Err(malformed(format!("slide {} has an empty title", pos + 1)));
        }

        let n = self.slides.len();
        if !(MIN_SLIDES..=MAX_SLIDES).contains(&n) {
            warn!(
                "Model returned {} slides (expected {}–{}); continuing",
                n, MIN_SLIDES, MAX_SLIDES
            );
        }
        for (i, slide) in self.slides.iter().enumerate() {
            let b = slide.bullets.len();
            if !(MIN_BULLETS..=MAX_BULLETS).contains(&b) {
                warn!(
                    "Slide {} has {} bullets (expected {}–{}); continuing",
                    i + 1,
                    b,
                    MIN_BULLETS,
                    MAX_BULLETS
                );
            }
        }
        Ok(())
    }

    /// Number of content slides (the title slide is not counted).
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

fn malformed(detail: impl Into<String>) -> Pdf2SlidesError {
    Pdf2SlidesError::MalformedResponse {
        detail: detail.into(),
    }
}

/// Timing and size figures for one end-to-end conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Size of the source document in bytes.
    pub document_bytes: u64,
    /// Content slides in the deck (title slide excluded).
    pub slide_count: usize,
    pub analysis_duration_ms: u64,
    pub export_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything [`crate::convert::convert_to_pptx`] produces.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub presentation: Arc<PresentationResult>,
    pub file: ExportedFile,
    pub stats: ConversionStats,
}
