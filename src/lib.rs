//! # edgequake-pdf2slides
//!
//! Turn a PDF document into a PowerPoint deck using a multimodal AI model.
//!
//! ## Why this crate?
//!
//! Summarising a report into slides is mostly reading: find the topic, pick
//! the 5 to 12 points worth presenting, write notes for the speaker. Modern
//! multimodal models read PDFs natively, including tables and figures, so
//! this crate hands them the whole document with a strict JSON contract and
//! renders whatever comes back into a clean, consistently styled `.pptx`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Select   validate type (PDF) and size (≤ 10 MiB), synchronously
//!  ├─ 2. Extract  read the file and base64-encode it            [Extracting]
//!  ├─ 3. Analyze  one AI call with prompt + JSON schema         [Analyzing]
//!  ├─ 4. Preview  topic, summary and slides are available       [Success]
//!  └─ 5. Export   title slide + content slides + notes → .pptx  [GeneratingExport]
//! ```
//!
//! The [`Orchestrator`] owns the state machine; [`convert_to_pptx`] runs all
//! five steps for one document.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2slides::{convert_to_pptx, SlidesConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SlidesConfig::builder()
//!         .api_key(std::env::var("GEMINI_API_KEY")?)
//!         .output_dir("decks")
//!         .build()?;
//!     let output = convert_to_pptx("report.pdf", &config).await?;
//!     println!("{} → {}", output.presentation.topic, output.file.path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2slides` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2slides = { version = "0.1", default-features = false }
//! ```
//!
//! ## Choosing a Backend
//!
//! | Backend | Selected by | Structured output |
//! |---------|-------------|-------------------|
//! | Gemini (native REST) | `api_key`, or `provider_name("gemini")` | `responseSchema`, enforced by the API |
//! | edgequake-llm providers | `provider_name("openai")`, `provider(...)`, env | schema in the prompt, cleaned before parsing |
//!
//! `gemini-2.5-flash` is the default model and reads a 10 MiB PDF in one call.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod contract;
pub mod convert;
pub mod error;
pub mod orchestrator;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod preview;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BulletStyle, SlidesConfig, SlidesConfigBuilder};
pub use convert::{
    build_orchestrator, convert_from_bytes, convert_sync, convert_to_pptx, generate,
    resolve_generator,
};
pub use error::{ProcessingError, Pdf2SlidesError};
pub use orchestrator::{CycleState, Orchestrator, ProcessingStatus};
pub use output::{ConversionOutput, ConversionStats, PresentationResult, Slide};
pub use pipeline::analyze::{
    AnalysisClient, AnalysisOptions, ContentGenerator, GenerationRequest, GenerationResponse,
    PresentationAnalyzer,
};
pub use pipeline::encode::EncodedPayload;
pub use pipeline::export::{export_file_name, ExportedFile, PptxExporter, PresentationExporter};
pub use pipeline::input::FileSelection;
pub use preview::render_preview;
pub use progress::{NoopProgressCallback, ProcessingProgressCallback, ProgressCallback};
