//! Progress-callback trait for processing-cycle events.
//!
//! Inject an [`Arc<dyn ProcessingProgressCallback>`] via
//! [`crate::config::SlidesConfigBuilder::progress_callback`] to observe every
//! status transition of the [`crate::orchestrator::Orchestrator`] as it
//! happens: drive a spinner, push to a WebSocket, or record metrics, without
//! the library knowing how the host application communicates.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2slides::{ProcessingProgressCallback, ProcessingStatus, SlidesConfig};
//! use std::sync::{Arc, Mutex};
//!
//! #[derive(Default)]
//! struct Recorder {
//!     seen: Mutex<Vec<ProcessingStatus>>,
//! }
//!
//! impl ProcessingProgressCallback for Recorder {
//!     fn on_status_change(&self, _from: ProcessingStatus, to: ProcessingStatus) {
//!         self.seen.lock().unwrap().push(to);
//!     }
//! }
//!
//! let config = SlidesConfig::builder()
//!     .progress_callback(Arc::new(Recorder::default()))
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ProcessingError;
use crate::orchestrator::ProcessingStatus;
use crate::pipeline::export::ExportedFile;
use std::sync::Arc;

/// Called by the orchestrator as a processing cycle advances.
///
/// Implementations must be `Send + Sync`: the orchestrator may be shared
/// across tasks. All methods default to no-ops. Callbacks run after the state
/// lock is released, so they may call back into the orchestrator.
pub trait ProcessingProgressCallback: Send + Sync {
    /// Called on every status transition, including `GeneratingExport`.
    fn on_status_change(&self, from: ProcessingStatus, to: ProcessingStatus) {
        let _ = (from, to);
    }

    /// Called before each AI request.
    ///
    /// # Arguments
    /// * `attempt`: 1-indexed attempt number
    /// * `max_attempts`: `max_retries + 1`
    fn on_analysis_attempt(&self, attempt: u32, max_attempts: u32) {
        let _ = (attempt, max_attempts);
    }

    /// Called when a cycle or an export fails.
    fn on_error(&self, error: &ProcessingError) {
        let _ = error;
    }

    /// Called after the deck has been written.
    fn on_export_complete(&self, file: &ExportedFile) {
        let _ = file;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ProcessingProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SlidesConfig`].
pub type ProgressCallback = Arc<dyn ProcessingProgressCallback>;
