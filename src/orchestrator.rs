//! Processing orchestrator: the state machine behind one upload → analysis →
//! preview → export cycle.
//!
//! ```text
//!            select_file              encode ok             analyze ok
//!   Idle ───────────────▶ Extracting ──────────▶ Analyzing ───────────▶ Success
//!    ▲                        │                      │                   │  ▲
//!    │ reset                  └────── failure ───────┴──▶ Error          │  │ export
//!    └──────────────────────────────────────────────────────┘            ▼  │ (ok or not)
//!                                                              GeneratingExport
//! ```
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`. The busy check and the move into `Extracting` happen under a
//! single lock acquisition, so two concurrent `select_file` calls on a shared
//! orchestrator cannot both start a cycle. Progress callbacks fire after the
//! lock is released.

use crate::config::DEFAULT_MAX_FILE_BYTES;
use crate::error::{
    Pdf2SlidesError, ProcessingError, EXPORT_FAILED_MESSAGE, PROCESSING_FAILED_MESSAGE,
};
use crate::output::PresentationResult;
use crate::pipeline::analyze::PresentationAnalyzer;
use crate::pipeline::encode;
use crate::pipeline::export::{ExportedFile, PresentationExporter};
use crate::pipeline::input::{self, FileSelection};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Where the current cycle stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Extracting,
    Analyzing,
    Success,
    Error,
    /// Export in progress; layered on `Success` and always returns to it.
    GeneratingExport,
}

impl ProcessingStatus {
    /// A cycle or an export is in flight.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Extracting | Self::Analyzing | Self::GeneratingExport
        )
    }

    /// The progress overlay is shown only while the document is processed.
    pub fn shows_overlay(self) -> bool {
        matches!(self, Self::Extracting | Self::Analyzing)
    }

    pub fn can_select_file(self) -> bool {
        matches!(self, Self::Idle | Self::Success | Self::Error)
    }

    pub fn can_reset(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn can_download(self) -> bool {
        self == Self::Success
    }

    /// Overlay caption for the busy states.
    pub fn overlay_message(self) -> Option<&'static str> {
        match self {
            Self::Extracting => Some("Reading PDF"),
            Self::Analyzing => Some("AI is analyzing the document"),
            _ => None,
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Extracting => "Extracting",
            Self::Analyzing => "Analyzing",
            Self::Success => "Success",
            Self::Error => "Error",
            Self::GeneratingExport => "GeneratingExport",
        };
        f.write_str(s)
    }
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    pub status: ProcessingStatus,
    /// Name of the document of the current or last cycle.
    pub document: Option<String>,
    /// Present only in `Success` (and `GeneratingExport`).
    pub presentation: Option<Arc<PresentationResult>>,
    /// Set in `Error`, or in `Success` after a failed export.
    pub error: Option<ProcessingError>,
}

/// Drives one processing cycle at a time.
pub struct Orchestrator {
    analyzer: Arc<dyn PresentationAnalyzer>,
    exporter: Arc<dyn PresentationExporter>,
    max_file_bytes: u64,
    progress: Option<ProgressCallback>,
    state: Mutex<CycleState>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("max_file_bytes", &self.max_file_bytes)
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        analyzer: Arc<dyn PresentationAnalyzer>,
        exporter: Arc<dyn PresentationExporter>,
    ) -> Self {
        Self {
            analyzer,
            exporter,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            progress: None,
            state: Mutex::new(CycleState::default()),
        }
    }

    pub fn with_max_file_bytes(mut self, bytes: u64) -> Self {
        self.max_file_bytes = bytes;
        self
    }

    pub fn with_progress(mut self, cb: Option<ProgressCallback>) -> Self {
        self.progress = cb;
        self
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> CycleState {
        self.lock().clone()
    }

    pub fn status(&self) -> ProcessingStatus {
        self.lock().status
    }

    /// Validate `file` and run a full cycle on it.
    ///
    /// Validation failures and [`Pdf2SlidesError::Busy`] are returned without
    /// touching the state. Any later failure, including a document that turns
    /// out larger than the limit when read, moves the cycle to `Error` (the
    /// stored [`ProcessingError`] carries the details) and is also returned.
    ///
    /// Dropping the returned future before it completes also ends the cycle in
    /// `Error`, so the orchestrator never stays busy.
    pub async fn select_file(
        &self,
        file: FileSelection,
    ) -> Result<Arc<PresentationResult>, Pdf2SlidesError> {
        let from = {
            let mut state = self.lock();
            if state.status.is_busy() {
                return Err(Pdf2SlidesError::Busy {
                    status: state.status,
                });
            }
            input::validate_selection(&file, self.max_file_bytes)?;

            let from = state.status;
            *state = CycleState {
                status: ProcessingStatus::Extracting,
                document: Some(file.name.clone()),
                presentation: None,
                error: None,
            };
            from
        };
        self.notify(from, ProcessingStatus::Extracting);
        info!("Processing '{}' ({} bytes)", file.name, file.size);

        let guard = InFlight::arm(self, Stage::Cycle);
        let outcome = self.run_cycle(file).await;
        guard.disarm();

        match outcome {
            Ok(presentation) => {
                let presentation = Arc::new(presentation);
                let stored = Arc::clone(&presentation);
                self.transition(ProcessingStatus::Success, move |s| {
                    s.presentation = Some(stored);
                });
                Ok(presentation)
            }
            Err(e) => {
                warn!("Processing failed: {}", e);
                let record = ProcessingError::pipeline(&e);
                let stored = record.clone();
                self.transition(ProcessingStatus::Error, move |s| {
                    s.presentation = None;
                    s.error = Some(stored);
                });
                if let Some(ref cb) = self.progress {
                    cb.on_error(&record);
                }
                Err(e)
            }
        }
    }

    async fn run_cycle(&self, file: FileSelection) -> Result<PresentationResult, Pdf2SlidesError> {
        let (doc, payload) = encode::encode(file, self.max_file_bytes).await?;
        debug!("Encoded '{}' into {} base64 bytes", doc.name, payload.len());
        drop(doc);

        self.transition(ProcessingStatus::Analyzing, |_| {});
        self.analyzer.analyze(&payload).await
    }

    /// Export the current presentation. Legal only in `Success`.
    ///
    /// The status always returns to `Success`, also when the future is
    /// dropped mid-export. On failure the stored error is set to
    /// "Failed to generate PPT file." and the presentation is kept.
    pub async fn export(&self) -> Result<ExportedFile, Pdf2SlidesError> {
        let presentation = {
            let mut state = self.lock();
            match (state.status, state.presentation.clone()) {
                (ProcessingStatus::Success, Some(p)) => {
                    state.status = ProcessingStatus::GeneratingExport;
                    state.error = None;
                    p
                }
                (status, _) if status.is_busy() => {
                    return Err(Pdf2SlidesError::Busy { status });
                }
                (status, _) => {
                    return Err(Pdf2SlidesError::InvalidState {
                        action: "export",
                        status,
                    });
                }
            }
        };
        self.notify(ProcessingStatus::Success, ProcessingStatus::GeneratingExport);

        let guard = InFlight::arm(self, Stage::Export);
        let outcome = self.exporter.export(&presentation).await;
        guard.disarm();

        match outcome {
            Ok(file) => {
                self.transition(ProcessingStatus::Success, |_| {});
                if let Some(ref cb) = self.progress {
                    cb.on_export_complete(&file);
                }
                Ok(file)
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                let record = ProcessingError::export(&e);
                let stored = record.clone();
                self.transition(ProcessingStatus::Success, move |s| {
                    s.error = Some(stored);
                });
                if let Some(ref cb) = self.progress {
                    cb.on_error(&record);
                }
                Err(e)
            }
        }
    }

    /// Return to `Idle`, discarding the result and any error.
    ///
    /// A no-op in `Idle`; rejected with [`Pdf2SlidesError::Busy`] while a
    /// cycle or export is running.
    pub fn reset(&self) -> Result<(), Pdf2SlidesError> {
        let from = {
            let mut state = self.lock();
            if state.status.is_busy() {
                return Err(Pdf2SlidesError::Busy {
                    status: state.status,
                });
            }
            let from = state.status;
            *state = CycleState::default();
            from
        };
        if from != ProcessingStatus::Idle {
            self.notify(from, ProcessingStatus::Idle);
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, CycleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, to: ProcessingStatus, update: impl FnOnce(&mut CycleState)) {
        let from = {
            let mut state = self.lock();
            let from = state.status;
            state.status = to;
            update(&mut state);
            from
        };
        self.notify(from, to);
    }

    fn notify(&self, from: ProcessingStatus, to: ProcessingStatus) {
        debug!("Status {} → {}", from, to);
        if let Some(ref cb) = self.progress {
            cb.on_status_change(from, to);
        }
    }

    /// Settle a cycle or export whose future was dropped before completing.
    fn abandon(&self, stage: Stage) {
        let (to, record) = match stage {
            Stage::Cycle => (
                ProcessingStatus::Error,
                ProcessingError {
                    message: PROCESSING_FAILED_MESSAGE.to_string(),
                    details: Some(CANCELLED_DETAILS.to_string()),
                },
            ),
            Stage::Export => (
                ProcessingStatus::Success,
                ProcessingError {
                    message: EXPORT_FAILED_MESSAGE.to_string(),
                    details: Some(CANCELLED_DETAILS.to_string()),
                },
            ),
        };
        let from = {
            let mut state = self.lock();
            let from = state.status;
            if !from.is_busy() {
                return;
            }
            state.status = to;
            if stage == Stage::Cycle {
                state.presentation = None;
            }
            state.error = Some(record.clone());
            from
        };
        warn!("{:?} dropped while {}; status → {}", stage, from, to);
        self.notify(from, to);
        if let Some(ref cb) = self.progress {
            cb.on_error(&record);
        }
    }
}

/// Details stored when an in-flight future is dropped.
const CANCELLED_DETAILS: &str = "The operation was cancelled before it completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Cycle,
    Export,
}

/// Armed while a cycle or export is awaiting; settles the state on drop.
struct InFlight<'a> {
    orchestrator: &'a Orchestrator,
    stage: Stage,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn arm(orchestrator: &'a Orchestrator, stage: Stage) -> Self {
        Self {
            orchestrator,
            stage,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.orchestrator.abandon(self.stage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_states() {
        use ProcessingStatus::*;
        for s in [Extracting, Analyzing, GeneratingExport] {
            assert!(s.is_busy(), "{s}");
            assert!(!s.can_select_file(), "{s}");
            assert!(!s.can_reset(), "{s}");
        }
        for s in [Idle, Success, Error] {
            assert!(!s.is_busy(), "{s}");
            assert!(s.can_select_file(), "{s}");
        }
    }

    #[test]
    fn overlay_only_while_processing() {
        use ProcessingStatus::*;
        assert!(Extracting.shows_overlay());
        assert!(Analyzing.shows_overlay());
        for s in [Idle, Success, Error, GeneratingExport] {
            assert!(!s.shows_overlay(), "{s}");
            assert!(s.overlay_message().is_none());
        }
    }

    #[test]
    fn download_and_reset_visibility() {
        use ProcessingStatus::*;
        assert!(Success.can_download());
        assert!(!Error.can_download());
        assert!(!Idle.can_download());
        assert!(Success.can_reset());
        assert!(Error.can_reset());
        assert!(!Idle.can_reset());
    }

    #[test]
    fn status_serialises_by_name() {
        let json = serde_json::to_string(&ProcessingStatus::GeneratingExport).unwrap();
        assert_eq!(json, "\"GeneratingExport\"");
        assert_eq!(ProcessingStatus::default(), ProcessingStatus::Idle);
    }
}
