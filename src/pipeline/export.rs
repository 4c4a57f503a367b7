//! Export: PresentationResult → `.pptx` file on disk.
//!
//! The deck is assembled in memory by [`crate::pptx::build_deck`] on a
//! blocking thread, then written atomically (temp file + rename) so a failed
//! or interrupted export never leaves a truncated presentation behind.

use crate::config::{BulletStyle, SlidesConfig};
use crate::error::Pdf2SlidesError;
use crate::output::PresentationResult;
use crate::pptx::{self, DeckOptions};
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Suffix appended to every exported file name.
pub const FILE_NAME_SUFFIX: &str = "_Presentation.pptx";

/// Longest file-name stem taken from the topic, in characters.
pub const MAX_STEM_CHARS: usize = 20;

/// A presentation file written by an exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes_written: u64,
    /// Slides in the file, title slide included.
    pub slide_count: usize,
}

/// The export capability the orchestrator depends on.
#[async_trait]
pub trait PresentationExporter: Send + Sync {
    async fn export(
        &self,
        presentation: &PresentationResult,
    ) -> Result<ExportedFile, Pdf2SlidesError>;
}

/// Derive the output file name from the topic.
///
/// Keeps ASCII letters and digits only, truncates to 20 characters and
/// appends `_Presentation.pptx`. An empty or fully stripped topic yields
/// `_Presentation.pptx`.
pub fn export_file_name(topic: &str) -> String {
    let stem: String = topic
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_STEM_CHARS)
        .collect();
    format!("{stem}{FILE_NAME_SUFFIX}")
}

/// Writes `.pptx` files into a directory.
#[derive(Debug, Clone)]
pub struct PptxExporter {
    output_dir: PathBuf,
    options: DeckOptions,
}

impl PptxExporter {
    pub fn new(output_dir: impl Into<PathBuf>, bullet_style: BulletStyle) -> Self {
        Self {
            output_dir: output_dir.into(),
            options: DeckOptions { bullet_style },
        }
    }

    pub fn from_config(config: &SlidesConfig) -> Self {
        Self::new(config.output_dir.clone(), config.bullet_style)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl PresentationExporter for PptxExporter {
    async fn export(
        &self,
        presentation: &PresentationResult,
    ) -> Result<ExportedFile, Pdf2SlidesError> {
        let file_name = export_file_name(&presentation.topic);
        let path = self.output_dir.join(&file_name);
        let slide_count = presentation.slides.len() + 1;

        let deck = Arc::new(presentation.clone());
        let options = self.options.clone();
        let bytes = tokio::task::spawn_blocking(move || pptx::build_deck(&deck, &options))
            .await
            .map_err(|e| Pdf2SlidesError::ExportFailed {
                detail: format!("deck assembly task failed: {e}"),
            })??;
        debug!("Deck for '{}' is {} bytes", presentation.topic, bytes.len());

        write_atomic(&path, &bytes).await?;
        info!("Wrote {} ({} slides)", path.display(), slide_count);

        Ok(ExportedFile {
            path,
            file_name,
            bytes_written: bytes.len() as u64,
            slide_count,
        })
    }
}

/// Write to `<path>.tmp` then rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Pdf2SlidesError> {
    let write_err = |e| Pdf2SlidesError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pptx.tmp");
    tokio::fs::write(&tmp_path, bytes)
        .await
        .map_err(write_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Slide;

    fn sample(topic: &str) -> PresentationResult {
        PresentationResult {
            topic: topic.into(),
            summary: "s".into(),
            slides: vec![Slide {
                title: "One".into(),
                bullets: vec!["a".into()],
                speaker_notes: String::new(),
            }],
        }
    }

    #[test]
    fn file_name_strips_non_alphanumerics() {
        assert_eq!(
            export_file_name("Q3 Report: Growth & Risks!"),
            "Q3ReportGrowthRisks_Presentation.pptx"
        );
    }

    #[test]
    fn file_name_for_empty_topic() {
        assert_eq!(export_file_name(""), "_Presentation.pptx");
        assert_eq!(export_file_name("¿¡ — !?"), "_Presentation.pptx");
    }

    #[test]
    fn file_name_truncates_to_twenty_chars() {
        let name = export_file_name("The Quick Brown Fox Jumps Over The Lazy Dog");
        assert_eq!(name, "TheQuickBrownFoxJump_Presentation.pptx");
    }

    #[test]
    fn file_name_drops_non_ascii_letters() {
        assert_eq!(export_file_name("Café Zürich 2024"), "CafZrich2024_Presentation.pptx");
    }

    #[tokio::test]
    async fn export_writes_file_into_created_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("decks");
        let exporter = PptxExporter::new(&out, BulletStyle::Round);

        let file = exporter.export(&sample("Solar Power")).await.unwrap();
        assert_eq!(file.file_name, "SolarPower_Presentation.pptx");
        assert_eq!(file.slide_count, 2);
        assert!(file.path.exists());
        assert!(!out.join("SolarPower_Presentation.pptx.tmp").exists());

        let on_disk = std::fs::metadata(&file.path).unwrap().len();
        assert_eq!(on_disk, file.bytes_written);
        let bytes = std::fs::read(&file.path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn export_into_a_file_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let exporter = PptxExporter::new(&blocker, BulletStyle::Round);
        let err = exporter.export(&sample("x")).await.unwrap_err();
        assert!(err.is_export(), "got {err:?}");
    }
}
