//! File intake: describe the selected file and validate it before any I/O.
//!
//! Selection is split from reading on purpose. [`validate_selection`] is a
//! pure, synchronous check on the declared media type and size, so a bad pick
//! is rejected immediately without touching the orchestrator state.
//! [`read_document`] is the asynchronous read that only runs once a cycle has
//! started.

use crate::error::Pdf2SlidesError;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

/// Media types accepted as PDF.
const PDF_MEDIA_TYPES: &[&str] = &["application/pdf", "application/x-pdf"];

/// Where the bytes of a selected file come from.
#[derive(Clone)]
pub enum FileSource {
    /// A file on the local file system, read when the cycle starts.
    Path(PathBuf),
    /// Bytes already in memory (uploads, tests).
    Bytes(Vec<u8>),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Path(p) => f.debug_tuple("Path").field(p).finish(),
            FileSource::Bytes(b) => write!(f, "Bytes(<{} bytes>)", b.len()),
        }
    }
}

/// A file the user picked, described by its declared metadata.
#[derive(Debug, Clone)]
pub struct FileSelection {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub source: FileSource,
}

impl FileSelection {
    /// Describe a local file. The media type is inferred from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Pdf2SlidesError> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Pdf2SlidesError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Pdf2SlidesError::ReadFailed {
                name: path.display().to_string(),
                source: e,
            },
        })?;
        if !meta.is_file() {
            return Err(Pdf2SlidesError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            media_type: media_type_for_path(path).to_string(),
            name,
            size: meta.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Describe an in-memory file with a declared media type.
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Bytes(bytes),
        }
    }
}

/// The document bytes of one processing cycle.
#[derive(Clone)]
pub struct Document {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Infer a media type from a file extension.
pub fn media_type_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// True for `application/pdf` and its legacy alias, ignoring case and
/// parameters (`application/pdf; charset=binary`).
pub fn is_pdf_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    PDF_MEDIA_TYPES.contains(&essence.as_str())
}

/// Check media type and size. Type is checked first; size is checked
/// regardless of whether the type is correct.
pub fn validate_selection(file: &FileSelection, max_bytes: u64) -> Result<(), Pdf2SlidesError> {
    if !is_pdf_media_type(&file.media_type) {
        return Err(Pdf2SlidesError::InvalidFileType {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
        });
    }
    if file.size > max_bytes {
        return Err(Pdf2SlidesError::FileTooLarge {
            name: file.name.clone(),
            size: file.size,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Read the full document for a validated selection.
///
/// The declared size is only a hint: the file may have changed since it was
/// selected. At most `max_bytes + 1` bytes are read, and a document over the
/// limit is [`Pdf2SlidesError::FileTooLarge`].
pub async fn read_document(
    file: FileSelection,
    max_bytes: u64,
) -> Result<Document, Pdf2SlidesError> {
    let read_failed = |e: std::io::Error| Pdf2SlidesError::ReadFailed {
        name: file.name.clone(),
        source: e,
    };

    let (bytes, size) = match file.source {
        FileSource::Path(path) => {
            let handle = tokio::fs::File::open(&path).await.map_err(read_failed)?;
            let on_disk = handle.metadata().await.map(|m| m.len()).ok();
            let mut bytes = Vec::new();
            handle
                .take(max_bytes.saturating_add(1))
                .read_to_end(&mut bytes)
                .await
                .map_err(read_failed)?;
            let size = on_disk.unwrap_or(0).max(bytes.len() as u64);
            (bytes, size)
        }
        FileSource::Bytes(bytes) => {
            let size = bytes.len() as u64;
            (bytes, size)
        }
    };

    if bytes.len() as u64 > max_bytes {
        warn!(
            "'{}' grew to {} bytes after selection (declared {})",
            file.name, size, file.size
        );
        return Err(Pdf2SlidesError::FileTooLarge {
            name: file.name,
            size,
            limit: max_bytes,
        });
    }

    if !bytes.starts_with(b"%PDF") {
        warn!(
            "'{}' is declared as {} but does not start with %PDF",
            file.name, file.media_type
        );
    }
    debug!("Read '{}': {} bytes", file.name, bytes.len());

    Ok(Document {
        name: file.name,
        media_type: file.media_type,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_media_types() {
        assert!(is_pdf_media_type("application/pdf"));
        assert!(is_pdf_media_type("Application/PDF"));
        assert!(is_pdf_media_type("application/x-pdf"));
        assert!(is_pdf_media_type("application/pdf; charset=binary"));
        assert!(!is_pdf_media_type("text/plain"));
        assert!(!is_pdf_media_type(""));
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("a/b.PDF")), "application/pdf");
        assert_eq!(
            media_type_for_path(Path::new("notes.txt")),
            "application/octet-stream"
        );
        assert_eq!(
            media_type_for_path(Path::new("README")),
            "application/octet-stream"
        );
    }

    #[test]
    fn rejects_wrong_type() {
        let f = FileSelection::from_bytes("a.png", "image/png", vec![0; 10]);
        let err = validate_selection(&f, 100).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::InvalidFileType { .. }));
    }

    #[test]
    fn size_limit_is_inclusive() {
        let f = FileSelection::from_bytes("a.pdf", "application/pdf", vec![0; 100]);
        assert!(validate_selection(&f, 100).is_ok());
        let err = validate_selection(&f, 99).unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::FileTooLarge { size: 100, .. }));
    }

    #[test]
    fn from_path_missing_file() {
        let err = FileSelection::from_path("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::FileNotFound { .. }));
    }

    #[test]
    fn from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        std::fs::write(&path, b"%PDF-1.7 body").unwrap();
        let f = FileSelection::from_path(&path).unwrap();
        assert_eq!(f.name, "deck.pdf");
        assert_eq!(f.media_type, "application/pdf");
        assert_eq!(f.size, 13);
    }

    #[tokio::test]
    async fn read_document_from_bytes_and_path() {
        let f = FileSelection::from_bytes("a.pdf", "application/pdf", b"%PDF-1.4".to_vec());
        let doc = read_document(f, 100).await.unwrap();
        assert_eq!(doc.size(), 8);

        let missing = FileSelection {
            name: "gone.pdf".into(),
            media_type: "application/pdf".into(),
            size: 1,
            source: FileSource::Path(PathBuf::from("/definitely/not/gone.pdf")),
        };
        let err = read_document(missing, 100).await.unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::ReadFailed { .. }));
    }

    #[tokio::test]
    async fn read_document_enforces_limit_on_actual_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grows.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();
        let f = FileSelection::from_path(&path).unwrap();
        assert_eq!(f.size, 8);
        std::fs::write(&path, vec![b'%'; 4096]).unwrap();

        let err = read_document(f, 1024).await.unwrap_err();
        match err {
            Pdf2SlidesError::FileTooLarge { size, limit, .. } => {
                assert_eq!(size, 4096);
                assert_eq!(limit, 1024);
            }
            other => panic!("expected FileTooLarge, got {other:?}"),
        }

        let stale = FileSelection {
            size: 10,
            ..FileSelection::from_bytes("stale.pdf", "application/pdf", vec![0; 64])
        };
        let err = read_document(stale, 32).await.unwrap_err();
        assert!(matches!(err, Pdf2SlidesError::FileTooLarge { size: 64, .. }));
    }
}
