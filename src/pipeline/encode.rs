//! Binary encoding: document bytes → base64 payload for the AI request body.
//!
//! Multimodal APIs accept attachments as base64 text embedded in JSON. The
//! payload carries the raw base64 only; a browser-style `data:…;base64,`
//! prefix is stripped because Gemini and the edgequake-llm providers add
//! their own framing around the data.

use crate::contract::PDF_MIME_TYPE;
use crate::error::Pdf2SlidesError;
use crate::pipeline::input::{self, Document, FileSelection};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use tracing::debug;

/// Base64 text of one document, tagged with its attachment media type.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    data: String,
    mime_type: &'static str,
}

impl EncodedPayload {
    /// Accept a data URL (`data:application/pdf;base64,JVBERi0…`) or bare base64.
    ///
    /// Everything up to and including the first `,` is treated as transport
    /// prefix when the string starts with `data:`.
    pub fn from_data_url(s: &str) -> Self {
        Self {
            data: strip_transport_prefix(s).to_string(),
            mime_type: PDF_MIME_TYPE,
        }
    }

    /// The base64 text.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Media type the payload is attached with.
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedPayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Remove a `data:<type>;base64,` prefix if present.
pub fn strip_transport_prefix(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with("data:") {
        match s.split_once(',') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        s
    }
}

/// Encode in-memory bytes.
pub fn encode_bytes(bytes: &[u8]) -> EncodedPayload {
    let data = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), data.len());
    EncodedPayload {
        data,
        mime_type: PDF_MIME_TYPE,
    }
}

/// Encode a document that has already been read.
pub fn encode_document(doc: &Document) -> EncodedPayload {
    encode_bytes(&doc.bytes)
}

/// Read the selected file completely and encode it.
///
/// Read failures surface as [`Pdf2SlidesError::ReadFailed`] and are not retried;
/// a document over `max_bytes` is [`Pdf2SlidesError::FileTooLarge`].
pub async fn encode(
    file: FileSelection,
    max_bytes: u64,
) -> Result<(Document, EncodedPayload), Pdf2SlidesError> {
    let doc = input::read_document(file, max_bytes).await?;
    let payload = encode_document(&doc);
    Ok((doc, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_small_document() {
        let payload = encode_bytes(b"%PDF-1.4");
        assert_eq!(payload.mime_type(), "application/pdf");
        assert_eq!(payload.as_str(), "JVBERi0xLjQ=");
        let decoded = STANDARD.decode(payload.as_str()).expect("valid base64");
        assert_eq!(decoded, b"%PDF-1.4");
    }

    #[test]
    fn strips_data_url_prefix() {
        let p = EncodedPayload::from_data_url("data:application/pdf;base64,JVBERi0xLjQ=");
        assert_eq!(p.as_str(), "JVBERi0xLjQ=");
        assert_eq!(strip_transport_prefix("JVBERi0xLjQ="), "JVBERi0xLjQ=");
        assert_eq!(strip_transport_prefix("data:application/pdf;base64"), "");
    }

    #[test]
    fn debug_does_not_dump_payload() {
        let p = encode_bytes(&[7u8; 64]);
        let dbg = format!("{p:?}");
        assert!(!dbg.contains(p.as_str()));
    }

    #[tokio::test]
    async fn encode_reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.pdf");
        let body = vec![b'x'; 70_000];
        std::fs::write(&path, &body).unwrap();

        let sel = FileSelection::from_path(&path).unwrap();
        let (doc, payload) = encode(sel, 100_000).await.unwrap();
        assert_eq!(doc.size(), 70_000);
        assert_eq!(STANDARD.decode(payload.as_str()).unwrap(), body);
    }
}
