//! PowerPoint (`.pptx`) writer.
//!
//! A `.pptx` file is a ZIP archive of PresentationML parts. This module emits
//! the smallest package PowerPoint, Keynote and LibreOffice all open without
//! a repair prompt:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/{core,app}.xml
//! ppt/presentation.xml  + _rels
//! ppt/slideMasters/slideMaster1.xml  + _rels
//! ppt/slideLayouts/slideLayout1.xml  + _rels      (blank)
//! ppt/notesMasters/notesMaster1.xml  + _rels
//! ppt/theme/theme{1,2}.xml
//! ppt/{presProps,viewProps,tableStyles}.xml
//! ppt/slides/slideN.xml  + _rels                  (1 title + N content)
//! ppt/notesSlides/notesSlideK.xml  + _rels        (one per content slide)
//! ```
//!
//! Assembly is CPU-bound and synchronous; async callers run
//! [`build_deck`] on `spawn_blocking`.

mod parts;
mod slides;
mod xml;

use crate::config::BulletStyle;
use crate::error::Pdf2SlidesError;
use crate::output::PresentationResult;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Slide width in EMU (10 in).
pub const SLIDE_CX: i64 = 9_144_000;
/// Slide height in EMU (5.625 in, 16:9).
pub const SLIDE_CY: i64 = 5_143_500;

/// Rendering options for one deck.
#[derive(Debug, Clone, Default)]
pub struct DeckOptions {
    pub bullet_style: BulletStyle,
}

/// Build the complete `.pptx` package in memory.
///
/// Slide 1 is the title slide; content slide `k` becomes slide `k + 1` and
/// carries notes slide `k`.
pub fn build_deck(
    presentation: &PresentationResult,
    options: &DeckOptions,
) -> Result<Vec<u8>, Pdf2SlidesError> {
    let content = presentation.slides.len();
    let total = content + 1;

    let mut pkg = Package::new();
    pkg.add("[Content_Types].xml", parts::content_types(total, content))?;
    pkg.add("_rels/.rels", parts::package_rels())?;
    pkg.add(
        "docProps/core.xml",
        parts::core_props(&presentation.topic, &presentation.summary),
    )?;
    pkg.add("docProps/app.xml", parts::app_props(total, content))?;

    pkg.add("ppt/presentation.xml", parts::presentation(total))?;
    pkg.add(
        "ppt/_rels/presentation.xml.rels",
        parts::presentation_rels(total),
    )?;
    pkg.add("ppt/slideMasters/slideMaster1.xml", parts::slide_master())?;
    pkg.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        parts::slide_master_rels(),
    )?;
    pkg.add("ppt/slideLayouts/slideLayout1.xml", parts::slide_layout())?;
    pkg.add(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        parts::slide_layout_rels(),
    )?;
    pkg.add("ppt/notesMasters/notesMaster1.xml", parts::notes_master())?;
    pkg.add(
        "ppt/notesMasters/_rels/notesMaster1.xml.rels",
        parts::notes_master_rels(),
    )?;
    pkg.add("ppt/theme/theme1.xml", parts::theme("Slides"))?;
    pkg.add("ppt/theme/theme2.xml", parts::theme("Notes"))?;
    pkg.add("ppt/presProps.xml", parts::pres_props())?;
    pkg.add("ppt/viewProps.xml", parts::view_props())?;
    pkg.add("ppt/tableStyles.xml", parts::table_styles())?;

    pkg.add("ppt/slides/slide1.xml", slides::title_slide(presentation))?;
    pkg.add("ppt/slides/_rels/slide1.xml.rels", slides::slide_rels(None))?;

    for (i, slide) in presentation.slides.iter().enumerate() {
        let k = i + 1;
        let number = k + 1;
        pkg.add(
            &format!("ppt/slides/slide{number}.xml"),
            slides::content_slide(slide, number, options),
        )?;
        pkg.add(
            &format!("ppt/slides/_rels/slide{number}.xml.rels"),
            slides::slide_rels(Some(k)),
        )?;
        pkg.add(
            &format!("ppt/notesSlides/notesSlide{k}.xml"),
            slides::notes_slide(&slide.speaker_notes),
        )?;
        pkg.add(
            &format!("ppt/notesSlides/_rels/notesSlide{k}.xml.rels"),
            slides::notes_slide_rels(number),
        )?;
    }

    let bytes = pkg.finish()?;
    debug!("Built deck: {} slides, {} bytes", total, bytes.len());
    Ok(bytes)
}

/// Thin wrapper over the ZIP writer that maps every failure to
/// [`Pdf2SlidesError::ExportFailed`].
struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: FileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    fn add(&mut self, name: &str, content: String) -> Result<(), Pdf2SlidesError> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| export_failed(name, e))?;
        self.zip
            .write_all(content.as_bytes())
            .map_err(|e| export_failed(name, e))
    }

    fn finish(mut self) -> Result<Vec<u8>, Pdf2SlidesError> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| export_failed("central directory", e))?;
        Ok(cursor.into_inner())
    }
}

fn export_failed(part: &str, err: impl std::fmt::Display) -> Pdf2SlidesError {
    Pdf2SlidesError::ExportFailed {
        detail: format!("{part}: {err}"),
    }
}
