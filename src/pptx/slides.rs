//! Slide and notes-slide XML.
//!
//! ## Layout (16:9, 10 in × 5.625 in)
//!
//! ```text
//! title slide                      content slide
//! ┌──────────────────────────┐     ┌──────────────────────────┐
//! │      (#4F46E5 fill)      │     │▓▓ title  (#F3F4F6 band) ▓│ 0 – 1.2 in
//! │                          │     │ • bullet                 │
//! │        TOPIC 44pt        │     │ • bullet                 │ 1.5 – 5.4 in
//! │     summary 18pt ital    │     │ • bullet               n │
//! └──────────────────────────┘     └──────────────────────────┘
//! ```

use super::parts::{
    relationships, xml_decl, Rel, REL_NOTES_MASTER, REL_NOTES_SLIDE, REL_SLIDE, REL_SLIDE_LAYOUT,
    SP_TREE_HEADER,
};
use super::xml::{emu, escape_line, escape_text};
use super::{DeckOptions, NS_A, NS_P, NS_R};
use crate::config::BulletStyle;
use crate::output::{PresentationResult, Slide};

const FONT: &str = "Arial";
const TITLE_BG: &str = "4F46E5";
const TITLE_FG: &str = "FFFFFF";
const SUBTITLE_FG: &str = "E0E7FF";
const HEADER_BAND: &str = "F3F4F6";
const HEADING_FG: &str = "1F2937";
const BODY_FG: &str = "374151";
const SLIDE_NUMBER_FG: &str = "888888";

/// Hanging indent for the bullet glyph, 0.375 in.
const BULLET_INDENT: i64 = 342_900;

/// Field id PowerPoint uses to recognise a slide-number field.
const SLIDENUM_FIELD_ID: &str = "{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}";

/// A rectangle in inches.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Frame {
    const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            emu(self.x),
            emu(self.y),
            emu(self.w),
            emu(self.h)
        )
    }
}

const TOPIC_FRAME: Frame = Frame::new(0.5, 2.5, 9.0, 1.5);
const SUMMARY_FRAME: Frame = Frame::new(1.0, 4.2, 8.0, 1.0);
const HEADER_FRAME: Frame = Frame::new(0.0, 0.0, 10.0, 1.2);
const HEADING_FRAME: Frame = Frame::new(0.5, 0.1, 9.0, 1.0);
const BODY_FRAME: Frame = Frame::new(0.5, 1.5, 9.0, 3.9);
const SLIDE_NUMBER_FRAME: Frame = Frame::new(9.5, 5.175, 0.5, 0.3);

/// Character formatting of one run.
#[derive(Debug, Clone, Copy)]
struct RunStyle {
    size_pt: u32,
    color: &'static str,
    bold: bool,
    italic: bool,
}

impl RunStyle {
    fn rpr(&self) -> String {
        let mut attrs = format!(r#"lang="en-US" sz="{}""#, self.size_pt * 100);
        if self.bold {
            attrs.push_str(r#" b="1""#);
        }
        if self.italic {
            attrs.push_str(r#" i="1""#);
        }
        format!(
            r#"<a:rPr {attrs} dirty="0"><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:latin typeface="{FONT}"/><a:cs typeface="{FONT}"/></a:rPr>"#,
            self.color
        )
    }
}

fn run(text: &str, style: RunStyle) -> String {
    format!("<a:r>{}<a:t>{}</a:t></a:r>", style.rpr(), text)
}

/// Wrap shapes into a complete `<p:sld>`.
fn slide_document(background: Option<&str>, shapes: &str) -> String {
    let bg = background
        .map(|c| {
            format!(
                r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{c}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#
            )
        })
        .unwrap_or_default();
    format!(
        concat!(
            "{decl}",
            r#"<p:sld xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            "<p:cSld>{bg}<p:spTree>{tree}{shapes}</p:spTree></p:cSld>",
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"
        ),
        decl = xml_decl(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = bg,
        tree = SP_TREE_HEADER,
        shapes = shapes,
    )
}

/// A text box holding pre-built paragraphs.
fn text_box(id: u32, name: &str, frame: Frame, anchor: &str, paragraphs: &str) -> String {
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#,
            r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#,
            r#"<p:txBody><a:bodyPr wrap="square" rtlCol="0" anchor="{anchor}"><a:normAutofit/></a:bodyPr>"#,
            "<a:lstStyle/>{paragraphs}</p:txBody></p:sp>"
        ),
        id = id,
        name = name,
        xfrm = frame.xfrm(),
        anchor = anchor,
        paragraphs = paragraphs,
    )
}

fn filled_rect(id: u32, name: &str, frame: Frame, color: &str) -> String {
    format!(
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>"#,
            r#"<p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#,
            r#"<a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr></p:sp>"#
        ),
        id = id,
        name = name,
        xfrm = frame.xfrm(),
        color = color,
    )
}

/// Slide 1: topic and summary on the accent background.
pub(crate) fn title_slide(presentation: &PresentationResult) -> String {
    let topic = format!(
        r#"<a:p><a:pPr algn="ctr"/>{}</a:p>"#,
        run(
            &escape_line(&presentation.topic),
            RunStyle {
                size_pt: 44,
                color: TITLE_FG,
                bold: true,
                italic: false,
            }
        )
    );
    let summary = format!(
        r#"<a:p><a:pPr algn="ctr"/>{}</a:p>"#,
        run(
            &escape_line(&presentation.summary),
            RunStyle {
                size_pt: 18,
                color: SUBTITLE_FG,
                bold: false,
                italic: true,
            }
        )
    );

    let shapes = [
        text_box(2, "Topic", TOPIC_FRAME, "ctr", &topic),
        text_box(3, "Summary", SUMMARY_FRAME, "t", &summary),
    ]
    .concat();
    slide_document(Some(TITLE_BG), &shapes)
}

fn bullet_paragraph(text: &str, style: BulletStyle) -> String {
    let glyph = match style {
        BulletStyle::Round => format!(r#"<a:buFont typeface="{FONT}"/><a:buChar char="&#8226;"/>"#),
        BulletStyle::Numbered => {
            format!(r#"<a:buFont typeface="{FONT}"/><a:buAutoNum type="arabicPeriod"/>"#)
        }
    };
    format!(
        concat!(
            r#"<a:p><a:pPr marL="{indent}" indent="-{indent}">"#,
            r#"<a:lnSpc><a:spcPts val="2800"/></a:lnSpc><a:spcAft><a:spcPts val="1000"/></a:spcAft>"#,
            "{glyph}</a:pPr>{run}</a:p>"
        ),
        indent = BULLET_INDENT,
        glyph = glyph,
        run = run(
            &escape_line(text),
            RunStyle {
                size_pt: 18,
                color: BODY_FG,
                bold: false,
                italic: false,
            }
        ),
    )
}

fn slide_number_paragraph(number: usize) -> String {
    let style = RunStyle {
        size_pt: 10,
        color: SLIDE_NUMBER_FG,
        bold: false,
        italic: false,
    };
    format!(
        r#"<a:p><a:pPr algn="r"/><a:fld id="{SLIDENUM_FIELD_ID}" type="slidenum">{}<a:t>{number}</a:t></a:fld></a:p>"#,
        style.rpr()
    )
}

/// One content slide. `number` is the 1-based position in the deck.
pub(crate) fn content_slide(slide: &Slide, number: usize, options: &DeckOptions) -> String {
    let heading = format!(
        "<a:p>{}</a:p>",
        run(
            &escape_line(&slide.title),
            RunStyle {
                size_pt: 28,
                color: HEADING_FG,
                bold: true,
                italic: false,
            }
        )
    );

    let bullets: String = if slide.bullets.is_empty() {
        r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#.to_string()
    } else {
        slide
            .bullets
            .iter()
            .map(|b| bullet_paragraph(b, options.bullet_style))
            .collect()
    };

    let shapes = [
        filled_rect(2, "Header Band", HEADER_FRAME, HEADER_BAND),
        text_box(3, "Title", HEADING_FRAME, "ctr", &heading),
        text_box(4, "Bullets", BODY_FRAME, "t", &bullets),
        text_box(
            5,
            "Slide Number",
            SLIDE_NUMBER_FRAME,
            "ctr",
            &slide_number_paragraph(number),
        ),
    ]
    .concat();
    slide_document(None, &shapes)
}

/// Relationships of one slide part; `notes` is its notes-slide index, if any.
pub(crate) fn slide_rels(notes: Option<usize>) -> String {
    let mut rels = vec![Rel::new(
        1,
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    )];
    if let Some(n) = notes {
        rels.push(Rel::new(
            2,
            REL_NOTES_SLIDE,
            format!("../notesSlides/notesSlide{n}.xml"),
        ));
    }
    relationships(&rels)
}

/// Presenter notes: one paragraph per line of `notes`.
pub(crate) fn notes_slide(notes: &str) -> String {
    let paragraphs: String = {
        let lines: Vec<&str> = notes.lines().collect();
        if lines.is_empty() {
            r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#.to_string()
        } else {
            lines
                .iter()
                .map(|line| {
                    format!(
                        r#"<a:p><a:r><a:rPr lang="en-US" dirty="0"/><a:t>{}</a:t></a:r></a:p>"#,
                        escape_text(line)
                    )
                })
                .collect()
        }
    };

    format!(
        concat!(
            "{decl}",
            r#"<p:notes xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}"><p:cSld><p:spTree>{tree}"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="685800" y="1143000"/><a:ext cx="5486400" cy="3086100"/></a:xfrm></p:spPr></p:sp>"#,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>"#,
            r#"<p:spPr><a:xfrm><a:off x="685800" y="4400550"/><a:ext cx="5486400" cy="3600450"/></a:xfrm></p:spPr>"#,
            "<p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
            "</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>"
        ),
        decl = xml_decl(),
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = SP_TREE_HEADER,
        paragraphs = paragraphs,
    )
}

/// A notes slide points back at its slide and at the notes master.
pub(crate) fn notes_slide_rels(slide_number: usize) -> String {
    relationships(&[
        Rel::new(1, REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
        Rel::new(2, REL_SLIDE, format!("../slides/slide{slide_number}.xml")),
    ])
}
