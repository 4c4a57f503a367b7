//! Package-level parts: content types, relationships, masters, theme, props.
//!
//! Only the parts a minimal PresentationML package needs are emitted. Every
//! content slide uses the single blank layout; all styling lives on the
//! slides themselves.

use super::xml::escape_text;
use super::{NS_A, NS_P, NS_R, SLIDE_CX, SLIDE_CY};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

pub(crate) const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXT_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub(crate) const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub(crate) const REL_NOTES_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesMaster";
pub(crate) const REL_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
pub(crate) const REL_NOTES_SLIDE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_NOTES_SLIDE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";

/// First relationship id used for slides in `presentation.xml.rels`.
/// rId1..rId6 are taken by the master, theme, props and notes master.
pub(crate) const FIRST_SLIDE_RID: usize = 7;

/// Slide ids in `sldIdLst` start here (values below 256 are reserved).
const FIRST_SLIDE_ID: usize = 256;

/// One `<Relationship>` entry.
pub(crate) struct Rel<'a> {
    pub id: String,
    pub kind: &'a str,
    pub target: String,
}

impl<'a> Rel<'a> {
    pub fn new(id: usize, kind: &'a str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{id}"),
            kind,
            target: target.into(),
        }
    }
}

/// Serialise a relationships part.
pub(crate) fn relationships(rels: &[Rel<'_>]) -> String {
    let mut out = String::with_capacity(256 + rels.len() * 160);
    out.push_str(XML_DECL);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.kind,
            escape_text(&rel.target)
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// `[Content_Types].xml` for `slides` slides, of which `notes` carry notes.
pub(crate) fn content_types(slides: usize, notes: usize) -> String {
    let mut out = String::with_capacity(2048 + slides * 300);
    out.push_str(XML_DECL);
    out.push_str(concat!(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
        r#"<Default Extension="xml" ContentType="application/xml"/>"#,
        r#"<Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>"#,
        r#"<Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>"#,
        r#"<Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>"#,
        r#"<Override PartName="/ppt/notesMasters/notesMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml"/>"#,
        r#"<Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
        r#"<Override PartName="/ppt/theme/theme2.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>"#,
        r#"<Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>"#,
        r#"<Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>"#,
        r#"<Override PartName="/ppt/tableStyles.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml"/>"#,
        r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
        r#"<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
    ));
    for n in 1..=slides {
        out.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{CT_SLIDE}"/>"#
        ));
    }
    for n in 1..=notes {
        out.push_str(&format!(
            r#"<Override PartName="/ppt/notesSlides/notesSlide{n}.xml" ContentType="{CT_NOTES_SLIDE}"/>"#
        ));
    }
    out.push_str("</Types>");
    out
}

/// `_rels/.rels`
pub(crate) fn package_rels() -> String {
    relationships(&[
        Rel::new(1, REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        Rel::new(2, REL_CORE_PROPS, "docProps/core.xml"),
        Rel::new(3, REL_EXT_PROPS, "docProps/app.xml"),
    ])
}

/// `docProps/core.xml`: deck title and subject.
pub(crate) fn core_props(title: &str, subject: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title><dc:subject>{subject}</dc:subject>",
            "<dc:creator>{app}</dc:creator><cp:lastModifiedBy>{app}</cp:lastModifiedBy>",
            "<cp:revision>1</cp:revision></cp:coreProperties>"
        ),
        decl = XML_DECL,
        title = escape_text(title),
        subject = escape_text(subject),
        app = env!("CARGO_PKG_NAME"),
    )
}

/// `docProps/app.xml`
pub(crate) fn app_props(slides: usize, notes: usize) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<Application>{app}</Application>",
            "<PresentationFormat>On-screen Show (16:9)</PresentationFormat>",
            "<Slides>{slides}</Slides><Notes>{notes}</Notes>",
            "<AppVersion>{version}</AppVersion></Properties>"
        ),
        decl = XML_DECL,
        app = env!("CARGO_PKG_NAME"),
        slides = slides,
        notes = notes,
        version = app_version(),
    )
}

/// `AppVersion` must look like `XX.YYYY`.
fn app_version() -> String {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    format!("{major:02}.{minor:04}")
}

/// `ppt/presentation.xml` listing `slides` slides.
pub(crate) fn presentation(slides: usize) -> String {
    let mut ids = String::new();
    for i in 0..slides {
        ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            FIRST_SLIDE_ID + i,
            FIRST_SLIDE_RID + i
        ));
    }
    format!(
        concat!(
            "{decl}",
            r#"<p:presentation xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" saveSubsetFonts="1">"#,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
            r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId6"/></p:notesMasterIdLst>"#,
            "<p:sldIdLst>{ids}</p:sldIdLst>",
            r#"<p:sldSz cx="{cx}" cy="{cy}" type="screen16x9"/>"#,
            r#"<p:notesSz cx="6858000" cy="9144000"/>"#,
            "</p:presentation>"
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        ids = ids,
        cx = SLIDE_CX,
        cy = SLIDE_CY,
    )
}

/// `ppt/_rels/presentation.xml.rels`
pub(crate) fn presentation_rels(slides: usize) -> String {
    let mut rels = vec![
        Rel::new(1, REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        Rel::new(2, REL_THEME, "theme/theme1.xml"),
        Rel::new(3, REL_PRES_PROPS, "presProps.xml"),
        Rel::new(4, REL_VIEW_PROPS, "viewProps.xml"),
        Rel::new(5, REL_TABLE_STYLES, "tableStyles.xml"),
        Rel::new(6, REL_NOTES_MASTER, "notesMasters/notesMaster1.xml"),
    ];
    for i in 0..slides {
        rels.push(Rel::new(
            FIRST_SLIDE_RID + i,
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        ));
    }
    relationships(&rels)
}

/// Empty group-shape tree header shared by every slide-like part.
pub(crate) const SP_TREE_HEADER: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

const CLR_MAP: &str = concat!(
    r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
    r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
    r#"hlink="hlink" folHlink="folHlink"/>"#
);

const BG_REF: &str = r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#;

/// `ppt/slideMasters/slideMaster1.xml`
pub(crate) fn slide_master() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            "<p:cSld>{bg}<p:spTree>{tree}</p:spTree></p:cSld>",
            "{clr}",
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            "<p:txStyles>",
            r#"<p:titleStyle><a:lvl1pPr><a:defRPr sz="4400"/></a:lvl1pPr></p:titleStyle>"#,
            r#"<p:bodyStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:bodyStyle>"#,
            r#"<p:otherStyle><a:lvl1pPr><a:defRPr sz="1800"/></a:lvl1pPr></p:otherStyle>"#,
            "</p:txStyles></p:sldMaster>"
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = BG_REF,
        tree = SP_TREE_HEADER,
        clr = CLR_MAP,
    )
}

pub(crate) fn slide_master_rels() -> String {
    relationships(&[
        Rel::new(1, REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
        Rel::new(2, REL_THEME, "../theme/theme1.xml"),
    ])
}

/// `ppt/slideLayouts/slideLayout1.xml`: the blank layout.
pub(crate) fn slide_layout() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{tree}</p:spTree></p:cSld>"#,
            "<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        tree = SP_TREE_HEADER,
    )
}

pub(crate) fn slide_layout_rels() -> String {
    relationships(&[Rel::new(
        1,
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    )])
}

/// `ppt/notesMasters/notesMaster1.xml`
pub(crate) fn notes_master() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:notesMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            "<p:cSld>{bg}<p:spTree>{tree}</p:spTree></p:cSld>",
            "{clr}</p:notesMaster>"
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        bg = BG_REF,
        tree = SP_TREE_HEADER,
        clr = CLR_MAP,
    )
}

pub(crate) fn notes_master_rels() -> String {
    relationships(&[Rel::new(1, REL_THEME, "../theme/theme2.xml")])
}

/// A complete but minimal theme. Accent colours follow the deck palette.
pub(crate) fn theme(name: &str) -> String {
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = |w: u32| format!(r#"<a:ln w="{w}">{fill}</a:ln>"#);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    let font = r#"<a:latin typeface="Arial"/><a:ea typeface=""/><a:cs typeface=""/>"#;

    format!(
        concat!(
            "{decl}",
            r#"<a:theme xmlns:a="{a}" name="{name}"><a:themeElements>"#,
            r#"<a:clrScheme name="{name}">"#,
            r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#,
            r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#,
            r#"<a:dk2><a:srgbClr val="1F2937"/></a:dk2>"#,
            r#"<a:lt2><a:srgbClr val="F3F4F6"/></a:lt2>"#,
            r#"<a:accent1><a:srgbClr val="4F46E5"/></a:accent1>"#,
            r#"<a:accent2><a:srgbClr val="6366F1"/></a:accent2>"#,
            r#"<a:accent3><a:srgbClr val="818CF8"/></a:accent3>"#,
            r#"<a:accent4><a:srgbClr val="374151"/></a:accent4>"#,
            r#"<a:accent5><a:srgbClr val="10B981"/></a:accent5>"#,
            r#"<a:accent6><a:srgbClr val="F59E0B"/></a:accent6>"#,
            r#"<a:hlink><a:srgbClr val="2563EB"/></a:hlink>"#,
            r#"<a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink>"#,
            "</a:clrScheme>",
            r#"<a:fontScheme name="{name}"><a:majorFont>{font}</a:majorFont><a:minorFont>{font}</a:minorFont></a:fontScheme>"#,
            r#"<a:fmtScheme name="{name}">"#,
            "<a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst>",
            "<a:lnStyleLst>{ln1}{ln2}{ln3}</a:lnStyleLst>",
            "<a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst>",
            "<a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst>",
            "</a:fmtScheme></a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>"
        ),
        decl = XML_DECL,
        a = NS_A,
        name = name,
        font = font,
        fill = fill,
        ln1 = line(6350),
        ln2 = line(12700),
        ln3 = line(19050),
        effect = effect,
    )
}

pub(crate) fn pres_props() -> String {
    format!(
        r#"{XML_DECL}<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#
    )
}

pub(crate) fn view_props() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:viewPr xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
    )
}

pub(crate) fn table_styles() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

pub(crate) fn xml_decl() -> &'static str {
    XML_DECL
}
