//! Text escaping and unit helpers for DrawingML.

use quick_xml::escape::escape;

/// English Metric Units per inch.
pub(crate) const EMU_PER_INCH: f64 = 914_400.0;

/// Inches → EMU, rounded to the nearest unit.
pub(crate) fn emu(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}

/// Escape text for element content or attribute values.
///
/// Characters XML 1.0 forbids (most C0 controls, U+FFFE, U+FFFF) are dropped
/// first. PowerPoint rejects a package containing any of them.
pub(crate) fn escape_text(s: &str) -> String {
    let clean: String = s.chars().filter(|&c| is_xml_char(c)).collect();
    escape(clean.as_str()).into_owned()
}

/// Single-line variant for titles and bullets: line breaks become spaces.
pub(crate) fn escape_line(s: &str) -> String {
    let joined = s
        .split(['\r', '\n'])
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    escape_text(joined.trim())
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}
