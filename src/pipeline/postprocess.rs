//! Response cleanup: make model output parseable without changing its content.
//!
//! Gemini with `responseMimeType: application/json` returns bare JSON. Other
//! providers, prompted for JSON only, still occasionally:
//!
//! - wrap the object in ```` ```json … ``` ```` fences;
//! - prefix it with a sentence ("Here is the presentation:");
//! - emit a BOM or zero-width characters before the opening brace.
//!
//! These rules are cheap and deterministic and run before `serde_json`.
//! They only remove framing; the JSON text itself is passed through untouched.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to the raw model text.
///
/// Rules (applied in order):
/// 1. Strip invisible Unicode (BOM, zero-width spaces, word joiners)
/// 2. Strip outer code fences (with or without a `json` tag)
/// 3. Cut surrounding prose down to the outermost `{ … }`
pub fn clean_json_response(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = strip_code_fences(&s);
    extract_json_object(&s).to_string()
}

// ── Rule 1: Remove invisible Unicode ─────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        ['\u{200B}', '\u{FEFF}', '\u{200C}', '\u{200D}', '\u{2060}'],
        "",
    )
}

// ── Rule 2: Strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n?```\s*$").unwrap());

fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    if let Some(caps) = RE_OUTER_FENCES.captures(trimmed) {
        caps[1].trim().to_string()
    } else {
        trimmed.to_string()
    }
}

// ── Rule 3: Extract the outermost object ─────────────────────────────────────
//
// Only applied when the text does not already start with `{`. If there is no
// brace pair the input is returned unchanged so the JSON parser reports the
// real problem.

fn extract_json_object(input: &str) -> &str {
    if input.starts_with('{') {
        return input;
    }
    match (input.find('{'), input.rfind('}')) {
        (Some(start), Some(end)) if end > start => &input[start..=end],
        _ => input,
    }
}
