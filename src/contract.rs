//! The content contract: the output shape the AI model must produce.
//!
//! The schema is data, not code. It is sent verbatim as Gemini's
//! `responseSchema` (OpenAPI-subset dialect: `OBJECT`, `STRING`, `ARRAY`) and,
//! for providers without structured output, rendered into the instruction
//! prompt by [`schema_instructions`].

use crate::prompts::JSON_ONLY_SUFFIX;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Nominal lower bound on slides requested from the model.
pub const MIN_SLIDES: usize = 5;
/// Nominal upper bound on slides requested from the model.
pub const MAX_SLIDES: usize = 12;
/// Nominal lower bound on bullets per slide.
pub const MIN_BULLETS: usize = 3;
/// Nominal upper bound on bullets per slide.
pub const MAX_BULLETS: usize = 5;

/// Media type the document is attached with.
pub const PDF_MIME_TYPE: &str = "application/pdf";

static PRESENTATION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    let slide = json!({
        "type": "OBJECT",
        "properties": {
            "title": {
                "type": "STRING",
                "description": "The headline/title of the slide."
            },
            "bullets": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "3-5 concise bullet points summarizing key information for this slide."
            },
            "speakerNotes": {
                "type": "STRING",
                "description": "Detailed speaker notes explaining the bullet points."
            }
        },
        "required": ["title", "bullets", "speakerNotes"]
    });

    json!({
        "type": "OBJECT",
        "properties": {
            "topic": {
                "type": "STRING",
                "description": "The main topic or title of the entire presentation."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief 1-sentence summary of what the document is about."
            },
            "slides": {
                "type": "ARRAY",
                "items": slide,
                "description": format!(
                    "An array of {MIN_SLIDES} to {MAX_SLIDES} slides extracted from the content."
                )
            }
        },
        "required": ["topic", "summary", "slides"]
    })
});

/// The presentation schema.
pub fn presentation_schema() -> &'static Value {
    &PRESENTATION_SCHEMA
}

/// Append `schema` to `prompt` as a JSON-only output instruction.
pub fn schema_instructions(prompt: &str, schema: &Value) -> String {
    let schema = serde_json::to_string_pretty(schema).unwrap_or_default();
    format!("{}{}", prompt, JSON_ONLY_SUFFIX.replace("{schema}", &schema))
}
