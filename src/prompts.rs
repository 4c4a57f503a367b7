//! Instruction prompts for PDF-to-presentation analysis.
//!
//! Every prompt lives here so the default behaviour changes in exactly one
//! place and unit tests can inspect prompts without calling a model.
//!
//! Callers can override the default via [`crate::config::SlidesConfig::system_prompt`];
//! the constants here are used only when no override is provided. The output
//! schema in [`crate::contract`] is never overridable.

/// Default instruction sent alongside the PDF attachment.
pub const DEFAULT_INSTRUCTION_PROMPT: &str = r#"You are an expert presentation designer.
Analyze the attached PDF document and create a structured presentation.

Guidelines:
1. Identify the core topic and main takeaway.
2. Create 5 to 12 slides depending on the depth of the content.
3. Make the slide titles catchy and professional.
4. Ensure bullet points are concise (under 15 words each), 3 to 5 per slide.
5. Include speaker notes for better context."#;

/// Suffix for collaborators without native structured output.
///
/// The placeholder `{schema}` is replaced with the pretty-printed JSON schema.
pub const JSON_ONLY_SUFFIX: &str = r#"

OUTPUT FORMAT
Respond with a single JSON object that conforms to this schema:

{schema}

Output ONLY the JSON object. Do NOT wrap it in ``` fences and do NOT add commentary."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_requests_slide_range() {
        assert!(DEFAULT_INSTRUCTION_PROMPT.contains("5 to 12 slides"));
        assert!(DEFAULT_INSTRUCTION_PROMPT.contains("speaker notes"));
    }

    #[test]
    fn suffix_has_schema_placeholder() {
        assert!(JSON_ONLY_SUFFIX.contains("{schema}"));
    }
}
