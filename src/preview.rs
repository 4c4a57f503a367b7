//! Plain-text preview of a presentation, as shown before download.

use crate::output::PresentationResult;
use std::fmt::Write;

/// Render topic, summary, slide count and every slide with its bullets and
/// speaker notes.
pub fn render_preview(presentation: &PresentationResult) -> String {
    let mut out = String::new();
    let count = presentation.slide_count();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", presentation.topic);
    let _ = writeln!(out, "{}", "=".repeat(presentation.topic.chars().count().max(3)));
    if !presentation.summary.trim().is_empty() {
        let _ = writeln!(out, "{}", presentation.summary);
    }
    let _ = writeln!(
        out,
        "{} slide{}",
        count,
        if count == 1 { "" } else { "s" }
    );

    for (i, slide) in presentation.slides.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", i + 1, slide.title);
        for bullet in &slide.bullets {
            let _ = writeln!(out, "   • {bullet}");
        }
        if !slide.speaker_notes.trim().is_empty() {
            let _ = writeln!(out, "   Notes:");
            for line in slide.speaker_notes.lines() {
                let _ = writeln!(out, "     {line}");
            }
        }
    }
    out
}
