//! End-to-end tests for edgequake-pdf2slides.
//!
//! These tests send real PDF files from `./test_cases/` to the Gemini API.
//! They are gated behind the `E2E_ENABLED` environment variable so they do
//! not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 GEMINI_API_KEY=... cargo test --test e2e -- --nocapture

use edgequake_pdf2slides::{
    convert_to_pptx, generate, render_preview, BulletStyle, PresentationResult, SlidesConfig,
};
use std::io::Read;
use std::path::PathBuf;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

fn output_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases/output")
}

/// Skip unless E2E_ENABLED and GEMINI_API_KEY are set and the PDF exists.
/// Evaluates to `(path, api_key)`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP: set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let key = match std::env::var("GEMINI_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => {
                println!("SKIP: GEMINI_API_KEY is not set");
                return;
            }
        };
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP: test file not found: {}", p.display());
            return;
        }
        (p, key)
    }};
}

/// Structural checks every AI-designed deck should pass.
fn assert_deck_quality(deck: &PresentationResult, context: &str) {
    assert!(!deck.topic.trim().is_empty(), "[{context}] empty topic");
    assert!(!deck.summary.trim().is_empty(), "[{context}] empty summary");
    assert!(
        (3..=15).contains(&deck.slides.len()),
        "[{context}] unexpected slide count {}",
        deck.slides.len()
    );
    for (i, slide) in deck.slides.iter().enumerate() {
        assert!(
            !slide.title.trim().is_empty(),
            "[{context}] slide {} has no title",
            i + 1
        );
        assert!(
            !slide.bullets.is_empty(),
            "[{context}] slide {} has no bullets",
            i + 1
        );
    }
    println!(
        "[{context}] ✓  '{}' with {} slides",
        deck.topic,
        deck.slides.len()
    );
}

// ── Live tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_preview_from_sample() {
    let (path, key) = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = SlidesConfig::builder()
        .api_key(key)
        .max_retries(2)
        .build()
        .expect("config");
    let deck = generate(&path, &config).await.expect("generate() should succeed");

    assert_deck_quality(&deck, "sample");
    println!("{}", render_preview(&deck));
}

#[tokio::test]
async fn test_convert_sample_to_pptx() {
    let (path, key) = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = SlidesConfig::builder()
        .api_key(key)
        .max_retries(2)
        .bullet_style(BulletStyle::Numbered)
        .output_dir(output_dir())
        .build()
        .expect("config");
    let out = convert_to_pptx(&path, &config)
        .await
        .expect("convert_to_pptx() should succeed");

    assert_deck_quality(&out.presentation, "sample.pptx");
    assert!(out.file.file_name.ends_with("_Presentation.pptx"));
    assert_eq!(out.file.slide_count, out.presentation.slides.len() + 1);

    let file = std::fs::File::open(&out.file.path).expect("pptx written");
    let mut archive = zip::ZipArchive::new(file).expect("valid zip");
    let mut presentation_xml = String::new();
    archive
        .by_name("ppt/presentation.xml")
        .expect("presentation part")
        .read_to_string(&mut presentation_xml)
        .unwrap();
    assert_eq!(
        presentation_xml.matches("<p:sldId ").count(),
        out.file.slide_count
    );
    println!(
        "Wrote {} ({} bytes, {}ms)",
        out.file.path.display(),
        out.file.bytes_written,
        out.stats.total_duration_ms
    );
}

#[tokio::test]
async fn test_invalid_key_is_auth_error() {
    let (path, _key) = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));

    let config = SlidesConfig::builder()
        .api_key("not-a-real-key")
        .build()
        .expect("config");
    let err = generate(&path, &config).await.unwrap_err();
    assert!(!err.is_retryable(), "bad credentials should not be retried: {err:?}");
}
