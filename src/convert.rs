//! One-shot entry points: PDF in, presentation (and `.pptx`) out.
//!
//! These wrap an [`Orchestrator`] for callers that process a single document
//! and do not need to observe the state machine directly. Long-lived hosts
//! (a server, a GUI) should build one orchestrator with
//! [`build_orchestrator`] and drive `select_file` / `export` / `reset`
//! themselves.

use crate::config::{SlidesConfig, DEFAULT_GEMINI_MODEL};
use crate::error::Pdf2SlidesError;
use crate::orchestrator::Orchestrator;
use crate::output::{ConversionOutput, ConversionStats, PresentationResult};
use crate::pipeline::analyze::{AnalysisClient, AnalysisOptions, ContentGenerator};
use crate::pipeline::export::PptxExporter;
use crate::pipeline::gemini::GeminiGenerator;
use crate::pipeline::input::FileSelection;
use crate::pipeline::llm::LlmGenerator;
use edgequake_llm::{LLMProvider, ProviderFactory};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Model used for edgequake-llm providers when none is configured.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4.1-nano";

/// Analyse a PDF and return the presentation without writing a file.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2slides::{generate, SlidesConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SlidesConfig::builder().api_key("AIza...").build()?;
/// let deck = generate("report.pdf", &config).await?;
/// for slide in &deck.slides {
///     println!("{}", slide.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn generate(
    path: impl AsRef<Path>,
    config: &SlidesConfig,
) -> Result<Arc<PresentationResult>, Pdf2SlidesError> {
    let file = FileSelection::from_path(path)?;
    let orchestrator = build_orchestrator(config)?;
    orchestrator.select_file(file).await
}

/// Analyse a PDF and write `<Topic>_Presentation.pptx` into
/// [`SlidesConfig::output_dir`].
pub async fn convert_to_pptx(
    path: impl AsRef<Path>,
    config: &SlidesConfig,
) -> Result<ConversionOutput, Pdf2SlidesError> {
    let file = FileSelection::from_path(path)?;
    run_to_file(file, config).await
}

/// Same as [`convert_to_pptx`] for a document already in memory.
///
/// `name` is only used in logs and error messages; the bytes are treated as
/// `application/pdf`.
pub async fn convert_from_bytes(
    name: impl Into<String>,
    bytes: Vec<u8>,
    config: &SlidesConfig,
) -> Result<ConversionOutput, Pdf2SlidesError> {
    let file = FileSelection::from_bytes(name, "application/pdf", bytes);
    run_to_file(file, config).await
}

/// Synchronous wrapper around [`convert_to_pptx`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &SlidesConfig,
) -> Result<ConversionOutput, Pdf2SlidesError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2SlidesError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert_to_pptx(path, config))
}

async fn run_to_file(
    file: FileSelection,
    config: &SlidesConfig,
) -> Result<ConversionOutput, Pdf2SlidesError> {
    let total_start = Instant::now();
    let document_bytes = file.size;
    let orchestrator = build_orchestrator(config)?;

    let analysis_start = Instant::now();
    let presentation = orchestrator.select_file(file).await?;
    let analysis_duration_ms = analysis_start.elapsed().as_millis() as u64;

    let export_start = Instant::now();
    let exported = orchestrator.export().await?;
    let export_duration_ms = export_start.elapsed().as_millis() as u64;

    let stats = ConversionStats {
        document_bytes,
        slide_count: presentation.slide_count(),
        analysis_duration_ms,
        export_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Conversion complete: {} slides in {}ms → {}",
        stats.slide_count,
        stats.total_duration_ms,
        exported.path.display()
    );

    Ok(ConversionOutput {
        presentation,
        file: exported,
        stats,
    })
}

/// Wire the configured analyzer and exporter into a fresh orchestrator.
pub fn build_orchestrator(config: &SlidesConfig) -> Result<Orchestrator, Pdf2SlidesError> {
    let generator = resolve_generator(config)?;
    debug!("Using AI backend '{}'", generator.name());

    let analyzer = AnalysisClient::new(generator, AnalysisOptions::from_config(config))
        .with_progress(config.progress_callback.clone());
    let exporter = PptxExporter::from_config(config);

    Ok(Orchestrator::new(Arc::new(analyzer), Arc::new(exporter))
        .with_max_file_bytes(config.max_file_bytes)
        .with_progress(config.progress_callback.clone()))
}

/// Resolve the AI collaborator, from most-specific to least-specific.
///
/// 1. **Pre-built generator** (`config.generator`), used as-is.
/// 2. **Pre-built edgequake-llm provider** (`config.provider`).
/// 3. **Native Gemini**: `provider_name == "gemini"`, or no provider name but
///    an `api_key`. Requires the key.
/// 4. **Named provider** (`config.provider_name`) through
///    [`ProviderFactory::create_llm_provider`], which reads that provider's
///    API key from the environment.
/// 5. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`).
/// 6. **Full auto-detection** (`ProviderFactory::from_env`).
pub fn resolve_generator(
    config: &SlidesConfig,
) -> Result<Arc<dyn ContentGenerator>, Pdf2SlidesError> {
    if let Some(ref generator) = config.generator {
        return Ok(Arc::clone(generator));
    }

    if let Some(ref provider) = config.provider {
        let label = config.provider_name.as_deref().unwrap_or("edgequake-llm");
        return Ok(Arc::new(LlmGenerator::new(Arc::clone(provider), label)));
    }

    let name = config
        .provider_name
        .as_deref()
        .map(|n| n.trim().to_ascii_lowercase());
    let wants_gemini = match name.as_deref() {
        Some("gemini") => true,
        None => config.api_key.is_some(),
        Some(_) => false,
    };

    if wants_gemini {
        let key = config
            .api_key
            .as_deref()
            .ok_or_else(|| Pdf2SlidesError::ProviderNotConfigured {
                provider: "gemini".to_string(),
                hint: "No Gemini API key. Pass --api-key or set GEMINI_API_KEY.".to_string(),
            })?;
        let model = config.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        return Ok(Arc::new(GeminiGenerator::new(
            key,
            model,
            config.gemini_base_url.as_str(),
        )?));
    }

    if let Some(ref name) = name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL);
        let provider = create_provider(name, model)?;
        return Ok(Arc::new(LlmGenerator::new(provider, name.as_str())));
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            let provider = create_provider(&prov, &model)?;
            return Ok(Arc::new(LlmGenerator::new(provider, prov)));
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| Pdf2SlidesError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No AI provider configured.\n\
                Set GEMINI_API_KEY (native Gemini) or OPENAI_API_KEY / ANTHROPIC_API_KEY.\n\
                Error: {}",
                e
            ),
        })?;
    Ok(Arc::new(LlmGenerator::new(llm_provider, "auto")))
}

fn create_provider(name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, Pdf2SlidesError> {
    ProviderFactory::create_llm_provider(name, model).map_err(|e| {
        Pdf2SlidesError::ProviderNotConfigured {
            provider: name.to_string(),
            hint: format!("{e}"),
        }
    })
}
