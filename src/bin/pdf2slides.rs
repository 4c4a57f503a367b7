//! CLI binary for edgequake-pdf2slides.
//!
//! A thin shim over the library crate that maps CLI flags to `SlidesConfig`,
//! drives one orchestrator cycle and prints the preview.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2slides::{
    build_orchestrator, render_preview, BulletStyle, ExportedFile, FileSelection, Pdf2SlidesError,
    ProcessingError, ProcessingProgressCallback, ProcessingStatus, ProgressCallback, SlidesConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal overlay: a spinner while the document is extracted and analysed,
/// nothing in the other states.
struct CliProgressCallback {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn spinner() -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }
}

impl ProcessingProgressCallback for CliProgressCallback {
    fn on_status_change(&self, _from: ProcessingStatus, to: ProcessingStatus) {
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match to.overlay_message() {
            Some(message) => {
                let bar = slot.get_or_insert_with(Self::spinner);
                bar.set_prefix(to.to_string());
                bar.set_message(format!("{message}…"));
            }
            None => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn on_analysis_attempt(&self, attempt: u32, max_attempts: u32) {
        if attempt > 1 {
            if let Some(ref bar) = *self.bar.lock().unwrap_or_else(PoisonError::into_inner) {
                bar.set_message(format!("retrying ({attempt}/{max_attempts})…"));
            }
        }
    }

    fn on_error(&self, error: &ProcessingError) {
        if let Some(bar) = self.bar.lock().unwrap_or_else(PoisonError::into_inner).take() {
            bar.finish_and_clear();
        }
        tracing::debug!("cycle error: {}", error);
    }

    fn on_export_complete(&self, file: &ExportedFile) {
        tracing::debug!("exported {}", file.path.display());
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse and export (writes <Topic>_Presentation.pptx in the current dir)
  pdf2slides report.pdf

  # Export into a directory, numbered bullets
  pdf2slides report.pdf -o decks/ --bullets number

  # Preview only, as JSON
  pdf2slides --preview-only --json report.pdf > deck.json

  # Use an edgequake-llm provider instead of native Gemini
  pdf2slides --provider openai --model gpt-4.1 report.pdf

BACKENDS:
  gemini (default when GEMINI_API_KEY is set)
      PDF attached inline, output constrained by responseSchema.
      Default model: gemini-2.5-flash
  openai, anthropic, ollama, … (via edgequake-llm)
      PDF attached to the user message, schema in the system prompt.

LIMITS:
  PDF only, at most 10 MiB (change with --max-file-size).
  The model is asked for 5 to 12 slides with 3 to 5 bullets each.

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key
  OPENAI_API_KEY          OpenAI API key (with --provider openai)
  ANTHROPIC_API_KEY       Anthropic API key (with --provider anthropic)
  EDGEQUAKE_LLM_PROVIDER  Provider used when no key or --provider is given
  EDGEQUAKE_MODEL         Model used with EDGEQUAKE_LLM_PROVIDER
  RUST_LOG                Overrides the log filter
"#;

/// Turn a PDF into a PowerPoint deck using generative AI.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2slides",
    version,
    about = "Turn a PDF into a PowerPoint deck using generative AI",
    long_about = "Send a PDF document to a multimodal AI model, preview the presentation it \
designs (topic, summary, 5 to 12 slides with bullets and speaker notes) and export it as a \
16:9 .pptx file.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to convert.
    input: PathBuf,

    /// Directory the .pptx file is written to.
    #[arg(short, long, env = "PDF2SLIDES_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Model ID (default: gemini-2.5-flash for Gemini).
    #[arg(long, env = "PDF2SLIDES_MODEL")]
    model: Option<String>,

    /// AI provider: gemini (native), or openai, anthropic, ollama, … via edgequake-llm.
    #[arg(long, env = "PDF2SLIDES_PROVIDER")]
    provider: Option<String>,

    /// Gemini API key.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "PDF2SLIDES_TEMPERATURE", default_value_t = 0.3)]
    temperature: f32,

    /// Max output tokens for the analysis.
    #[arg(long, env = "PDF2SLIDES_MAX_TOKENS", default_value_t = 8192)]
    max_tokens: usize,

    /// Retries on transient AI failures (timeouts, 429, 5xx).
    #[arg(long, env = "PDF2SLIDES_MAX_RETRIES", default_value_t = 0)]
    max_retries: u32,

    /// AI call timeout in seconds (0 disables).
    #[arg(long, env = "PDF2SLIDES_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// Largest accepted PDF in bytes.
    #[arg(long, env = "PDF2SLIDES_MAX_FILE_SIZE", default_value_t = 10 * 1024 * 1024)]
    max_file_size: u64,

    /// Bullet glyph on content slides.
    #[arg(long, env = "PDF2SLIDES_BULLETS", value_enum, default_value = "round")]
    bullets: BulletArg,

    /// Path to a text file replacing the built-in instruction prompt.
    #[arg(long, env = "PDF2SLIDES_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Print the presentation as JSON instead of the text preview.
    #[arg(long, env = "PDF2SLIDES_JSON")]
    json: bool,

    /// Analyse and preview only; do not write a .pptx file.
    #[arg(long)]
    preview_only: bool,

    /// Disable the spinner.
    #[arg(long, env = "PDF2SLIDES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2SLIDES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the preview.
    #[arg(short, long, env = "PDF2SLIDES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum BulletArg {
    Round,
    Number,
}

impl From<BulletArg> for BulletStyle {
    fn from(v: BulletArg) -> Self {
        match v {
            BulletArg::Round => BulletStyle::Round,
            BulletArg::Number => BulletStyle::Numbered,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the feedback that matters; keep INFO logs out of
    // its way unless asked for.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ProcessingProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb).await?;
    let orchestrator = build_orchestrator(&config).context("Failed to configure AI provider")?;

    // ── Select: synchronous validation, inline error ─────────────────────
    let file = FileSelection::from_path(&cli.input)
        .with_context(|| format!("Cannot open {}", cli.input.display()))?;

    let presentation = match orchestrator.select_file(file).await {
        Ok(p) => p,
        Err(e) if e.is_validation() => {
            eprintln!("{} {}", red("✘"), e);
            std::process::exit(2);
        }
        Err(e) => {
            report_failure(orchestrator.snapshot().error, &e);
            std::process::exit(1);
        }
    };

    // ── Preview ──────────────────────────────────────────────────────────
    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if cli.json {
            let json = serde_json::to_string_pretty(&*presentation)
                .context("Failed to serialise presentation")?;
            writeln!(handle, "{json}").context("Failed to write to stdout")?;
        } else {
            handle
                .write_all(render_preview(&presentation).as_bytes())
                .context("Failed to write to stdout")?;
        }
    }

    if cli.preview_only {
        return Ok(());
    }

    // ── Download ─────────────────────────────────────────────────────────
    match orchestrator.export().await {
        Ok(file) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {} slides  {}  →  {}",
                    green("✔"),
                    file.slide_count,
                    dim(&format!("{} bytes", file.bytes_written)),
                    bold(&file.path.display().to_string()),
                );
            }
            Ok(())
        }
        Err(e) => {
            report_failure(orchestrator.snapshot().error, &e);
            std::process::exit(1);
        }
    }
}

/// Print the stored `{ message, details }` record, falling back to the error.
fn report_failure(record: Option<ProcessingError>, err: &Pdf2SlidesError) {
    match record {
        Some(pe) => {
            eprintln!("{} {}", red("✘"), bold(&pe.message));
            if let Some(details) = pe.details {
                for line in details.lines() {
                    eprintln!("  {}", dim(line));
                }
            }
        }
        None => eprintln!("{} {}", red("✘"), err),
    }
    if err.is_retryable() {
        eprintln!(
            "  {} transient failure; try --max-retries 2",
            cyan("hint:")
        );
    }
}

/// Map CLI args to `SlidesConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<SlidesConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = SlidesConfig::builder()
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .max_retries(cli.max_retries)
        .api_timeout_secs(cli.api_timeout)
        .max_file_bytes(cli.max_file_size)
        .bullet_style(cli.bullets.clone().into())
        .output_dir(cli.output_dir.clone());

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(key) = cli.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        builder = builder.api_key(key);
    }
    if let Some(prompt) = system_prompt {
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
