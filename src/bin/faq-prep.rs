//! CLI binary for faq-preprocess.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PreprocessConfig` and prints the run summary.

use anyhow::{Context, Result};
use clap::Parser;
use faq_preprocess::{
    preprocess_dir, OfficeHostConverter, PreprocessConfig, PreprocessProgressCallback,
    ProgressCallback, RunSummary, SourceFormat,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
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

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per file.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the file currently being converted.
    file_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner only; `on_run_start` sets the length once discovery is done.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Listing input directory…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            file_started: Mutex::new(None),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    fn elapsed_secs(&self) -> f64 {
        self.file_started
            .lock()
            .ok()
            .and_then(|mut started| started.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl PreprocessProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} files"))
        ));
    }

    fn on_file_start(&self, _index: usize, _total: usize, source: &Path) {
        if let Ok(mut started) = self.file_started.lock() {
            *started = Some(Instant::now());
        }
        self.bar.set_message(file_name(source));
    }

    fn on_file_written(&self, index: usize, total: usize, source: &Path, chars: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<40}  {}  {}",
            green("✓"),
            index,
            total,
            file_name(source),
            dim(&format!("{chars:>6} chars")),
            dim(&format!("{:.1}s", self.elapsed_secs())),
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, index: usize, total: usize, source: &Path, reason: &str) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<40}  {}",
            dim("–"),
            index,
            total,
            dim(&file_name(source)),
            dim(reason),
        ));
        self.bar.inc(1);
    }

    fn on_file_failed(&self, index: usize, total: usize, source: &Path, error: &str) {
        let elapsed = self.elapsed_secs();

        // Keep the line tidy; the full message is in the log and the JSON.
        let msg: String = if error.chars().count() > 80 {
            error.chars().take(79).chain(std::iter::once('…')).collect()
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
            dim(&format!("{elapsed:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, converted: usize, skipped: usize, failed: usize) {
        self.bar.finish_and_clear();
        let attempted = converted + failed;

        if failed == 0 {
            eprintln!(
                "{} Successfully converted: {}/{} files  {}",
                green("✔"),
                bold(&converted.to_string()),
                attempted,
                dim(&format!("({skipped} skipped)")),
            );
        } else {
            eprintln!(
                "{} Successfully converted: {}/{} files  ({} failed, {} skipped)",
                if converted == 0 { red("✘") } else { cyan("⚠") },
                bold(&converted.to_string()),
                attempted,
                red(&failed.to_string()),
                skipped,
            );
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert everything in ./data, writing <name>.txt next to each file
  faq-prep

  # Another folder, artifacts collected elsewhere
  faq-prep backend/data --output-dir corpus/

  # Only .docx and .html, skip legacy .doc entirely
  faq-prep --formats docx,html

  # Use a specific LibreOffice install for .doc files
  faq-prep --office-host /opt/libreoffice/program/soffice

  # Machine-readable summary, non-zero exit when any file failed
  faq-prep --json --fail-on-error > summary.json

SUPPORTED FORMATS:
  Extension  Extractor
  ─────────  ─────────────────────────────────────────────────
  .doc       LibreOffice / textutil → .docx → paragraphs and tables
  .docx      paragraphs and tables, in document order
  .html      visible text; script and style removed

  Any other file is reported as skipped and left untouched.

ENVIRONMENT VARIABLES:
  OFFICE_HOST_PATH        Path to soffice or textutil; skips detection
  RUST_LOG                Overrides the log filter (e.g. faq_preprocess=debug)
  FAQ_PREP_*              Every flag above, e.g. FAQ_PREP_OUTPUT_DIR
"#;

/// Convert .doc, .docx and .html files into clean text for indexing.
#[derive(Parser, Debug)]
#[command(
    name = "faq-prep",
    version,
    about = "Convert .doc, .docx and .html files into clean text for indexing",
    long_about = "Extract the visible text of every .doc, .docx and .html file in a directory, \
normalise it (line endings, invisible characters, blank lines, whitespace, entities) and write \
it as UTF-8 <name>.txt. Failures are per file; the run always completes.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory holding the source documents.
    #[arg(env = "FAQ_PREP_INPUT_DIR", default_value = "data")]
    input_dir: PathBuf,

    /// Write artifacts here instead of next to each source.
    #[arg(short, long, env = "FAQ_PREP_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Artifact file extension.
    #[arg(long, env = "FAQ_PREP_EXTENSION", default_value = "txt")]
    extension: String,

    /// Formats to convert (comma-separated).
    #[arg(
        long,
        env = "FAQ_PREP_FORMATS",
        value_enum,
        value_delimiter = ',',
        default_values = ["doc", "docx", "html"]
    )]
    formats: Vec<FormatArg>,

    /// Do not look for a word-processing host; .doc files fail.
    #[arg(long, env = "FAQ_PREP_NO_LEGACY", conflicts_with = "office_host")]
    no_legacy: bool,

    /// Explicit soffice / textutil executable for .doc files.
    #[arg(long, env = "FAQ_PREP_OFFICE_HOST")]
    office_host: Option<PathBuf>,

    /// Print the run summary as JSON on stdout.
    #[arg(long, env = "FAQ_PREP_JSON")]
    json: bool,

    /// Exit non-zero when any file failed.
    #[arg(long, env = "FAQ_PREP_FAIL_ON_ERROR")]
    fail_on_error: bool,

    /// Disable progress bar.
    #[arg(long, env = "FAQ_PREP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FAQ_PREP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FAQ_PREP_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Doc,
    Docx,
    Html,
}

impl From<FormatArg> for SourceFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Doc => SourceFormat::LegacyDoc,
            FormatArg::Docx => SourceFormat::ModernDoc,
            FormatArg::Html => SourceFormat::Markup,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; -v always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn PreprocessProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let summary = preprocess_dir(&cli.input_dir, &config)
        .await
        .with_context(|| format!("Cannot preprocess {}", cli.input_dir.display()))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        print_summary(&summary);
    }

    if cli.fail_on_error {
        summary.into_result().context("Preprocessing incomplete")?;
    }

    Ok(())
}

/// Map CLI args to `PreprocessConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PreprocessConfig> {
    let mut builder = PreprocessConfig::builder()
        .output_extension(cli.extension.as_str())
        .formats(cli.formats.iter().copied().map(SourceFormat::from).collect());

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }

    let legacy_enabled = cli.formats.iter().any(|f| matches!(f, FormatArg::Doc));
    if legacy_enabled && !cli.no_legacy {
        builder = match cli.office_host {
            Some(ref program) => {
                builder.legacy_converter(Arc::new(OfficeHostConverter::from_program(program)))
            }
            None => builder.detect_legacy_converter(),
        };
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Plain-text summary, used when the progress bar is off.
fn print_summary(summary: &RunSummary) {
    for report in summary.files.iter().filter(|r| r.is_failed()) {
        if let Some(error) = report.error() {
            eprintln!("  {} {}", red("✗"), error);
        }
    }
    eprintln!(
        "Successfully converted: {}/{} files in {}ms",
        summary.converted,
        summary.attempted(),
        summary.total_duration_ms
    );
    if summary.skipped > 0 {
        eprintln!("  {} files skipped (unsupported or disabled)", summary.skipped);
    }
}
