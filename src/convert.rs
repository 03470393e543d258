//! Eager (whole-directory) preprocessing entry points.
//!
//! [`preprocess_dir`] walks the input directory, converts every supported
//! file one at a time and returns a [`RunSummary`] once all of them have
//! reached a terminal state. Use [`crate::stream::preprocess_stream`] instead
//! to receive each [`FileReport`] as soon as it is ready.

use crate::config::{PreprocessConfig, SourceFormat};
use crate::error::{FileError, PreprocessError};
use crate::output::{FileOutcome, FileReport, RunSummary, SkipReason};
use crate::pipeline::legacy::LegacyConverter;
use crate::pipeline::{detect, display_name, docx, html, legacy, normalize, write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Preprocess every file in `input_dir`.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(RunSummary)` once every discovered file is Written, Skipped or Failed,
/// even if some files failed (check `summary.failed`, or call
/// [`RunSummary::into_result`]).
///
/// # Errors
/// Returns `Err(PreprocessError)` only when the input directory cannot be
/// listed.
pub async fn preprocess_dir(
    input_dir: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<RunSummary, PreprocessError> {
    let total_start = Instant::now();
    let input_dir = input_dir.as_ref().to_path_buf();
    info!("Starting preprocessing: {}", input_dir.display());

    // ── Step 1: Discover files ───────────────────────────────────────────
    let files = discover(&input_dir).await?;
    let total = files.len();
    info!("Found {} files to examine", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    // ── Step 2: Process sequentially in discovery order ──────────────────
    let mut reports = Vec::with_capacity(total);
    for (i, path) in files.iter().enumerate() {
        reports.push(process_file(path, i + 1, total, config).await);
    }

    // ── Step 3: Summarise ────────────────────────────────────────────────
    let summary = RunSummary::from_reports(
        input_dir,
        reports,
        total_start.elapsed().as_millis() as u64,
    );
    info!(
        "Successfully converted: {}/{} files ({} skipped, {}ms total)",
        summary.converted,
        summary.attempted(),
        summary.skipped,
        summary.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(summary.converted, summary.skipped, summary.failed);
    }

    Ok(summary)
}

/// Synchronous wrapper around [`preprocess_dir`].
///
/// Creates a temporary tokio runtime internally.
pub fn preprocess_dir_sync(
    input_dir: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<RunSummary, PreprocessError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PreprocessError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(preprocess_dir(input_dir, config))
}

/// Preprocess a single file, wherever it lives.
///
/// Never fails: every problem is recorded in the returned report. Progress
/// events are emitted with `index = total = 1`.
pub async fn preprocess_file(path: impl AsRef<Path>, config: &PreprocessConfig) -> FileReport {
    process_file(path.as_ref(), 1, 1, config).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Directory listing on the blocking pool.
pub(crate) async fn discover(input_dir: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
    let dir = input_dir.to_path_buf();
    tokio::task::spawn_blocking(move || detect::discover_files(&dir))
        .await
        .map_err(|e| PreprocessError::Internal(format!("Discovery task panicked: {}", e)))?
}

/// Run one file through detect → convert → normalize → write and report it.
pub(crate) async fn process_file(
    path: &Path,
    index: usize,
    total: usize,
    config: &PreprocessConfig,
) -> FileReport {
    let start = Instant::now();
    let format = detect::detect_format(path);

    let outcome = match format {
        None => FileOutcome::Skipped {
            reason: SkipReason::UnsupportedExtension {
                extension: path
                    .extension()
                    .map(|e| e.to_string_lossy().to_lowercase()),
            },
        },
        Some(format) if !config.is_enabled(format) => FileOutcome::Skipped {
            reason: SkipReason::FormatDisabled { format },
        },
        Some(format) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_start(index, total, path);
            }
            let output = config.output_path_for(path);
            match convert_in_background(path, format, &output, config).await {
                Ok(chars) => FileOutcome::Written { output, chars },
                Err(error) => FileOutcome::Failed { error },
            }
        }
    };

    match outcome {
        FileOutcome::Written { ref output, chars } => {
            info!("Converted {} -> {} ({} chars)", path.display(), output.display(), chars);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_written(index, total, path, chars);
            }
        }
        FileOutcome::Skipped { ref reason } => {
            debug!("Skipping {}: {}", path.display(), reason);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_skipped(index, total, path, &reason.to_string());
            }
        }
        FileOutcome::Failed { ref error } => {
            warn!("Failed to convert {}: {}", path.display(), error);
            if let Some(ref cb) = config.progress_callback {
                cb.on_file_failed(index, total, path, &error.to_string());
            }
        }
    }

    FileReport {
        source: path.to_path_buf(),
        format,
        outcome,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

/// Hand the blocking stages to `spawn_blocking`.
async fn convert_in_background(
    path: &Path,
    format: SourceFormat,
    output: &Path,
    config: &PreprocessConfig,
) -> Result<usize, FileError> {
    let source = path.to_path_buf();
    let target = output.to_path_buf();
    let converter = config.legacy_converter.clone();

    tokio::task::spawn_blocking(move || {
        convert_blocking(&source, format, &target, converter.as_deref())
    })
    .await
    .unwrap_or_else(|e| {
        Err(FileError::CorruptOrUnreadable {
            file: display_name(path),
            detail: format!("conversion task panicked: {e}"),
        })
    })
}

/// Blocking implementation of one file conversion.
///
/// Returns the character count of the written text.
fn convert_blocking(
    source: &Path,
    format: SourceFormat,
    output: &Path,
    converter: Option<&dyn LegacyConverter>,
) -> Result<usize, FileError> {
    let raw = match format {
        SourceFormat::LegacyDoc => legacy::extract_legacy(source, converter)?,
        SourceFormat::ModernDoc => docx::extract_docx(source)?,
        SourceFormat::Markup => html::extract_html(source)?,
    };
    debug!("{}: extracted {} bytes", display_name(source), raw.len());

    let cleaned = normalize::clean_text(&raw);
    if cleaned.is_empty() {
        return Err(FileError::NoContent {
            file: display_name(source),
        });
    }

    write::write_atomic(output, &cleaned, source)?;
    Ok(cleaned.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn blocking_conversion_writes_clean_text() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("page.html");
        fs::write(&src, "<p>Hello\r\n\r\n\r\nWorld\u{FEFF}</p>").unwrap();
        let out = dir.path().join("page.txt");
        let chars = convert_blocking(&src, SourceFormat::Markup, &out, None).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "Hello\n\nWorld");
        assert_eq!(chars, 12);
    }

    #[test]
    fn empty_result_is_no_content_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("blank.html");
        fs::write(&src, "<html><body>  \u{200B} </body></html>").unwrap();
        let out = dir.path().join("blank.txt");
        let err = convert_blocking(&src, SourceFormat::Markup, &out, None).unwrap_err();
        assert_eq!(err, FileError::NoContent { file: "blank.html".into() });
        assert!(!out.exists());
    }

    #[test]
    fn legacy_without_converter_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("old.doc");
        fs::write(&src, crate::pipeline::legacy::CFB_MAGIC).unwrap();
        let err = convert_blocking(&src, SourceFormat::LegacyDoc, &dir.path().join("old.txt"), None)
            .unwrap_err();
        assert_eq!(err.kind(), "conversion_unavailable");
    }

    #[tokio::test]
    async fn unsupported_file_is_skipped_without_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("scan.pdf");
        fs::write(&src, b"%PDF-1.4").unwrap();
        let report = preprocess_file(&src, &PreprocessConfig::default()).await;
        assert!(report.is_skipped());
        assert_eq!(report.format, None);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn disabled_format_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("page.html");
        fs::write(&src, "<p>x</p>").unwrap();
        let config = PreprocessConfig::builder()
            .formats(vec![SourceFormat::ModernDoc])
            .build()
            .unwrap();
        let report = preprocess_file(&src, &config).await;
        assert_eq!(
            report.outcome,
            FileOutcome::Skipped {
                reason: SkipReason::FormatDisabled {
                    format: SourceFormat::Markup
                }
            }
        );
    }

    #[test]
    fn sync_wrapper_reports_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = preprocess_dir_sync(dir.path().join("data"), &PreprocessConfig::default())
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InputDirNotFound { .. }));
    }
}
