//! Streaming preprocessing API: emit one report per file as it completes.
//!
//! Unlike the eager [`crate::convert::preprocess_dir`], which returns only
//! after every file is done, [`preprocess_stream`] yields each
//! [`FileReport`] through a `Stream` as soon as that file reaches a terminal
//! state. Files are still processed one at a time, in discovery order, and
//! nothing happens until the stream is polled.

use crate::config::PreprocessConfig;
use crate::convert::{discover, process_file};
use crate::error::PreprocessError;
use crate::output::FileReport;
use futures::stream::{self, StreamExt};
use std::path::Path;
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-file reports.
pub type FileStream = Pin<Box<dyn Stream<Item = FileReport> + Send>>;

/// Preprocess `input_dir`, streaming reports in discovery order.
///
/// Discovery happens eagerly, so a missing or unreadable directory is
/// reported here rather than inside the stream. `on_run_start` fires before
/// this returns; `on_run_complete` is not emitted since the caller decides
/// when the run ends.
///
/// # Example
/// ```rust,no_run
/// use faq_preprocess::{preprocess_stream, PreprocessConfig};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PreprocessConfig::default();
/// let mut reports = preprocess_stream("data", &config).await?;
/// while let Some(report) = reports.next().await {
///     println!("{}: written={}", report.source.display(), report.is_written());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn preprocess_stream(
    input_dir: impl AsRef<Path>,
    config: &PreprocessConfig,
) -> Result<FileStream, PreprocessError> {
    let input_dir = input_dir.as_ref();
    info!("Starting streaming preprocessing: {}", input_dir.display());

    let files = discover(input_dir).await?;
    let total = files.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total);
    }

    let config = config.clone();
    let s = stream::iter(files.into_iter().enumerate()).then(move |(i, path)| {
        let cfg = config.clone();
        async move { process_file(&path, i + 1, total, &cfg).await }
    });

    Ok(Box::pin(s))
}
