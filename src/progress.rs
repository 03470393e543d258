//! Progress-callback trait for per-file preprocessing events.
//!
//! Inject an [`Arc<dyn PreprocessProgressCallback>`] via
//! [`crate::config::PreprocessConfigBuilder::progress_callback`] to receive
//! events as the run walks the input directory. The CLI renders them with a
//! progress bar; library users can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use faq_preprocess::{PreprocessConfig, PreprocessProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl PreprocessProgressCallback for CountingCallback {
//!     fn on_file_written(&self, index: usize, total: usize, _source: &Path, chars: usize) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{} done ({} chars)", index, total, chars);
//!     }
//! }
//!
//! let config = PreprocessConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { written: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each discovered file.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Files are processed one at a time, but the trait is
/// `Send + Sync` because the pipeline runs on a tokio runtime.
///
/// `index` is 1-based and counts every discovered file, including skipped ones.
pub trait PreprocessProgressCallback: Send + Sync {
    /// Called once after discovery, before any file is touched.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a supported file is converted.
    fn on_file_start(&self, index: usize, total: usize, source: &Path) {
        let _ = (index, total, source);
    }

    /// Called when an artifact has been written.
    ///
    /// `chars` is the character count of the cleaned text.
    fn on_file_written(&self, index: usize, total: usize, source: &Path, chars: usize) {
        let _ = (index, total, source, chars);
    }

    /// Called for unsupported or disabled files.
    fn on_file_skipped(&self, index: usize, total: usize, source: &Path, reason: &str) {
        let _ = (index, total, source, reason);
    }

    /// Called when a file failed at any stage.
    fn on_file_failed(&self, index: usize, total: usize, source: &Path, error: &str) {
        let _ = (index, total, source, error);
    }

    /// Called once after every file has reached a terminal state.
    fn on_run_complete(&self, converted: usize, skipped: usize, failed: usize) {
        let _ = (converted, skipped, failed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PreprocessProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PreprocessConfig`].
pub type ProgressCallback = Arc<dyn PreprocessProgressCallback>;
