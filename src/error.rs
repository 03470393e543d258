//! Error types for the faq-preprocess library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PreprocessError`]: **Fatal**: the run cannot proceed at all (input
//!   directory missing, invalid configuration). Returned as
//!   `Err(PreprocessError)` from the top-level `preprocess*` functions.
//!
//! * [`FileError`]: **Non-fatal**: a single file failed (corrupt container,
//!   host application missing, disk full) but every other file is fine.
//!   Stored inside [`crate::output::FileOutcome::Failed`] so the batch
//!   always runs to completion.
//!
//! An unsupported extension is neither: it is a
//! [`crate::output::FileOutcome::Skipped`] outcome.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the faq-preprocess library.
///
/// File-level failures use [`FileError`] and are stored in
/// [`crate::output::FileReport`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PreprocessError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input directory does not exist.
    #[error("Input directory not found: '{path}'\nCreate it and add your .doc, .docx or .html files.")]
    InputDirNotFound { path: PathBuf },

    /// The input path exists but is a file.
    #[error("'{path}' is not a directory")]
    NotADirectory { path: PathBuf },

    /// Process does not have read permission on the directory.
    #[error("Permission denied reading '{path}'\nTry: chmod +rx {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Listing the directory failed for another reason.
    #[error("Failed to list '{path}': {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Run outcome ───────────────────────────────────────────────────────
    /// Some files were converted but at least one failed.
    ///
    /// Returned by [`crate::output::RunSummary::into_result`] when the caller
    /// wants to treat any file failure as an error.
    #[error("{failed}/{discovered} files failed during preprocessing")]
    PartialFailure {
        converted: usize,
        failed: usize,
        discovered: usize,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single source file.
///
/// Every variant names the file so log lines and reports stand on their own.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// Legacy `.doc` support needs a host application that is not available.
    #[error("{file}: legacy conversion unavailable: {reason}")]
    ConversionUnavailable { file: String, reason: String },

    /// The container or markup could not be read or parsed.
    #[error("{file}: corrupt or unreadable: {detail}")]
    CorruptOrUnreadable { file: String, detail: String },

    /// Extraction succeeded but nothing survived cleaning.
    #[error("{file}: no text content extracted")]
    NoContent { file: String },

    /// The output artifact could not be written.
    #[error("{file}: failed to write output: {detail}")]
    WriteFailure { file: String, detail: String },
}

impl FileError {
    /// Short, stable name of the failure class (used in summaries and JSON).
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::ConversionUnavailable { .. } => "conversion_unavailable",
            FileError::CorruptOrUnreadable { .. } => "corrupt_or_unreadable",
            FileError::NoContent { .. } => "no_content",
            FileError::WriteFailure { .. } => "write_failure",
        }
    }
}
