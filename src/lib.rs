//! # faq-preprocess
//!
//! Turn a folder of FAQ source documents (`.doc`, `.docx`, `.html`) into clean
//! UTF-8 `.txt` files ready for embedding and vector indexing.
//!
//! ## Why this crate?
//!
//! Office exports and saved web pages are full of noise that hurts retrieval:
//! byte-order marks in the middle of sentences, Windows line endings, runs of
//! empty paragraphs, tab-aligned columns, script blocks, escaped entities.
//! This crate extracts the visible text of each document and applies a fixed
//! set of cleaning rules, so every artifact has one paragraph per line, no
//! invisible characters and no markup.
//!
//! ## Pipeline Overview
//!
//! ```text
//! data/
//!  │
//!  ├─ 1. Discover  regular, non-hidden files, sorted by name
//!  ├─ 2. Detect    .doc / .docx / .html by extension, others skipped
//!  ├─ 3. Extract   host app (.doc → .docx), docx-rs, scraper
//!  ├─ 4. Clean     7-rule normaliser
//!  └─ 5. Write     <stem>.txt, atomically, next to the source
//! ```
//!
//! One bad file never stops a run: its failure is recorded in the
//! [`RunSummary`] and the next file is processed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use faq_preprocess::{preprocess_dir, PreprocessConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Pick up LibreOffice / textutil so legacy .doc files work too.
//!     let config = PreprocessConfig::builder().detect_legacy_converter().build()?;
//!     let summary = preprocess_dir("data", &config).await?;
//!     eprintln!("converted {}/{}", summary.converted, summary.attempted());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `faq-prep` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! faq-preprocess = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PreprocessConfig, PreprocessConfigBuilder, SourceFormat};
pub use convert::{preprocess_dir, preprocess_dir_sync, preprocess_file};
pub use error::{FileError, PreprocessError};
pub use output::{FileOutcome, FileReport, RunSummary, SkipReason};
pub use pipeline::detect::{detect_format, discover_files};
pub use pipeline::legacy::{LegacyConverter, OfficeHostConverter};
pub use pipeline::normalize::clean_text;
pub use progress::{NoopProgressCallback, PreprocessProgressCallback, ProgressCallback};
pub use stream::{preprocess_stream, FileStream};
