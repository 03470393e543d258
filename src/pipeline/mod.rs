//! Pipeline stages for document-to-text preprocessing.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! detect ──▶ legacy ──▶ docx ──┐
//!   │                          ├──▶ normalize ──▶ write
//!   └──────────────▶ html ─────┘
//! (extension)  (host → .docx)   (rules)     (atomic)
//! ```
//!
//! 1. [`detect`]: list the input directory and map each file to a format
//! 2. [`legacy`]: transcode `.doc` to `.docx` in a scratch directory through
//!    an injected host application
//! 3. [`docx`] / [`html`]: raw text extraction
//! 4. [`normalize`]: deterministic text-cleanup rules
//! 5. [`write`]: temp file plus rename next to the source
//!
//! Every stage is blocking; the async entry points call them from
//! `spawn_blocking`.

pub mod detect;
pub mod docx;
pub mod html;
pub mod legacy;
pub mod normalize;
pub mod write;

use std::path::Path;

/// File name used in `FileError`s and log lines.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
