//! Result types: one [`FileReport`] per discovered file, folded into a
//! [`RunSummary`] for the whole run.
//!
//! Every type here is serialisable so the CLI can emit the summary as JSON
//! and callers can persist it alongside the corpus.

use crate::config::SourceFormat;
use crate::error::{FileError, PreprocessError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Terminal state of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// Cleaned text was written to `output`.
    Written { output: PathBuf, chars: usize },
    /// The file was not attempted.
    Skipped { reason: SkipReason },
    /// The file was attempted and failed; see the error for the stage.
    Failed { error: FileError },
}

/// Why a discovered file was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Extension not in the recognised set (`None` when the name has none).
    UnsupportedExtension { extension: Option<String> },
    /// Recognised format, but not enabled in the configuration.
    FormatDisabled { format: SourceFormat },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedExtension { extension: Some(ext) } => {
                write!(f, "unsupported extension .{ext}")
            }
            SkipReason::UnsupportedExtension { extension: None } => {
                write!(f, "no file extension")
            }
            SkipReason::FormatDisabled { format } => write!(f, "{format} disabled"),
        }
    }
}

/// Result for one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Path of the source file.
    pub source: PathBuf,
    /// Detected format, `None` for unsupported extensions.
    pub format: Option<SourceFormat>,
    pub outcome: FileOutcome,
    /// Wall-clock time spent on this file.
    pub duration_ms: u64,
}

impl FileReport {
    pub fn is_written(&self) -> bool {
        matches!(self.outcome, FileOutcome::Written { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, FileOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, FileOutcome::Failed { .. })
    }

    /// The failure, if this file failed.
    pub fn error(&self) -> Option<&FileError> {
        match self.outcome {
            FileOutcome::Failed { ref error } => Some(error),
            _ => None,
        }
    }

    /// Path of the written artifact, if any.
    pub fn output(&self) -> Option<&PathBuf> {
        match self.outcome {
            FileOutcome::Written { ref output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Counts and per-file details of one run.
///
/// `discovered == converted + skipped + failed` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_dir: PathBuf,
    /// Regular, non-hidden files found in the input directory.
    pub discovered: usize,
    /// Files whose artifact was written.
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_duration_ms: u64,
    /// One report per discovered file, in processing order.
    pub files: Vec<FileReport>,
}

impl RunSummary {
    /// Fold per-file reports into a summary.
    pub fn from_reports(
        input_dir: impl Into<PathBuf>,
        files: Vec<FileReport>,
        total_duration_ms: u64,
    ) -> Self {
        let converted = files.iter().filter(|f| f.is_written()).count();
        let skipped = files.iter().filter(|f| f.is_skipped()).count();
        let failed = files.iter().filter(|f| f.is_failed()).count();
        Self {
            input_dir: input_dir.into(),
            discovered: files.len(),
            converted,
            skipped,
            failed,
            total_duration_ms,
            files,
        }
    }

    /// Number of files that were attempted (supported and enabled).
    pub fn attempted(&self) -> usize {
        self.converted + self.failed
    }

    /// Treat any failed file as an error.
    pub fn into_result(self) -> Result<Self, PreprocessError> {
        if self.failed > 0 {
            return Err(PreprocessError::PartialFailure {
                converted: self.converted,
                failed: self.failed,
                discovered: self.discovered,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(name: &str, outcome: FileOutcome) -> FileReport {
        FileReport {
            source: PathBuf::from(name),
            format: None,
            outcome,
            duration_ms: 1,
        }
    }

    fn sample() -> RunSummary {
        RunSummary::from_reports(
            "data",
            vec![
                report(
                    "a.docx",
                    FileOutcome::Written {
                        output: PathBuf::from("a.txt"),
                        chars: 12,
                    },
                ),
                report(
                    "b.pdf",
                    FileOutcome::Skipped {
                        reason: SkipReason::UnsupportedExtension {
                            extension: Some("pdf".into()),
                        },
                    },
                ),
                report(
                    "c.docx",
                    FileOutcome::Failed {
                        error: FileError::CorruptOrUnreadable {
                            file: "c.docx".into(),
                            detail: "bad zip".into(),
                        },
                    },
                ),
            ],
            5,
        )
    }

    #[test]
    fn counts_add_up() {
        let s = sample();
        assert_eq!(s.discovered, 3);
        assert_eq!(s.converted, 1);
        assert_eq!(s.skipped, 1);
        assert_eq!(s.failed, 1);
        assert_eq!(s.attempted(), 2);
        assert_eq!(s.converted + s.skipped + s.failed, s.discovered);
    }

    #[test]
    fn into_result_flags_failures() {
        let err = sample().into_result().unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::PartialFailure {
                converted: 1,
                failed: 1,
                discovered: 3
            }
        ));

        let clean = RunSummary::from_reports("data", vec![], 0);
        assert!(clean.into_result().is_ok());
    }

    #[test]
    fn report_accessors() {
        let s = sample();
        assert_eq!(s.files[0].output(), Some(&PathBuf::from("a.txt")));
        assert!(s.files[1].error().is_none());
        assert_eq!(s.files[2].error().map(FileError::kind), Some("corrupt_or_unreadable"));
    }

    #[test]
    fn skip_reason_display() {
        let r = SkipReason::UnsupportedExtension {
            extension: Some("pdf".into()),
        };
        assert_eq!(r.to_string(), "unsupported extension .pdf");
        let r = SkipReason::FormatDisabled {
            format: SourceFormat::LegacyDoc,
        };
        assert_eq!(r.to_string(), ".doc disabled");
    }

    #[test]
    fn summary_serialises_to_json() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"converted\":1"));
        assert!(json.contains("UnsupportedExtension"));
    }
}
