//! Legacy `.doc` handling: transcode to `.docx` with a host application, then
//! reuse the modern extractor.
//!
//! The binary Word 97-2003 format is not parsed here. A [`LegacyConverter`]
//! writes an equivalent `.docx` into a scratch directory, [`super::docx`]
//! reads it, and the scratch directory is removed when the [`TempDir`] guard
//! drops, whether extraction succeeded or not.
//!
//! The scratch directory is a hidden sibling of the source file, so the
//! intermediate never overwrites a real `<stem>.docx` that happens to sit
//! next to the `.doc`, and never shows up in discovery.

use crate::error::FileError;
use crate::pipeline::{display_name, docx};
use office_host::{OfficeHost, OfficeHostError};
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// OLE2 / Compound File Binary signature shared by every `.doc`.
pub const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Transcodes one legacy document into a `.docx`.
///
/// Implementations block; the pipeline calls them from `spawn_blocking`.
pub trait LegacyConverter: Send + Sync {
    /// Human-readable name for logs and `Debug` output.
    fn name(&self) -> &str;

    /// Write a `.docx` equivalent of `source` inside `work_dir` and return its
    /// path. `work_dir` exists and is removed by the caller afterwards.
    fn convert(&self, source: &Path, work_dir: &Path) -> Result<PathBuf, FileError>;
}

/// [`LegacyConverter`] backed by an installed LibreOffice or `textutil`.
#[derive(Debug, Clone)]
pub struct OfficeHostConverter {
    host: OfficeHost,
    name: String,
}

impl OfficeHostConverter {
    /// Locate a host application on this machine.
    pub fn detect() -> Result<Self, OfficeHostError> {
        OfficeHost::detect().map(Self::new)
    }

    /// Use an explicit host executable.
    pub fn from_program(program: impl Into<PathBuf>) -> Self {
        Self::new(OfficeHost::from_program(program))
    }

    fn new(host: OfficeHost) -> Self {
        let name = host.program().display().to_string();
        Self { host, name }
    }
}

impl LegacyConverter for OfficeHostConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert(&self, source: &Path, work_dir: &Path) -> Result<PathBuf, FileError> {
        self.host
            .convert_to_docx(source, work_dir)
            .map_err(|e| match e {
                OfficeHostError::Spawn { .. } | OfficeHostError::NotFound { .. } => {
                    FileError::ConversionUnavailable {
                        file: display_name(source),
                        reason: e.to_string(),
                    }
                }
                other => FileError::CorruptOrUnreadable {
                    file: display_name(source),
                    detail: other.to_string(),
                },
            })
    }
}

/// Extract the text of a legacy `.doc`.
///
/// Fails with `ConversionUnavailable` when no converter is configured, and
/// with `CorruptOrUnreadable` when the file is not an OLE2 container or the
/// host rejects it.
pub fn extract_legacy(
    path: &Path,
    converter: Option<&dyn LegacyConverter>,
) -> Result<String, FileError> {
    let converter = converter.ok_or_else(|| FileError::ConversionUnavailable {
        file: display_name(path),
        reason: "no word-processing host configured".into(),
    })?;

    check_signature(path)?;

    let scratch = scratch_dir_for(path)?;
    debug!(
        "Converting {} via {} in {}",
        path.display(),
        converter.name(),
        scratch.path().display()
    );
    let docx_path = converter.convert(path, scratch.path())?;
    // `scratch` drops on return and removes the intermediate.
    docx::extract_docx(&docx_path).map_err(|e| rename_file(e, path))
}

/// Reject files that do not start with the OLE2 signature.
fn check_signature(path: &Path) -> Result<(), FileError> {
    let mut header = [0u8; 8];
    std::fs::File::open(path)
        .and_then(|mut f| f.read_exact(&mut header))
        .map_err(|e| FileError::CorruptOrUnreadable {
            file: display_name(path),
            detail: format!("cannot read header: {e}"),
        })?;
    if header != CFB_MAGIC {
        return Err(FileError::CorruptOrUnreadable {
            file: display_name(path),
            detail: "not a Word 97-2003 document (missing OLE2 signature)".into(),
        });
    }
    Ok(())
}

fn scratch_dir_for(path: &Path) -> Result<TempDir, FileError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".faq-prep-")
        .tempdir_in(parent)
        .map_err(|e| FileError::ConversionUnavailable {
            file: display_name(path),
            reason: format!("cannot create scratch directory: {e}"),
        })
}

/// Errors from the intermediate `.docx` should name the `.doc` the user owns.
fn rename_file(err: FileError, source: &Path) -> FileError {
    let file = display_name(source);
    match err {
        FileError::ConversionUnavailable { reason, .. } => {
            FileError::ConversionUnavailable { file, reason }
        }
        FileError::CorruptOrUnreadable { detail, .. } => {
            FileError::CorruptOrUnreadable { file, detail }
        }
        FileError::NoContent { .. } => FileError::NoContent { file },
        FileError::WriteFailure { detail, .. } => FileError::WriteFailure { file, detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Writes a fixed `.docx` instead of invoking a host.
    struct FixtureConverter {
        calls: AtomicUsize,
    }

    impl LegacyConverter for FixtureConverter {
        fn name(&self) -> &str {
            "fixture"
        }

        fn convert(&self, source: &Path, work_dir: &Path) -> Result<PathBuf, FileError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let out = work_dir.join(format!(
                "{}.docx",
                source.file_stem().unwrap().to_string_lossy()
            ));
            let file = fs::File::create(&out).unwrap();
            docx_rs::Docx::new()
                .add_paragraph(
                    docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text("Legacy body")),
                )
                .build()
                .pack(file)
                .unwrap();
            Ok(out)
        }
    }

    fn write_cfb(path: &Path) {
        let mut bytes = CFB_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 504]);
        fs::write(path, bytes).unwrap();
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn missing_converter_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.doc");
        write_cfb(&path);
        let err = extract_legacy(&path, None).unwrap_err();
        assert_eq!(err.kind(), "conversion_unavailable");
        assert!(err.to_string().contains("old.doc"));
    }

    #[test]
    fn non_ole_file_is_rejected_before_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.doc");
        fs::write(&path, "just text with a .doc name").unwrap();
        let conv = FixtureConverter {
            calls: AtomicUsize::new(0),
        };
        let err = extract_legacy(&path, Some(&conv)).unwrap_err();
        assert_eq!(err.kind(), "corrupt_or_unreadable");
        assert_eq!(conv.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn converts_and_cleans_up_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minutes.doc");
        write_cfb(&path);
        let conv = FixtureConverter {
            calls: AtomicUsize::new(0),
        };
        let text = extract_legacy(&path, Some(&conv)).unwrap();
        assert!(text.contains("Legacy body"));
        assert_eq!(conv.calls.load(Ordering::SeqCst), 1);
        assert_eq!(entries(dir.path()), vec!["minutes.doc".to_string()]);
    }

    #[test]
    fn existing_sibling_docx_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minutes.doc");
        write_cfb(&path);
        let sibling = dir.path().join("minutes.docx");
        fs::write(&sibling, b"user's own file").unwrap();
        let conv = FixtureConverter {
            calls: AtomicUsize::new(0),
        };
        extract_legacy(&path, Some(&conv)).unwrap();
        assert_eq!(fs::read(&sibling).unwrap(), b"user's own file");
    }

    #[test]
    fn failing_converter_still_cleans_up() {
        struct Failing;
        impl LegacyConverter for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn convert(&self, source: &Path, _work_dir: &Path) -> Result<PathBuf, FileError> {
                Err(FileError::CorruptOrUnreadable {
                    file: display_name(source),
                    detail: "host rejected file".into(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.doc");
        write_cfb(&path);
        let err = extract_legacy(&path, Some(&Failing)).unwrap_err();
        assert!(err.to_string().contains("host rejected file"));
        assert_eq!(entries(dir.path()), vec!["broken.doc".to_string()]);
    }

    #[test]
    fn host_converter_maps_spawn_error_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.doc");
        write_cfb(&path);
        let conv = OfficeHostConverter::from_program(dir.path().join("no-such-soffice"));
        let err = conv.convert(&path, dir.path()).unwrap_err();
        assert_eq!(err.kind(), "conversion_unavailable");
    }
}
