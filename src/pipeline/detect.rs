//! Format detection and input discovery.

use crate::config::SourceFormat;
use crate::error::PreprocessError;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Map a path to its source format by final extension, case-insensitively.
///
/// `None` means unsupported (including names without an extension).
pub fn detect_format(path: &Path) -> Option<SourceFormat> {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension)
}

/// List the regular, non-hidden files directly inside `dir`, sorted by name.
///
/// Subdirectories are not descended into. This is the only step of a run
/// whose failure is fatal.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>, PreprocessError> {
    let meta = std::fs::metadata(dir).map_err(|e| map_io(dir, e))?;
    if !meta.is_dir() {
        return Err(PreprocessError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| map_io(dir, e))? {
        let entry = entry.map_err(|e| map_io(dir, e))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        // Follows symlinks, so a link to a regular file counts.
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("Discovered {} files in {}", files.len(), dir.display());

    warn_on_collisions(&files);
    Ok(files)
}

fn map_io(dir: &Path, e: std::io::Error) -> PreprocessError {
    let path = dir.to_path_buf();
    match e.kind() {
        ErrorKind::NotFound => PreprocessError::InputDirNotFound { path },
        ErrorKind::PermissionDenied => PreprocessError::PermissionDenied { path },
        _ => PreprocessError::ReadDirFailed { path, source: e },
    }
}

/// Two supported sources with the same stem write the same artifact.
fn warn_on_collisions(files: &[PathBuf]) {
    let mut seen: HashMap<String, &Path> = HashMap::new();
    for path in files.iter().filter(|p| detect_format(p).is_some()) {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Some(previous) = seen.insert(stem, path) {
            warn!(
                "{} and {} produce the same output file; {} wins",
                previous.display(),
                path.display(),
                path.display()
            );
        }
    }
}
