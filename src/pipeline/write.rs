//! Atomic artifact writer.
//!
//! The text goes to a named temporary file in the destination directory,
//! which is flushed and then renamed over the target. A crash or a full disk
//! therefore leaves either the previous artifact or the new one, never a
//! truncated file, and the temporary is removed when it is dropped unpersisted.

use crate::error::FileError;
use crate::pipeline::display_name;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `text` to `target` as UTF-8 (no BOM), replacing any existing file.
///
/// `source` only names the file in the error.
pub fn write_atomic(target: &Path, text: &str, source: &Path) -> Result<(), FileError> {
    let fail = |detail: String| FileError::WriteFailure {
        file: display_name(source),
        detail,
    };

    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| fail(format!("{}: {e}", dir.display())))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| fail(format!("{}: {e}", dir.display())))?;
    tmp.write_all(text.as_bytes())
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| fail(e.to_string()))?;
    tmp.persist(target)
        .map_err(|e| fail(format!("{}: {}", target.display(), e.error)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn writes_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("faq.txt");
        write_atomic(&target, "first", Path::new("faq.docx")).unwrap();
        write_atomic(&target, "second", Path::new("faq.docx")).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("corpus").join("faq.txt");
        write_atomic(&target, "ok", Path::new("faq.html")).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "ok");
    }

    #[test]
    fn no_bom_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a.txt");
        write_atomic(&target, "Hello", Path::new("a.html")).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"Hello");
    }

    #[test]
    fn failed_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the artifact should go makes the rename fail.
        let target = dir.path().join("blocked.txt");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        let err = write_atomic(&target, "text", Path::new("blocked.docx")).unwrap_err();
        assert_eq!(err.kind(), "write_failure");
        assert!(err.to_string().contains("blocked.docx"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
