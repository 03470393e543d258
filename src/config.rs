//! Configuration types for a preprocessing run.
//!
//! All run behaviour is controlled through [`PreprocessConfig`], built via its
//! [`PreprocessConfigBuilder`]. The defaults reproduce the plain behaviour:
//! every recognised format enabled, `<stem>.txt` written next to the source,
//! no legacy host (so `.doc` files fail with `ConversionUnavailable`).

use crate::error::PreprocessError;
use crate::pipeline::legacy::{LegacyConverter, OfficeHostConverter};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Configuration for a preprocessing run.
///
/// Built via [`PreprocessConfig::builder()`] or using
/// [`PreprocessConfig::default()`].
///
/// # Example
/// ```rust
/// use faq_preprocess::{PreprocessConfig, SourceFormat};
///
/// let config = PreprocessConfig::builder()
///     .formats(vec![SourceFormat::ModernDoc, SourceFormat::Markup])
///     .output_extension("txt")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PreprocessConfig {
    /// Directory receiving the text artifacts. `None` (default) writes each
    /// artifact next to its source file.
    pub output_dir: Option<PathBuf>,

    /// Extension of the artifacts, without the dot. Default: `txt`.
    pub output_extension: String,

    /// Formats to convert. Recognised files of a format not listed here are
    /// skipped. Default: all of [`SourceFormat::ALL`].
    pub formats: Vec<SourceFormat>,

    /// Host-backed `.doc` → `.docx` transcoder. `None` (default) makes every
    /// legacy file fail with `ConversionUnavailable`.
    pub legacy_converter: Option<Arc<dyn LegacyConverter>>,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            output_extension: "txt".to_string(),
            formats: SourceFormat::ALL.to_vec(),
            legacy_converter: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for PreprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessConfig")
            .field("output_dir", &self.output_dir)
            .field("output_extension", &self.output_extension)
            .field("formats", &self.formats)
            .field(
                "legacy_converter",
                &self.legacy_converter.as_ref().map(|c| c.name().to_string()),
            )
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn PreprocessProgressCallback>"),
            )
            .finish()
    }
}

impl PreprocessConfig {
    /// Create a new builder for `PreprocessConfig`.
    pub fn builder() -> PreprocessConfigBuilder {
        PreprocessConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether files of `format` should be converted.
    pub fn is_enabled(&self, format: SourceFormat) -> bool {
        self.formats.contains(&format)
    }

    /// Artifact path for `source`: same base name, configured extension, in
    /// the output directory (or next to the source).
    pub fn output_path_for(&self, source: &Path) -> PathBuf {
        let dir = match self.output_dir {
            Some(ref d) => d.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let mut name = source.file_stem().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(&self.output_extension);
        dir.join(name)
    }
}

/// Builder for [`PreprocessConfig`].
pub struct PreprocessConfigBuilder {
    config: PreprocessConfig,
}

impl fmt::Debug for PreprocessConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl PreprocessConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    /// Leading dots are ignored: `".txt"` and `"txt"` are equivalent.
    pub fn output_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.output_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn formats(mut self, formats: Vec<SourceFormat>) -> Self {
        let mut formats = formats;
        formats.sort_unstable();
        formats.dedup();
        self.config.formats = formats;
        self
    }

    pub fn legacy_converter(mut self, converter: Arc<dyn LegacyConverter>) -> Self {
        self.config.legacy_converter = Some(converter);
        self
    }

    /// Probe the system for a word-processing host and install it as the
    /// legacy converter. Leaves the converter unset (with a warning) when no
    /// host is installed.
    pub fn detect_legacy_converter(mut self) -> Self {
        match OfficeHostConverter::detect() {
            Ok(converter) => {
                info!("Legacy .doc support via {}", converter.name());
                self.config.legacy_converter = Some(Arc::new(converter));
            }
            Err(e) => {
                warn!("Legacy .doc files will fail: {}", e);
                self.config.legacy_converter = None;
            }
        }
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PreprocessConfig, PreprocessError> {
        let c = &self.config;
        let ext = c.output_extension.as_str();
        if ext.is_empty() {
            return Err(PreprocessError::InvalidConfig(
                "Output extension must not be empty".into(),
            ));
        }
        if ext.contains(['/', '\\']) {
            return Err(PreprocessError::InvalidConfig(format!(
                "Output extension must not contain path separators, got '{ext}'"
            )));
        }
        // Writing `<stem>.docx` next to `<stem>.docx` would clobber the source.
        if SourceFormat::from_extension(ext).is_some() {
            return Err(PreprocessError::InvalidConfig(format!(
                "Output extension '{ext}' collides with a source format"
            )));
        }
        if c.formats.is_empty() {
            return Err(PreprocessError::InvalidConfig(
                "At least one source format must be enabled".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// A recognised source format.
///
/// | Variant | Extension | Converter |
/// |---------|-----------|-----------|
/// | `LegacyDoc` | `.doc` | host application → `.docx` → ModernDoc |
/// | `ModernDoc` | `.docx` | docx-rs paragraphs and tables |
/// | `Markup` | `.html` | scraper, script/style removed |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceFormat {
    LegacyDoc,
    ModernDoc,
    Markup,
}

impl SourceFormat {
    /// Every recognised format.
    pub const ALL: [SourceFormat; 3] = [
        SourceFormat::LegacyDoc,
        SourceFormat::ModernDoc,
        SourceFormat::Markup,
    ];

    /// Case-insensitive lookup of an extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "doc" => Some(SourceFormat::LegacyDoc),
            "docx" => Some(SourceFormat::ModernDoc),
            "html" => Some(SourceFormat::Markup),
            _ => None,
        }
    }

    /// Canonical extension, lower case, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            SourceFormat::LegacyDoc => "doc",
            SourceFormat::ModernDoc => "docx",
            SourceFormat::Markup => "html",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_enables_everything() {
        let config = PreprocessConfig::default();
        for format in SourceFormat::ALL {
            assert!(config.is_enabled(format));
        }
        assert!(config.legacy_converter.is_none());
        assert_eq!(config.output_extension, "txt");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(SourceFormat::from_extension("DOC"), Some(SourceFormat::LegacyDoc));
        assert_eq!(SourceFormat::from_extension("Docx"), Some(SourceFormat::ModernDoc));
        assert_eq!(SourceFormat::from_extension("HTML"), Some(SourceFormat::Markup));
        assert_eq!(SourceFormat::from_extension("htm"), None);
        assert_eq!(SourceFormat::from_extension("pdf"), None);
    }

    #[test]
    fn output_path_defaults_to_sibling() {
        let config = PreprocessConfig::default();
        let out = config.output_path_for(Path::new("/data/Admissions FAQ.DOCX"));
        assert_eq!(out, Path::new("/data/Admissions FAQ.txt"));
    }

    #[test]
    fn output_path_honours_output_dir_and_extension() {
        let config = PreprocessConfig::builder()
            .output_dir("/corpus")
            .output_extension(".text")
            .build()
            .unwrap();
        let out = config.output_path_for(Path::new("/data/fees.html"));
        assert_eq!(out, Path::new("/corpus/fees.text"));
    }

    #[test]
    fn build_rejects_source_extension() {
        let err = PreprocessConfig::builder()
            .output_extension("docx")
            .build()
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_empty_formats() {
        let err = PreprocessConfig::builder().formats(vec![]).build().unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn build_rejects_separator_in_extension() {
        assert!(PreprocessConfig::builder()
            .output_extension("a/b")
            .build()
            .is_err());
        assert!(PreprocessConfig::builder().output_extension("").build().is_err());
    }

    #[test]
    fn formats_are_deduplicated() {
        let config = PreprocessConfig::builder()
            .formats(vec![SourceFormat::Markup, SourceFormat::Markup])
            .build()
            .unwrap();
        assert_eq!(config.formats, vec![SourceFormat::Markup]);
        assert!(!config.is_enabled(SourceFormat::LegacyDoc));
    }
}
