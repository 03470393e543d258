//! # office-host
//!
//! Find an installed word-processing host application and use it to transcode
//! legacy Word 97-2003 `.doc` files into `.docx`, so that callers only ever
//! have to parse the XML-based format.
//!
//! ## How it works
//!
//! [`OfficeHost::detect`] probes, in order:
//!
//! 1. `OFFICE_HOST_PATH`: an explicit path to `soffice` or `textutil`.
//! 2. `/usr/bin/textutil` (macOS only, ships with the OS).
//! 3. `soffice` / `libreoffice` on `PATH`.
//! 4. The per-user executable directory (e.g. `~/.local/bin`).
//! 5. Well-known LibreOffice install locations for the current platform.
//!
//! The first hit wins. [`OfficeHost::convert_to_docx`] then runs the host
//! synchronously and returns the path of the produced `.docx`.
//!
//! ```rust,no_run
//! use office_host::OfficeHost;
//! use std::path::Path;
//!
//! let host = OfficeHost::detect().expect("no word-processing host installed");
//! let docx = host
//!     .convert_to_docx(Path::new("minutes.doc"), Path::new("/tmp/scratch"))
//!     .expect("conversion failed");
//! println!("converted to {}", docx.display());
//! ```
//!
//! ## Platform support
//!
//! | OS      | Host                         | Command                                   |
//! |---------|------------------------------|-------------------------------------------|
//! | macOS   | `textutil` (built in)        | `textutil -convert docx IN -output OUT`   |
//! | any     | LibreOffice `soffice`        | `soffice --headless --convert-to docx …`  |
//!
//! There is no timeout: a hung host blocks the caller.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

// ── Public constants ─────────────────────────────────────────────────────────

/// Environment variable holding an explicit host executable path.
pub const HOST_PATH_ENV: &str = "OFFICE_HOST_PATH";

/// macOS ships `textutil`, which reads `.doc` and writes `.docx`.
const TEXTUTIL_PATH: &str = "/usr/bin/textutil";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned by office-host operations.
#[derive(Error, Debug)]
pub enum OfficeHostError {
    /// No host application was found in any probed location.
    #[error("No word-processing host found (searched {} locations). Install LibreOffice or set OFFICE_HOST_PATH.", .searched.len())]
    NotFound { searched: Vec<PathBuf> },

    /// The input cannot be handed to the host.
    #[error("Invalid input '{path}': {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    /// The host process could not be started.
    #[error("Failed to launch '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host ran but reported failure.
    #[error("'{program}' exited with {status}: {stderr}")]
    ConversionFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// The host reported success but the expected file is absent.
    #[error("Host finished but produced no output at '{expected}'")]
    MissingOutput { expected: PathBuf },
}

// ── Host detection ───────────────────────────────────────────────────────────

/// Which family of host application a program belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    /// LibreOffice / OpenOffice `soffice` in headless mode.
    LibreOffice,
    /// macOS `textutil`.
    TextUtil,
}

/// A located host application able to write `.docx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfficeHost {
    program: PathBuf,
    kind: HostKind,
}

impl OfficeHost {
    /// Probe the system for a host application.
    ///
    /// See the crate docs for the probe order.
    pub fn detect() -> Result<Self, OfficeHostError> {
        Self::detect_among(search_locations())
    }

    /// First existing file in `candidates`, in order.
    fn detect_among(candidates: Vec<PathBuf>) -> Result<Self, OfficeHostError> {
        if let Some(found) = candidates.iter().find(|p| p.is_file()) {
            return Ok(Self::from_program(found.clone()));
        }
        Err(OfficeHostError::NotFound {
            searched: candidates,
        })
    }

    /// Wrap an explicit executable path. The host kind is inferred from the
    /// file name (`textutil` → [`HostKind::TextUtil`], anything else is driven
    /// with LibreOffice arguments).
    pub fn from_program(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let kind = host_kind_for(&program);
        Self { program, kind }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn kind(&self) -> HostKind {
        self.kind
    }

    /// Transcode `input` (a `.doc`) into `out_dir/<stem>.docx`.
    ///
    /// `out_dir` must exist. The call blocks until the host exits.
    pub fn convert_to_docx(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, OfficeHostError> {
        if !input.is_file() {
            return Err(OfficeHostError::InvalidInput {
                path: input.to_path_buf(),
                reason: "not a readable file".into(),
            });
        }
        if !out_dir.is_dir() {
            return Err(OfficeHostError::InvalidInput {
                path: out_dir.to_path_buf(),
                reason: "output directory does not exist".into(),
            });
        }

        let expected = expected_output(input, out_dir)?;
        let mut cmd = Command::new(&self.program);
        match self.kind {
            HostKind::LibreOffice => {
                cmd.arg("--headless")
                    .arg("--norestore")
                    .arg("--convert-to")
                    .arg("docx")
                    .arg("--outdir")
                    .arg(out_dir)
                    .arg(input);
            }
            HostKind::TextUtil => {
                cmd.arg("-convert")
                    .arg("docx")
                    .arg(input)
                    .arg("-output")
                    .arg(&expected);
            }
        }

        let output = cmd.output().map_err(|source| OfficeHostError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(OfficeHostError::ConversionFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // soffice exits 0 even when it silently refuses a file.
        if !expected.is_file() {
            return Err(OfficeHostError::MissingOutput { expected });
        }

        Ok(expected)
    }
}

/// Ordered list of every location [`OfficeHost::detect`] probes.
pub fn search_locations() -> Vec<PathBuf> {
    locations_with_override(std::env::var_os(HOST_PATH_ENV))
}

// ── Internal helpers ─────────────────────────────────────────────────────────

fn locations_with_override(override_path: Option<OsString>) -> Vec<PathBuf> {
    let mut out = Vec::new();

    if let Some(p) = override_path.filter(|v| !v.is_empty()) {
        out.push(PathBuf::from(p));
    }

    if cfg!(target_os = "macos") {
        out.push(PathBuf::from(TEXTUTIL_PATH));
    }

    let path_var = std::env::var_os("PATH").unwrap_or_else(OsString::new);
    for dir in std::env::split_paths(&path_var) {
        for name in candidate_names() {
            out.push(dir.join(name));
        }
    }

    if let Some(dir) = dirs::executable_dir() {
        for name in candidate_names() {
            out.push(dir.join(name));
        }
    }

    out.extend(well_known_locations());
    out
}

fn candidate_names() -> &'static [&'static str] {
    if cfg!(windows) {
        &["soffice.exe", "libreoffice.exe"]
    } else {
        &["soffice", "libreoffice"]
    }
}

fn well_known_locations() -> Vec<PathBuf> {
    let raw: &[&str] = match std::env::consts::OS {
        "macos" => &["/Applications/LibreOffice.app/Contents/MacOS/soffice"],
        "windows" => &[
            r"C:\Program Files\LibreOffice\program\soffice.exe",
            r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
        ],
        _ => &[
            "/usr/lib/libreoffice/program/soffice",
            "/opt/libreoffice/program/soffice",
            "/snap/bin/libreoffice",
        ],
    };
    raw.iter().map(PathBuf::from).collect()
}

fn host_kind_for(program: &Path) -> HostKind {
    let stem = program
        .file_stem()
        .map(|s| s.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if stem == "textutil" {
        HostKind::TextUtil
    } else {
        HostKind::LibreOffice
    }
}

fn expected_output(input: &Path, out_dir: &Path) -> Result<PathBuf, OfficeHostError> {
    let stem = input
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| OfficeHostError::InvalidInput {
            path: input.to_path_buf(),
            reason: "file name has no stem".into(),
        })?;
    let mut name = stem.to_os_string();
    name.push(".docx");
    Ok(out_dir.join(name))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
