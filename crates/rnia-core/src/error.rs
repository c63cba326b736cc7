//! Error taxonomy for the scaffolding core
//!
//! Each phase owns its own error type; the pipeline folds them into
//! [`ScaffoldError`]. Validation of user input happens at the prompt
//! boundary and never reaches these types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while retrieving or extracting the template archive.
///
/// All variants are fatal to the fetch phase. The scratch directory is
/// removed before any of these surface to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to download template: HTTP {0}")]
    HttpStatus(u16),

    #[error("template missing required entry: {0}")]
    IncompleteTemplate(String),

    #[error("invalid template URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to download template: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures while running an external executable.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("{program} exited with status {code}")]
    NonZeroExit { program: String, code: i32 },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while reading, parsing, or writing a manifest document.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest not found: {0}")]
    Missing(PathBuf),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any fatal pipeline failure. Aborts the remaining steps immediately; the
/// only locally recovered failure is the best-effort version control step,
/// which never produces one of these.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
