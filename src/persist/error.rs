//! Errors for reading and writing artifacts.

use std::io;

/// Errors that can occur when reading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported artifact format '{0}'")]
    UnsupportedFormat(String),

    #[error("unsupported schema version {found} (this build reads version {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("expected a {expected} artifact, found {found}")]
    WrongKind { expected: String, found: String },

    #[error("validation failed: {0}")]
    Validation(String),
}

/// Errors that can occur when writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not move {path} into place: {source}")]
    Replace {
        path: std::path::PathBuf,
        #[source]
        source: io::Error,
    },
}
