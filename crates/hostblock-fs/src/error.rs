//! Error types for hostblock-fs

use std::path::PathBuf;

/// Result type for hostblock-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Filesystem and settings-loading failures
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading, creating or writing `path` failed
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings file exists but does not deserialize
    #[error("{path} is not valid {format}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    /// Settings file extension is not toml, json, yaml or yml
    #[error("Unsupported settings file extension '{extension}'")]
    UnsupportedFormat { extension: String },

    /// The intermediate file could not be locked or unlocked
    #[error("Can't lock intermediate file {path}")]
    LockFailed { path: PathBuf },

    /// The intermediate file is complete but could not be moved over the target.
    /// Both files are left on disk.
    #[error("Failed to move {intermediate} over {target}: {source}")]
    Replace {
        target: PathBuf,
        intermediate: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Attach the path an I/O error happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
