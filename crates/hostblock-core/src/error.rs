//! Error types for hostblock-core

use std::path::PathBuf;

/// Result type for hostblock-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can stop a run. The target file is unchanged unless the
/// variant says otherwise.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Inventory file missing or unreadable
    #[error("Can't read inventory {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: hostblock_fs::Error,
    },

    /// Inventory file is malformed
    #[error("Inventory parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hostblock_inventory::Error,
    },

    /// Requested group is not in the inventory
    #[error("Group '{group}' not found in inventory {path}")]
    GroupNotFound { group: String, path: PathBuf },

    /// Target file missing or unreadable
    #[error("Can't read target file {path}: {source}")]
    TargetRead {
        path: PathBuf,
        #[source]
        source: hostblock_fs::Error,
    },

    /// Intermediate file could not be created or written
    #[error("Can't write replacement for {path}: {source}")]
    TargetWrite {
        path: PathBuf,
        #[source]
        source: hostblock_fs::Error,
    },

    /// Target has an open marker with no close marker
    #[error("Unterminated block '{tag}' in {path}: open marker at line {line} has no close marker")]
    UnterminatedBlock {
        path: PathBuf,
        tag: String,
        line: usize,
    },

    /// The intermediate file is complete but could not replace the target.
    /// Both files are left on disk.
    #[error("Can't replace {target} with {intermediate}: {source}")]
    Replace {
        target: PathBuf,
        intermediate: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be loaded
    #[error("Invalid settings: {0}")]
    Config(#[source] hostblock_fs::Error),

    /// A required setting was given neither on the command line nor in a settings file
    #[error("Missing required setting '{name}'")]
    MissingSetting { name: &'static str },
}
