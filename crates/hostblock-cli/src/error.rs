//! Error types for hostblock-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Anything that ends a `hostblock` invocation with a non-zero exit status
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// A failed run
    #[error(transparent)]
    Core(#[from] hostblock_core::Error),

    /// Bad invocation, reported as-is
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Report a usage problem to the user
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
