//! Error types for hostblock-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unterminated block for tag '{tag}': open marker at line {line} has no close marker")]
    UnterminatedBlock { tag: String, line: usize },

    #[error("Failed to read input: {0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] std::io::Error),
}
