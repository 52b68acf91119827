//! Error types for hostblock-inventory

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid YAML inventory: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid YAML inventory: {message}")]
    YamlStructure { message: String },

    #[error("Group '{group}' is its own descendant")]
    ChildCycle { group: String },

    #[error("Group not found: {group}")]
    GroupNotFound { group: String },
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
