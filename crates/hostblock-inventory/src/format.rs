//! Inventory format selection.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::Inventory;
use crate::{ini, yaml};

/// Inventory document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryFormat {
    /// Decide from the file extension, then from the content.
    #[default]
    Auto,
    Ini,
    Yaml,
}

impl InventoryFormat {
    /// Pick a concrete format for a document.
    ///
    /// `.yml`/`.yaml` mean YAML and `.ini`/`.cfg` mean INI. Otherwise a
    /// document starting with `---` or `all:` is YAML and anything else INI.
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        let extension = path
            .and_then(Path::extension)
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "yml" | "yaml" => Self::Yaml,
            "ini" | "cfg" => Self::Ini,
            _ => {
                let content = content.trim_start();
                if content.starts_with("---") || content.starts_with("all:") {
                    Self::Yaml
                } else {
                    Self::Ini
                }
            }
        }
    }

    /// This format, or the detected one when [`InventoryFormat::Auto`].
    pub fn resolve(self, path: Option<&Path>, content: &str) -> Self {
        match self {
            Self::Auto => Self::detect(path, content),
            concrete => concrete,
        }
    }
}

impl fmt::Display for InventoryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Ini => write!(f, "ini"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

impl FromStr for InventoryFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "ini" => Ok(Self::Ini),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!(
                "unknown inventory format '{other}' (expected auto, ini or yaml)"
            )),
        }
    }
}

/// Parse an inventory document. [`InventoryFormat::Auto`] looks at the content only.
pub fn parse_inventory(content: &str, format: InventoryFormat) -> Result<Inventory> {
    match format.resolve(None, content) {
        InventoryFormat::Yaml => yaml::parse_yaml(content),
        InventoryFormat::Ini | InventoryFormat::Auto => ini::parse_ini(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(
            InventoryFormat::detect(Some(Path::new("hosts.YML")), "[web]"),
            InventoryFormat::Yaml
        );
        assert_eq!(
            InventoryFormat::detect(Some(Path::new("hosts.ini")), "all:"),
            InventoryFormat::Ini
        );
    }

    #[test]
    fn test_detect_by_content() {
        assert_eq!(
            InventoryFormat::detect(Some(Path::new("hosts")), "---\nall:\n"),
            InventoryFormat::Yaml
        );
        assert_eq!(InventoryFormat::detect(None, "[web]\na\n"), InventoryFormat::Ini);
    }

    #[test]
    fn test_explicit_format_wins() {
        assert_eq!(
            InventoryFormat::Ini.resolve(Some(Path::new("hosts.yml")), ""),
            InventoryFormat::Ini
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("YAML".parse::<InventoryFormat>(), Ok(InventoryFormat::Yaml));
        assert!("toml".parse::<InventoryFormat>().is_err());
    }
}
