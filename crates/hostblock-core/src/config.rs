//! Run configuration.
//!
//! [`SyncConfig`] is the complete, validated configuration for one run and is
//! passed explicitly to [`crate::sync`] and [`crate::preview`]. [`SyncSettings`]
//! is its partial form, as read from a settings file or built from
//! command-line flags; layers are combined with [`SyncSettings::merge`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hostblock_blocks::{DEFAULT_COMMENT_PREFIX, Markers, UnterminatedPolicy};
use hostblock_fs::ConfigStore;
use hostblock_inventory::{ADDRESS_VAR, ExtractOptions, InventoryFormat, MISSING_ADDRESS};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What to do when the group has no hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Leave the target file alone and report success.
    #[default]
    Skip,
    /// Write an empty tagged block.
    Write,
}

impl fmt::Display for EmptyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Write => write!(f, "write"),
        }
    }
}

impl FromStr for EmptyPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "write" => Ok(Self::Write),
            other => Err(format!("unknown empty policy '{other}' (expected skip or write)")),
        }
    }
}

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Inventory document to read.
    pub inventory: PathBuf,
    /// Inventory format, or `Auto` to detect.
    pub inventory_format: InventoryFormat,
    /// Group whose hosts are written.
    pub group: String,
    /// File holding the tagged block.
    pub target: PathBuf,
    /// Tag naming the block.
    pub tag: String,
    /// Comment prefix of the marker lines.
    pub comment_prefix: String,
    /// Address variable and missing-address text.
    pub extract: ExtractOptions,
    /// Behavior for a group with no hosts.
    pub on_empty: EmptyPolicy,
    /// Behavior for an open marker with no close marker.
    pub on_unterminated: UnterminatedPolicy,
}

impl SyncConfig {
    /// Configuration with every policy at its default.
    pub fn new(
        inventory: impl Into<PathBuf>,
        group: impl Into<String>,
        target: impl Into<PathBuf>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            inventory: inventory.into(),
            inventory_format: InventoryFormat::default(),
            group: group.into(),
            target: target.into(),
            tag: tag.into(),
            comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
            extract: ExtractOptions::default(),
            on_empty: EmptyPolicy::default(),
            on_unterminated: UnterminatedPolicy::default(),
        }
    }

    /// The marker pair for this run's tag.
    pub fn markers(&self) -> Markers {
        Markers::with_prefix(&self.comment_prefix, &self.tag)
    }
}

/// Partial configuration. Every field is optional.
///
/// ```toml
/// inventory = "inventory/prod.ini"
/// group = "web"
/// target = "/etc/hosts"
/// tag = "web"
/// comment_prefix = "###"
/// on_empty = "write"
/// on_unterminated = "truncate"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    pub inventory: Option<PathBuf>,
    pub inventory_format: Option<InventoryFormat>,
    pub group: Option<String>,
    pub target: Option<PathBuf>,
    pub tag: Option<String>,
    pub comment_prefix: Option<String>,
    pub address_var: Option<String>,
    pub missing_address: Option<String>,
    pub on_empty: Option<EmptyPolicy>,
    pub on_unterminated: Option<UnterminatedPolicy>,
}

impl SyncSettings {
    /// Load settings from a TOML, JSON or YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let settings: Self = ConfigStore::new().load(path).map_err(Error::Config)?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    /// Combine two layers; values set in `overrides` win.
    pub fn merge(self, overrides: SyncSettings) -> SyncSettings {
        SyncSettings {
            inventory: overrides.inventory.or(self.inventory),
            inventory_format: overrides.inventory_format.or(self.inventory_format),
            group: overrides.group.or(self.group),
            target: overrides.target.or(self.target),
            tag: overrides.tag.or(self.tag),
            comment_prefix: overrides.comment_prefix.or(self.comment_prefix),
            address_var: overrides.address_var.or(self.address_var),
            missing_address: overrides.missing_address.or(self.missing_address),
            on_empty: overrides.on_empty.or(self.on_empty),
            on_unterminated: overrides.on_unterminated.or(self.on_unterminated),
        }
    }

    /// Fill in defaults and check that the required settings are present.
    ///
    /// # Errors
    /// Returns [`Error::MissingSetting`] naming the first of `inventory`,
    /// `group`, `target` or `tag` that is unset.
    pub fn into_config(self) -> Result<SyncConfig> {
        Ok(SyncConfig {
            inventory: self.inventory.ok_or(Error::MissingSetting { name: "inventory" })?,
            inventory_format: self.inventory_format.unwrap_or_default(),
            group: self.group.ok_or(Error::MissingSetting { name: "group" })?,
            target: self.target.ok_or(Error::MissingSetting { name: "target" })?,
            tag: self.tag.ok_or(Error::MissingSetting { name: "tag" })?,
            comment_prefix: self
                .comment_prefix
                .unwrap_or_else(|| DEFAULT_COMMENT_PREFIX.to_string()),
            extract: ExtractOptions {
                address_var: self.address_var.unwrap_or_else(|| ADDRESS_VAR.to_string()),
                missing_address: self
                    .missing_address
                    .unwrap_or_else(|| MISSING_ADDRESS.to_string()),
            },
            on_empty: self.on_empty.unwrap_or_default(),
            on_unterminated: self.on_unterminated.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> SyncSettings {
        SyncSettings {
            inventory: Some("inv.ini".into()),
            group: Some("web".into()),
            target: Some("hosts".into()),
            tag: Some("web".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = required().into_config().unwrap();

        assert_eq!(config, SyncConfig::new("inv.ini", "web", "hosts", "web"));
        assert_eq!(config.markers().open(), "# TAG: web {{{");
        assert_eq!(config.on_empty, EmptyPolicy::Skip);
        assert_eq!(config.on_unterminated, UnterminatedPolicy::Fail);
    }

    #[test]
    fn test_missing_required_setting() {
        let settings = SyncSettings {
            tag: None,
            ..required()
        };

        assert!(matches!(
            settings.into_config(),
            Err(Error::MissingSetting { name: "tag" })
        ));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = SyncSettings {
            comment_prefix: Some("###".into()),
            group: Some("db".into()),
            ..required()
        };
        let flags = SyncSettings {
            group: Some("web".into()),
            ..Default::default()
        };

        let merged = file.merge(flags);

        assert_eq!(merged.group.as_deref(), Some("web"));
        assert_eq!(merged.comment_prefix.as_deref(), Some("###"));
        assert_eq!(merged.tag.as_deref(), Some("web"));
    }

    #[test]
    fn test_empty_policy_from_str() {
        assert_eq!("write".parse::<EmptyPolicy>(), Ok(EmptyPolicy::Write));
        assert!("abort".parse::<EmptyPolicy>().is_err());
    }
}
