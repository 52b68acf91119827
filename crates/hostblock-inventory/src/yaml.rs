//! YAML inventory parsing.
//!
//! ```yaml
//! all:
//!   hosts:
//!     top.example.com:
//!   vars:
//!     ntp_server: ntp.example.com
//!   children:
//!     web:
//!       hosts:
//!         a:
//!           ansible_host: 10.0.0.1
//! ```

use serde_yaml::{Mapping, Value};

use crate::error::{Error, Result};
use crate::model::{Inventory, InventoryBuilder};

/// Parse a YAML inventory document.
pub fn parse_yaml(content: &str) -> Result<Inventory> {
    let mut builder = InventoryBuilder::new();
    if content.trim().is_empty() {
        return builder.build();
    }

    let root: Value = serde_yaml::from_str(content)?;

    match &root {
        Value::Null => {}
        Value::Mapping(groups) => {
            for (name, definition) in groups {
                let name = scalar(name, "group name")?;
                load_group(&mut builder, &name, definition)?;
            }
        }
        _ => return Err(structure("top level must be a mapping of groups")),
    }

    builder.build()
}

fn load_group(builder: &mut InventoryBuilder, group: &str, definition: &Value) -> Result<()> {
    builder.add_group(group);

    let entries = match definition {
        Value::Null => return Ok(()),
        Value::Mapping(entries) => entries,
        _ => return Err(structure(format!("group '{group}' must be a mapping"))),
    };

    for (key, value) in entries {
        match key.as_str() {
            Some("hosts") => {
                for (host, vars) in optional_mapping(value, group, "hosts")?.into_iter().flatten() {
                    let host = scalar(host, "host name")?;
                    let vars = variables(vars, &format!("host '{host}'"))?;
                    builder.add_host(group, &host, vars);
                }
            }
            Some("vars") => {
                for (name, value) in variables(value, &format!("vars of group '{group}'"))? {
                    builder.set_group_var(group, &name, &value);
                }
            }
            Some("children") => {
                for (child, child_definition) in optional_mapping(value, group, "children")?.into_iter().flatten()
                {
                    let child = scalar(child, "group name")?;
                    builder.add_child(group, &child);
                    load_group(builder, &child, child_definition)?;
                }
            }
            _ => {
                return Err(structure(format!(
                    "unexpected key {} in group '{group}'",
                    describe(key)
                )));
            }
        }
    }

    Ok(())
}

fn optional_mapping<'a>(value: &'a Value, group: &str, key: &str) -> Result<Option<&'a Mapping>> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(mapping) => Ok(Some(mapping)),
        _ => Err(structure(format!("'{key}' of group '{group}' must be a mapping"))),
    }
}

fn variables(value: &Value, context: &str) -> Result<Vec<(String, String)>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Mapping(vars) => vars
            .iter()
            .map(|(name, value)| Ok::<_, Error>((scalar(name, "variable name")?, render(value)?)))
            .collect(),
        _ => Err(structure(format!("{context} must be a mapping of variables"))),
    }
}

/// A scalar key as text.
fn scalar(value: &Value, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(structure(format!("{what} must be a scalar, found {}", describe(value)))),
    }
}

/// A variable value as text. Nested structures are kept as inline YAML.
fn render(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{s}'"),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(_) => "a tagged value".to_string(),
    }
}

fn structure(message: impl Into<String>) -> Error {
    Error::YamlStructure {
        message: message.into(),
    }
}
