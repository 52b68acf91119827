//! Turning one inventory group into `address<TAB>hostname` lines.

use std::fmt;

use crate::error::{Error, Result};
use crate::source::InventorySource;

/// Host variable read as the address.
pub const ADDRESS_VAR: &str = "ansible_host";
/// Written in place of an absent or blank address.
pub const MISSING_ADDRESS: &str = "# no ip";

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Variable holding each host's address.
    pub address_var: String,
    /// Text used when the address is absent or blank.
    pub missing_address: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            address_var: ADDRESS_VAR.to_string(),
            missing_address: MISSING_ADDRESS.to_string(),
        }
    }
}

/// One output line: `<address>\t<hostname>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLine {
    pub address: String,
    pub hostname: String,
}

impl fmt::Display for HostLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.address, self.hostname)
    }
}

/// The host lines of one group, in group order. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockBody {
    lines: Vec<HostLine>,
}

impl BlockBody {
    pub fn lines(&self) -> &[HostLine] {
        &self.lines
    }

    /// Number of host lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The body text: every host line terminated with `\n`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BlockBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Build the block body for `group`.
///
/// Hosts keep the order the inventory gives them. An address that is absent
/// or blank after trimming becomes `options.missing_address`; a present
/// address is written as-is.
///
/// # Errors
/// Returns [`Error::GroupNotFound`] if the inventory has no such group.
///
/// # Example
/// ```
/// use hostblock_inventory::{ExtractOptions, InventoryFormat, extract, parse_inventory};
///
/// let inventory = parse_inventory("[web]\na ansible_host=10.0.0.1\nb\n", InventoryFormat::Ini).unwrap();
/// let body = extract(&inventory, "web", &ExtractOptions::default()).unwrap();
/// assert_eq!(body.render(), "10.0.0.1\ta\n# no ip\tb\n");
/// assert_eq!(body.len(), 2);
/// ```
pub fn extract<S>(source: &S, group: &str, options: &ExtractOptions) -> Result<BlockBody>
where
    S: InventorySource + ?Sized,
{
    let hosts = source
        .group_hosts(group)
        .ok_or_else(|| Error::GroupNotFound {
            group: group.to_string(),
        })?;

    let lines = hosts
        .into_iter()
        .map(|host| {
            let address = match source.host_var(host, &options.address_var) {
                Some(address) if !address.trim().is_empty() => address.to_string(),
                _ => {
                    tracing::debug!(host, var = %options.address_var, "No address for host");
                    options.missing_address.clone()
                }
            };
            HostLine {
                address,
                hostname: host.to_string(),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(group, hosts = lines.len(), "Extracted host lines");
    Ok(BlockBody { lines })
}
