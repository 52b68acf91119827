//! The narrow view of an inventory that extraction relies on.

use crate::model::Inventory;

/// Read-only access to inventory groups and host variables.
///
/// Implemented by [`Inventory`]; any other backend (a different parser, a
/// dynamic inventory, a test fixture) only has to answer these four queries.
pub trait InventorySource {
    /// Names of all groups.
    fn group_names(&self) -> Vec<&str>;

    /// Whether a group with this exact name exists.
    fn has_group(&self, group: &str) -> bool;

    /// Host names of a group in inventory order, or `None` if the group does
    /// not exist.
    fn group_hosts(&self, group: &str) -> Option<Vec<&str>>;

    /// A host variable, or `None` if the host or the variable is absent.
    fn host_var(&self, host: &str, var: &str) -> Option<&str>;
}

impl InventorySource for Inventory {
    fn group_names(&self) -> Vec<&str> {
        self.groups().map(|group| group.name()).collect()
    }

    fn has_group(&self, group: &str) -> bool {
        self.group(group).is_some()
    }

    fn group_hosts(&self, group: &str) -> Option<Vec<&str>> {
        self.group(group)
            .map(|group| group.hosts().iter().map(String::as_str).collect())
    }

    fn host_var(&self, host: &str, var: &str) -> Option<&str> {
        self.host(host).and_then(|host| host.var(var))
    }
}
