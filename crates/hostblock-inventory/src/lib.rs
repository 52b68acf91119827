//! Ansible inventory parsing and host extraction for hostblock.
//!
//! Inventories are read into an [`Inventory`] (INI or YAML), but extraction
//! only goes through the narrow [`InventorySource`] trait so other inventory
//! backends can be plugged in.

pub mod error;
pub mod extract;
pub mod format;
pub mod ini;
pub mod model;
pub mod source;
pub mod yaml;

pub use error::{Error, Result};
pub use extract::{ADDRESS_VAR, BlockBody, ExtractOptions, HostLine, MISSING_ADDRESS, extract};
pub use format::{InventoryFormat, parse_inventory};
pub use model::{Group, Host, Inventory, InventoryBuilder};
pub use source::InventorySource;
