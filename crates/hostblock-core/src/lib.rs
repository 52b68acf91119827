//! Inventory-to-hosts-file orchestration for hostblock
//!
//! Reads one group from an Ansible inventory and writes its hosts as
//! `address<TAB>hostname` lines into a tagged block of a target file,
//! replacing the target through an intermediate `+` file.
//!
//! ```text
//!                 hostblock-cli
//!                       |
//!                hostblock-core
//!                       |
//!     +-----------------+------------------+
//!     |                 |                  |
//! hostblock-fs   hostblock-blocks   hostblock-inventory
//! ```
//!
//! # Example
//!
//! ```no_run
//! use hostblock_core::{SyncConfig, sync};
//!
//! let config = SyncConfig::new("inventory.ini", "web", "/etc/hosts", "web");
//! let report = sync(&config)?;
//! println!("{} hosts written", report.hosts);
//! # Ok::<(), hostblock_core::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod sync;

pub use config::{EmptyPolicy, SyncConfig, SyncSettings};
pub use error::{Error, Result};
pub use sync::{Preview, SyncOutcome, SyncReport, load_body, preview, sync};
