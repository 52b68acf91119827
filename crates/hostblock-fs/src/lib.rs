//! Filesystem primitives for hostblock
//!
//! Whole-file text reads, the `+`-suffixed intermediate file used to replace
//! a target by rename, and format-detecting settings loading.

pub mod config;
pub mod error;
pub mod io;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use io::{SiblingFile, sibling_path};
