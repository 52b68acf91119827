//! Tag-delimited block patching for hostblock.
//!
//! A managed block is the run of lines between an open and a close marker
//! derived from a tag:
//!
//! ```text
//! # TAG: web {{{
//! 10.0.0.1	a
//! # TAG: web }}}
//! ```
//!
//! The comment prefix (`#` above) is configurable; `###` reproduces the
//! markers written by older tooling. Markers are compared byte-for-byte
//! against whole lines, with no trimming.
//!
//! - [`writer`] replaces or appends a block in a single linear pass, either
//!   over a slice of lines ([`patch_lines`]) or streaming between a reader
//!   and a writer ([`patch_stream`]).
//! - [`parser`] scans text for existing blocks.

pub mod error;
pub mod marker;
pub mod parser;
pub mod writer;

pub use error::{Error, Result};
pub use marker::{DEFAULT_COMMENT_PREFIX, Markers};
pub use parser::{Block, find_block, has_block, parse_blocks};
pub use writer::{
    BlockPatcher, Finish, PatchOutcome, Step, UnterminatedPolicy, patch_lines, patch_stream,
    render,
};
