//! The end-to-end run: inventory group in, tagged block out.

use std::path::{Path, PathBuf};

use hostblock_blocks::{Block, Finish, parse_blocks, patch_stream};
use hostblock_fs::{SiblingFile, io, sibling_path};
use hostblock_inventory::{BlockBody, extract, parse_inventory};
use similar::TextDiff;
use tracing::{debug, info, warn};

use crate::config::{EmptyPolicy, SyncConfig};
use crate::error::{Error, Result};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The group was empty and the empty policy is `skip`; target untouched.
    Skipped,
    /// An existing block was rewritten in place.
    Replaced,
    /// No block existed; one was appended.
    Appended,
    /// An unterminated block swallowed the rest of the file (legacy policy).
    Truncated,
}

impl From<Finish> for SyncOutcome {
    fn from(finish: Finish) -> Self {
        match finish {
            Finish::Done => Self::Replaced,
            Finish::AppendBlock => Self::Appended,
            Finish::Truncated => Self::Truncated,
        }
    }
}

/// Report from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Host lines in the block.
    pub hosts: usize,
    pub outcome: SyncOutcome,
}

/// A run computed in memory without touching the target.
#[derive(Debug, Clone)]
pub struct Preview {
    pub target: PathBuf,
    pub report: SyncReport,
    /// Target text as read.
    pub original: String,
    /// Target text as a run would write it.
    pub patched: String,
    /// Blocks already present in the target, any tag.
    pub existing: Vec<Block>,
}

impl Preview {
    pub fn is_unchanged(&self) -> bool {
        self.original == self.patched
    }

    /// Unified diff from the current target text to the patched text.
    pub fn unified_diff(&self) -> String {
        let name = self.target.display().to_string();
        TextDiff::from_lines(&self.original, &self.patched)
            .unified_diff()
            .context_radius(3)
            .header(&name, &format!("{name} (patched)"))
            .to_string()
    }
}

/// Read and parse the inventory and extract the configured group.
///
/// # Errors
/// [`Error::SourceRead`], [`Error::Parse`] or [`Error::GroupNotFound`].
pub fn load_body(config: &SyncConfig) -> Result<BlockBody> {
    let path = &config.inventory;
    info!(path = %path.display(), "Start parse file");

    let content = io::read_text(path).map_err(|source| Error::SourceRead {
        path: path.clone(),
        source,
    })?;

    let format = config.inventory_format.resolve(Some(path), &content);
    debug!(%format, "Inventory format");

    let inventory = parse_inventory(&content, format).map_err(|source| Error::Parse {
        path: path.clone(),
        source,
    })?;

    let body = extract(&inventory, &config.group, &config.extract).map_err(|e| match e {
        hostblock_inventory::Error::GroupNotFound { group } => Error::GroupNotFound {
            group,
            path: path.clone(),
        },
        source => Error::Parse {
            path: path.clone(),
            source,
        },
    })?;

    info!(group = %config.group, hosts = body.len(), "Parse complete");
    Ok(body)
}

/// Write the configured group's hosts into the target's tagged block.
///
/// The target is streamed into `<target>+`, which is then renamed over the
/// target. Until that rename the target is never modified; on any earlier
/// failure the intermediate file is removed. If the rename itself fails the
/// complete intermediate file is left next to the target and
/// [`Error::Replace`] is returned.
pub fn sync(config: &SyncConfig) -> Result<SyncReport> {
    let body = load_body(config)?;
    if body.is_empty() && config.on_empty == EmptyPolicy::Skip {
        info!(group = %config.group, "No addresses found in inventory; target left unchanged");
        return Ok(SyncReport {
            hosts: 0,
            outcome: SyncOutcome::Skipped,
        });
    }

    let target = &config.target;
    let reader = io::open_reader(target).map_err(|source| Error::TargetRead {
        path: target.clone(),
        source,
    })?;
    let mut sibling = SiblingFile::create(target).map_err(|source| Error::TargetWrite {
        path: target.clone(),
        source,
    })?;

    let markers = config.markers();
    let text = body.render();
    let outcome = match patch_stream(reader, &mut sibling, &markers, &text, config.on_unterminated)
    {
        Ok(outcome) => outcome,
        Err(error) => {
            if let Err(discard) = sibling.discard() {
                warn!(error = %discard, "Failed to remove intermediate file");
            }
            return Err(patch_error(target, error));
        }
    };
    debug!(lines = outcome.lines_read, "Streamed target file");

    sibling.commit().map_err(|e| match e {
        hostblock_fs::Error::Replace {
            target,
            intermediate,
            source,
        } => Error::Replace {
            target,
            intermediate,
            source,
        },
        source => Error::TargetWrite {
            path: target.clone(),
            source,
        },
    })?;

    let report = SyncReport {
        hosts: body.len(),
        outcome: outcome.finish.into(),
    };
    info!(target = %target.display(), outcome = ?report.outcome, "Hosts file generation complete");
    Ok(report)
}

/// Compute what [`sync`] would write, without writing.
pub fn preview(config: &SyncConfig) -> Result<Preview> {
    let body = load_body(config)?;
    let target = &config.target;

    let original = io::read_text(target).map_err(|source| Error::TargetRead {
        path: target.clone(),
        source,
    })?;
    let existing = parse_blocks(&original);

    if body.is_empty() && config.on_empty == EmptyPolicy::Skip {
        return Ok(Preview {
            target: target.clone(),
            report: SyncReport {
                hosts: 0,
                outcome: SyncOutcome::Skipped,
            },
            patched: original.clone(),
            original,
            existing,
        });
    }

    let mut buffer = Vec::with_capacity(original.len());
    let outcome = patch_stream(
        original.as_bytes(),
        &mut buffer,
        &config.markers(),
        &body.render(),
        config.on_unterminated,
    )
    .map_err(|error| patch_error(target, error))?;

    Ok(Preview {
        target: target.clone(),
        report: SyncReport {
            hosts: body.len(),
            outcome: outcome.finish.into(),
        },
        patched: String::from_utf8_lossy(&buffer).into_owned(),
        original,
        existing,
    })
}

fn patch_error(target: &Path, error: hostblock_blocks::Error) -> Error {
    match error {
        hostblock_blocks::Error::UnterminatedBlock { tag, line } => Error::UnterminatedBlock {
            path: target.to_path_buf(),
            tag,
            line,
        },
        hostblock_blocks::Error::Read(source) => Error::TargetRead {
            path: target.to_path_buf(),
            source: hostblock_fs::Error::io(target, source),
        },
        hostblock_blocks::Error::Write(source) => {
            let intermediate = sibling_path(target);
            Error::TargetWrite {
                path: target.to_path_buf(),
                source: hostblock_fs::Error::io(intermediate, source),
            }
        }
    }
}
