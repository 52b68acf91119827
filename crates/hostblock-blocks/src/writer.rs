//! Block replacement for tag-delimited blocks.
//!
//! [`BlockPatcher`] is a single-pass state machine: it is fed the target's
//! lines in order and says, per line, whether to keep it, drop it, or emit
//! the replacement block in its place. [`patch_lines`] and [`patch_stream`]
//! drive it over an in-memory slice and a reader/writer pair respectively.
//!
//! Only the first complete block is rewritten in place. Any later block with
//! the same tag is dropped, markers included, so repeated runs converge on a
//! single block.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::marker::Markers;

/// What to do when an open marker has no close marker before end of input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnterminatedPolicy {
    /// Fail with [`Error::UnterminatedBlock`]; no output should be kept.
    #[default]
    Fail,
    /// Drop every line after the open marker and append nothing.
    Truncate,
}

impl std::fmt::Display for UnterminatedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Truncate => write!(f, "truncate"),
        }
    }
}

impl std::str::FromStr for UnterminatedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "truncate" => Ok(Self::Truncate),
            other => Err(format!(
                "unknown unterminated-block policy '{other}' (expected fail or truncate)"
            )),
        }
    }
}

/// Decision for one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// Copy the line to the output unchanged.
    Keep(&'a str),
    /// Discard the line.
    Drop,
    /// Emit the full replacement block (open marker, body, close marker).
    WriteBlock,
}

/// Decision once input is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finish {
    /// A block was written in place; nothing more to emit.
    Done,
    /// No block existed; append one at the end.
    AppendBlock,
    /// An open marker was never closed and the legacy policy applies.
    Truncated,
}

/// Single-pass replacement state machine for one tag.
#[derive(Debug)]
pub struct BlockPatcher {
    markers: Markers,
    policy: UnterminatedPolicy,
    inside_block: bool,
    block_written: bool,
    line_number: usize,
    open_line: usize,
}

impl BlockPatcher {
    pub fn new(markers: Markers, policy: UnterminatedPolicy) -> Self {
        Self {
            markers,
            policy,
            inside_block: false,
            block_written: false,
            line_number: 0,
            open_line: 0,
        }
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    /// Classify the next input line.
    pub fn step<'a>(&mut self, line: &'a str) -> Step<'a> {
        self.line_number += 1;

        if !self.inside_block && line == self.markers.open() {
            tracing::debug!(line = self.line_number, tag = self.markers.tag(), "Open marker");
            self.inside_block = true;
            self.open_line = self.line_number;
            return Step::Drop;
        }

        if self.inside_block {
            if line != self.markers.close() {
                return Step::Drop;
            }

            tracing::debug!(line = self.line_number, tag = self.markers.tag(), "Close marker");
            self.inside_block = false;
            if self.block_written {
                tracing::debug!(
                    start = self.open_line,
                    end = self.line_number,
                    "Dropping duplicate block"
                );
                return Step::Drop;
            }
            self.block_written = true;
            return Step::WriteBlock;
        }

        Step::Keep(line)
    }

    /// Conclude the pass.
    ///
    /// # Errors
    /// Returns [`Error::UnterminatedBlock`] when an open marker is still
    /// pending and the policy is [`UnterminatedPolicy::Fail`].
    pub fn finish(self) -> Result<Finish> {
        if self.inside_block {
            return match self.policy {
                UnterminatedPolicy::Fail => Err(Error::UnterminatedBlock {
                    tag: self.markers.tag().to_string(),
                    line: self.open_line,
                }),
                UnterminatedPolicy::Truncate => {
                    tracing::warn!(
                        tag = self.markers.tag(),
                        line = self.open_line,
                        "Unterminated block: discarded all lines after the open marker"
                    );
                    Ok(Finish::Truncated)
                }
            };
        }

        if self.block_written {
            Ok(Finish::Done)
        } else {
            Ok(Finish::AppendBlock)
        }
    }
}

/// Summary of a streaming patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Lines read from the input.
    pub lines_read: usize,
    /// How the pass ended.
    pub finish: Finish,
}

/// Patch an in-memory sequence of lines (without terminators).
///
/// Body lines are split out, so the result holds one entry per output line.
///
/// # Example
/// ```
/// use hostblock_blocks::{Markers, UnterminatedPolicy, patch_lines};
///
/// let lines = ["x", "# TAG: web {{{", "old", "# TAG: web }}}", "y"];
/// let out = patch_lines(&lines, &Markers::new("web"), "10.0.0.1\ta\n", UnterminatedPolicy::Fail).unwrap();
/// assert_eq!(out, ["x", "# TAG: web {{{", "10.0.0.1\ta", "# TAG: web }}}", "y"]);
/// ```
pub fn patch_lines<S: AsRef<str>>(
    lines: &[S],
    markers: &Markers,
    body: &str,
    policy: UnterminatedPolicy,
) -> Result<Vec<String>> {
    let mut patcher = BlockPatcher::new(markers.clone(), policy);
    let mut output = Vec::with_capacity(lines.len() + body.lines().count() + 2);

    for line in lines {
        match patcher.step(line.as_ref()) {
            Step::Keep(kept) => output.push(kept.to_string()),
            Step::Drop => {}
            Step::WriteBlock => output.extend(markers.block_lines(body).map(str::to_string)),
        }
    }

    if patcher.finish()? == Finish::AppendBlock {
        output.extend(markers.block_lines(body).map(str::to_string));
    }

    Ok(output)
}

/// Stream lines from `reader` to `writer`, replacing or appending the block.
///
/// Input lines are split on `\n` with a trailing `\r` removed; every output
/// line is terminated with `\n`. On error the writer may hold partial output
/// and should be discarded.
pub fn patch_stream<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    markers: &Markers,
    body: &str,
    policy: UnterminatedPolicy,
) -> Result<PatchOutcome> {
    let mut patcher = BlockPatcher::new(markers.clone(), policy);
    let mut lines_read = 0;

    for line in reader.lines() {
        let line = line.map_err(Error::Read)?;
        lines_read += 1;

        match patcher.step(&line) {
            Step::Keep(kept) => write_line(writer, kept)?,
            Step::Drop => {}
            Step::WriteBlock => {
                for block_line in markers.block_lines(body) {
                    write_line(writer, block_line)?;
                }
            }
        }
    }

    let finish = patcher.finish()?;
    if finish == Finish::AppendBlock {
        for block_line in markers.block_lines(body) {
            write_line(writer, block_line)?;
        }
    }
    writer.flush().map_err(Error::Write)?;

    Ok(PatchOutcome { lines_read, finish })
}

/// Join lines into file text, terminating each with `\n`.
pub fn render<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().fold(String::new(), |mut text, line| {
        text.push_str(line.as_ref());
        text.push('\n');
        text
    })
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes()).map_err(Error::Write)?;
    writer.write_all(b"\n").map_err(Error::Write)
}
