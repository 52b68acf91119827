//! Scanning text for tag-delimited blocks.
//!
//! Recognizes blocks of the form:
//! ```text
//! <prefix> TAG: <tag> {{{
//! body lines
//! <prefix> TAG: <tag> }}}
//! ```

use regex::Regex;
use std::sync::LazyLock;

use crate::marker::Markers;

/// A block found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The comment prefix in front of `TAG:`.
    pub prefix: String,
    /// The tag named by the markers.
    pub tag: String,
    /// The lines between the markers, each terminated with `\n`.
    pub content: String,
    /// The 1-based line number of the open marker.
    pub start_line: usize,
    /// The 1-based line number of the close marker.
    pub end_line: usize,
}

/// Matches an open marker line and captures its prefix and tag.
static OPEN_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?) TAG: (.+) \{\{\{$").expect("Invalid open marker regex")
});

/// Parses all closed blocks from the given content, in order of appearance.
///
/// An open marker without a matching close marker is skipped and scanning
/// resumes on the following line.
///
/// # Example
/// ```
/// use hostblock_blocks::parser::parse_blocks;
///
/// let content = "127.0.0.1 localhost\n### TAG: web {{{\n10.0.0.1\ta\n### TAG: web }}}\n";
///
/// let blocks = parse_blocks(content);
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].prefix, "###");
/// assert_eq!(blocks[0].tag, "web");
/// assert_eq!(blocks[0].content, "10.0.0.1\ta\n");
/// ```
pub fn parse_blocks(content: &str) -> Vec<Block> {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let Some(caps) = OPEN_MARKER_REGEX.captures(lines[index]) else {
            index += 1;
            continue;
        };
        let (prefix, tag) = (&caps[1], &caps[2]);
        let markers = Markers::with_prefix(prefix, tag);

        match scan_block(&lines, index, &markers) {
            Some(block) => {
                index = block.end_line;
                blocks.push(Block {
                    prefix: prefix.to_string(),
                    ..block
                });
            }
            None => index += 1,
        }
    }

    blocks
}

/// Finds the first closed block delimited by exactly these markers.
///
/// # Example
/// ```
/// use hostblock_blocks::{Markers, find_block};
///
/// let content = "# TAG: web {{{\n10.0.0.1\ta\n# TAG: web }}}\n";
///
/// let block = find_block(content, &Markers::new("web")).unwrap();
/// assert_eq!(block.content, "10.0.0.1\ta\n");
/// assert_eq!((block.start_line, block.end_line), (1, 3));
/// ```
pub fn find_block(content: &str, markers: &Markers) -> Option<Block> {
    let lines: Vec<&str> = content.lines().collect();

    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| **line == markers.open())
        .find_map(|(index, _)| scan_block(&lines, index, markers))
}

/// Checks whether a closed block for these markers exists.
pub fn has_block(content: &str, markers: &Markers) -> bool {
    find_block(content, markers).is_some()
}

/// Collects a block whose open marker sits at `open_index`.
fn scan_block(lines: &[&str], open_index: usize, markers: &Markers) -> Option<Block> {
    let close_offset = lines[open_index + 1..]
        .iter()
        .position(|line| *line == markers.close())?;
    let close_index = open_index + 1 + close_offset;

    let content = lines[open_index + 1..close_index]
        .iter()
        .fold(String::new(), |mut text, line| {
            text.push_str(line);
            text.push('\n');
            text
        });

    Some(Block {
        prefix: String::new(),
        tag: markers.tag().to_string(),
        content,
        start_line: open_index + 1,
        end_line: close_index + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blocks_empty() {
        assert!(parse_blocks("No blocks here").is_empty());
    }

    #[test]
    fn test_parse_single_block() {
        let content = "# TAG: web {{{\nhello world\n# TAG: web }}}";
        let blocks = parse_blocks(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].prefix, "#");
        assert_eq!(blocks[0].tag, "web");
        assert_eq!(blocks[0].content, "hello world\n");
    }

    #[test]
    fn test_find_block_not_exists() {
        let content = "# TAG: web {{{\ncontent\n# TAG: web }}}";
        assert!(find_block(content, &Markers::new("db")).is_none());
    }

    #[test]
    fn test_find_block_requires_matching_prefix() {
        let content = "### TAG: web {{{\ncontent\n### TAG: web }}}";
        assert!(!has_block(content, &Markers::new("web")));
        assert!(has_block(content, &Markers::with_prefix("###", "web")));
    }

    #[test]
    fn test_unterminated_block_skipped() {
        let content = "# TAG: web {{{\nleft open\n";
        assert!(parse_blocks(content).is_empty());
        assert!(!has_block(content, &Markers::new("web")));
    }
}
