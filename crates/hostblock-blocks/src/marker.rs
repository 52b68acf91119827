//! Open/close marker lines for a tag.

/// Comment prefix used when none is configured.
pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// The pair of literal lines delimiting the block for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    tag: String,
    open: String,
    close: String,
}

impl Markers {
    /// Markers for `tag` with the default `#` prefix.
    pub fn new(tag: &str) -> Self {
        Self::with_prefix(DEFAULT_COMMENT_PREFIX, tag)
    }

    /// Markers for `tag` using a custom comment prefix.
    ///
    /// ```
    /// use hostblock_blocks::Markers;
    ///
    /// let markers = Markers::with_prefix("###", "web");
    /// assert_eq!(markers.open(), "### TAG: web {{{");
    /// assert_eq!(markers.close(), "### TAG: web }}}");
    /// ```
    pub fn with_prefix(prefix: &str, tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            open: format!("{prefix} TAG: {tag} {{{{{{"),
            close: format!("{prefix} TAG: {tag} }}}}}}"),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// The lines of a complete block holding `body`: open marker, each body
    /// line, close marker.
    pub fn block_lines<'a>(&'a self, body: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::once(self.open.as_str())
            .chain(body.lines())
            .chain(std::iter::once(self.close.as_str()))
    }
}
