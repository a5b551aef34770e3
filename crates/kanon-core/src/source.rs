//! Source line references used for diagnostics.

use std::fmt;
use std::sync::Arc;

/// A `(file, line)` reference attached to declarations and errors.
///
/// Source lines only ever appear in diagnostics. They never take part in
/// merging or in the comparison of configuration values.
///
/// # Example
///
/// ```
/// use kanon_core::SourceLine;
///
/// let line = SourceLine::new("spec/server.rules", 12);
/// assert_eq!(line.to_string(), "spec/server.rules:12");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLine {
    file: Arc<str>,
    line: u32,
}

impl SourceLine {
    /// Create a source line reference.
    ///
    /// # Panics
    ///
    /// Panics if `line` is zero. Line numbers are 1-based.
    #[must_use]
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        assert!(line >= 1, "source line numbers are 1-based");
        Self {
            file: file.into(),
            line,
        }
    }

    /// The file (or other declaration source) identity.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The 1-based line number.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for SourceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}
