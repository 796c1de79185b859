//! Source positions (spec §6 `file-set`: position → (filename, line, column)).

use std::fmt;

/// A single point in a source file, already resolved from the opaque
/// position the front end hands back (the front end itself is out of
/// scope — see spec §1).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourcePos {
    pub file: String,
    pub line: u32,
    pub column: u32,
    /// Byte offset within `file`, used only to break ties when two
    /// declarations report the same (line, column) — never observed in
    /// practice but kept so `Signature` equality stays exact.
    pub offset: u32,
}

impl SourcePos {
    pub fn new(file: impl Into<String>, line: u32, column: u32, offset: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            offset,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A half-open range of source positions within one file, used to quote
/// the code backing a diagnostic (spec §6).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: SourcePos,
    pub end: SourcePos,
}

impl Span {
    pub fn new(start: SourcePos, end: SourcePos) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single position, used when only a point
    /// location (not a range) is available.
    pub fn point(pos: SourcePos) -> Self {
        Self {
            end: pos.clone(),
            start: pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_file_line_column() {
        let pos = SourcePos::new("main.go", 12, 4, 100);
        assert_eq!(pos.to_string(), "main.go:12:4");
    }

    #[test]
    fn point_span_has_equal_start_and_end() {
        let pos = SourcePos::new("main.go", 12, 4, 100);
        let span = Span::point(pos.clone());
        assert_eq!(span.start, pos);
        assert_eq!(span.end, pos);
    }

    #[test]
    fn ordering_is_lexicographic_over_the_tuple() {
        let a = SourcePos::new("main.go", 1, 1, 0);
        let b = SourcePos::new("main.go", 2, 1, 0);
        assert!(a < b);
    }
}
