//! Source location utilities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Row/column location within the source YAML document (1-indexed).
///
/// Nodes built by hand (rather than loaded from text) carry [`Location::UNKNOWN`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// 1-indexed line number, `0` if unknown.
    pub row: usize,
    /// 1-indexed column number, `0` if unknown.
    pub column: usize,
}

impl Location {
    /// Sentinel meaning "no source position".
    pub const UNKNOWN: Self = Self { row: 0, column: 0 };

    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    pub fn is_known(&self) -> bool {
        self.row != 0 && self.column != 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.row, self.column)
    }
}

pub(crate) fn location_from_span(span: &saphyr_parser::Span) -> Location {
    let start = &span.start;
    Location::new(start.line(), start.col() + 1)
}
