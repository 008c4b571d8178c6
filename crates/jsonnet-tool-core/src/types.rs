//! Common types shared between error and output modules.
//!
//! This module contains types that are used by the syntax tree crate as well
//! as by the error and output modules, avoiding circular dependencies.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Position
// ============================================================================

/// A position in a source file.
///
/// Lines and columns are 1-indexed. A line of `0` means "no position".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// LocationRange
// ============================================================================

/// A range of source text attributed to a syntax tree node.
///
/// Nodes synthesized by a pass (rather than read from source) carry an unset
/// range, see [`LocationRange::is_set`]. Ranges are copied by value wherever
/// they are recorded; nothing holds a reference back into the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocationRange {
    /// File the range belongs to (may be empty for snippets).
    #[serde(default)]
    pub file_name: String,
    /// First position covered by the range.
    #[serde(default)]
    pub begin: Position,
    /// Position just after the last character covered by the range.
    #[serde(default)]
    pub end: Position,
}

impl LocationRange {
    /// Create a new location range.
    pub fn new(file_name: impl Into<String>, begin: Position, end: Position) -> Self {
        LocationRange {
            file_name: file_name.into(),
            begin,
            end,
        }
    }

    /// Shorthand for a range given as `(line, column)` pairs.
    pub fn from_coords(
        file_name: impl Into<String>,
        begin: (u32, u32),
        end: (u32, u32),
    ) -> Self {
        LocationRange::new(
            file_name,
            Position::new(begin.0, begin.1),
            Position::new(end.0, end.1),
        )
    }

    /// Whether the range points at real source text.
    pub fn is_set(&self) -> bool {
        self.begin.line != 0
    }

    /// This range if it is set, otherwise `owner`.
    ///
    /// Nodes synthesized by a pass report the location of the construct they
    /// were derived from.
    pub fn or<'a>(&'a self, owner: &'a LocationRange) -> &'a LocationRange {
        if self.is_set() {
            self
        } else {
            owner
        }
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_set() {
            return write!(f, "{}", self.file_name);
        }
        if !self.file_name.is_empty() {
            write!(f, "{}:", self.file_name)?;
        }
        if self.begin.line == self.end.line {
            if self.begin.column == self.end.column {
                return write!(f, "{}", self.begin);
            }
            return write!(f, "{}-{}", self.begin, self.end.column);
        }
        write!(f, "({})-({})", self.begin, self.end)
    }
}

// ============================================================================
// Tests
// ============================================================================
