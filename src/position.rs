//! Position, range, and selection primitives
//!
//! All coordinates are zero-indexed. Columns count Unicode scalar values,
//! not bytes and not display cells. Ordering is lexicographic on
//! `(line, column)`.

use serde::{Deserialize, Serialize};

/// Position in a document (line, column)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Origin of the document, `(0, 0)`
    #[must_use]
    pub fn origin() -> Self {
        Self::default()
    }
}

/// Ordered span between two positions (`start <= end`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    /// Create a range, swapping the endpoints if they arrive reversed
    #[must_use]
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Check if range is empty (start == end)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if a position falls within the range (inclusive of both ends)
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }

    /// Check if two ranges share at least one position
    #[must_use]
    pub fn overlaps(&self, other: &Range) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// Selection with a fixed `anchor` and a `head` that follows the cursor
///
/// The anchor may sit before or after the head; use [`Selection::range`]
/// for the ordered span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    #[must_use]
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection at a single position
    #[must_use]
    pub fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    /// Check if selection is empty (anchor == head)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// The earlier of the two endpoints
    #[must_use]
    pub fn min(&self) -> Position {
        self.anchor.min(self.head)
    }

    /// The later of the two endpoints
    #[must_use]
    pub fn max(&self) -> Position {
        self.anchor.max(self.head)
    }

    /// The ordered range covered by the selection
    #[must_use]
    pub fn range(&self) -> Range {
        Range {
            start: self.min(),
            end: self.max(),
        }
    }
}
