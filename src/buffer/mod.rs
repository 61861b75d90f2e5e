//! Piece-table text storage
//!
//! Content is described by an ordered list of spans into two immutable
//! char storages: the original text (set once at construction) and an
//! append-only add buffer. Insertions append to the add buffer and splice
//! the span list; deletions rewrite the span list in one pass. Neither
//! ever copies the rest of the document.
//!
//! Offsets, columns, and piece lengths all count Unicode scalar values.
//! Out-of-range inputs are clamped, never rejected: reads of invalid
//! ranges return empty strings.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorKind};
use crate::position::Position;

pub mod line_index;

use line_index::LineIndex;

/// Which backing storage a piece points into
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferSource {
    Original,
    Add,
}

/// A contiguous span of one backing storage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub source: BufferSource,
    pub start: usize,
    /// Length in chars
    pub len: usize,
}

/// Deep-copied piece list and add buffer, restorable with [`PieceTable::restore`]
///
/// The original storage is not part of the snapshot: it is set once at
/// construction and never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceTableSnapshot {
    pub pieces: Vec<Piece>,
    pub add: String,
}

/// Text document as two immutable storages plus an ordered span list
pub struct PieceTable {
    original: Vec<char>,
    add: Vec<char>,
    pieces: Vec<Piece>,
    /// Total content length in chars
    length: usize,
    /// Monotonic mutation counter for change detection
    version: u64,
    /// Lazily rebuilt on first query after a mutation
    line_index: RefCell<Option<LineIndex>>,
}

impl PieceTable {
    pub fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let length = original.len();
        let pieces = if length > 0 {
            vec![Piece {
                source: BufferSource::Original,
                start: 0,
                len: length,
            }]
        } else {
            Vec::new()
        };

        Self {
            original,
            add: Vec::new(),
            pieces,
            length,
            version: 0,
            line_index: RefCell::new(None),
        }
    }

    /// Total content length in chars
    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The current mutation counter
    ///
    /// Strictly increases on every mutation, including a [`restore`] that
    /// leaves content unchanged. Readers compare against their last-seen
    /// value to invalidate derived data.
    ///
    /// [`restore`]: PieceTable::restore
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of lines
    ///
    /// A document with no trailing newline still has one line; an empty
    /// document has one empty line.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.with_line_index(|index| index.line_count())
    }

    /// Full materialized content, O(n)
    #[must_use]
    pub fn content(&self) -> String {
        self.chars().collect()
    }

    /// Content of line `line`, excluding the terminating newline
    ///
    /// Out-of-range lines return an empty string.
    #[must_use]
    pub fn line(&self, line: usize) -> String {
        let (start, end) = match self.line_span(line) {
            Some(span) => span,
            None => return String::new(),
        };
        self.text_in_offset_range(start, end)
    }

    /// Length of line `line` in chars, excluding the newline
    #[must_use]
    pub fn line_length(&self, line: usize) -> usize {
        self.line_span(line).map_or(0, |(start, end)| end - start)
    }

    /// Convert a position to an absolute offset
    ///
    /// The column is clamped to the line length; a line beyond the last
    /// returns the document length.
    #[must_use]
    pub fn position_to_offset(&self, pos: Position) -> usize {
        match self.line_span(pos.line) {
            Some((start, end)) => start + pos.column.min(end - start),
            None => self.length,
        }
    }

    /// Convert an absolute offset to a position
    ///
    /// The offset is clamped to `[0, len()]`.
    #[must_use]
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.length);
        self.with_line_index(|index| {
            let line = index.line_at_offset(offset);
            // line_at_offset guarantees the start exists
            let start = index.line_start(line).unwrap_or(0);
            Position::new(line, offset - start)
        })
    }

    /// The char at an absolute offset, if in range
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.length {
            return None;
        }
        let mut acc = 0;
        for piece in &self.pieces {
            if offset < acc + piece.len {
                return Some(self.piece_slice(piece)[offset - acc]);
            }
            acc += piece.len;
        }
        None
    }

    /// Content between two offsets, both clamped to the document
    #[must_use]
    pub fn text_in_offset_range(&self, start: usize, end: usize) -> String {
        let start = start.min(self.length);
        let end = end.min(self.length);
        if start >= end {
            return String::new();
        }

        let mut out = String::with_capacity(end - start);
        let mut acc = 0;
        for piece in &self.pieces {
            let p_start = acc;
            let p_end = acc + piece.len;
            acc = p_end;
            if p_end <= start {
                continue;
            }
            if p_start >= end {
                break;
            }
            let from = start.max(p_start) - p_start;
            let to = end.min(p_end) - p_start;
            out.extend(&self.piece_slice(piece)[from..to]);
        }
        out
    }

    /// Content between two positions
    #[must_use]
    pub fn text_in_range(&self, start: Position, end: Position) -> String {
        self.text_in_offset_range(self.position_to_offset(start), self.position_to_offset(end))
    }

    /// Splice text in at `offset` (clamped to `[0, len()]`)
    ///
    /// Inserting empty text is a no-op and does not advance the version.
    pub fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.length);

        let add_start = self.add.len();
        self.add.extend(text.chars());
        let new_piece = Piece {
            source: BufferSource::Add,
            start: add_start,
            len: self.add.len() - add_start,
        };

        // Find the piece covering the offset. A boundary hit splices the
        // new piece between neighbors; a mid-piece hit splits the piece
        // into prefix + suffix around it.
        let mut acc = 0;
        let mut insert_at = self.pieces.len();
        let mut split_at: Option<(usize, usize)> = None;
        for (i, piece) in self.pieces.iter().enumerate() {
            if offset == acc {
                insert_at = i;
                break;
            }
            if offset < acc + piece.len {
                split_at = Some((i, offset - acc));
                break;
            }
            acc += piece.len;
        }

        match split_at {
            Some((i, local)) => {
                let old = self.pieces[i];
                let prefix = Piece { len: local, ..old };
                let suffix = Piece {
                    start: old.start + local,
                    len: old.len - local,
                    ..old
                };
                self.pieces.splice(i..=i, [prefix, new_piece, suffix]);
            }
            None => self.pieces.insert(insert_at, new_piece),
        }

        self.length += new_piece.len;
        self.bump();
        debug_assert!(self.validate().is_ok());
    }

    /// Remove `[start, end)` and return the removed text
    ///
    /// Offsets are clamped; an empty range is a no-op returning an empty
    /// string without advancing the version.
    pub fn delete(&mut self, start: usize, end: usize) -> String {
        let start = start.min(self.length);
        let end = end.min(self.length);
        if start >= end {
            return String::new();
        }

        let removed = self.text_in_offset_range(start, end);

        // One pass over the span list: keep, drop, trim one end, or split
        // around the deleted range.
        let mut new_pieces = Vec::with_capacity(self.pieces.len() + 1);
        let mut acc = 0;
        for piece in &self.pieces {
            let p_start = acc;
            let p_end = acc + piece.len;
            acc = p_end;

            if p_end <= start || p_start >= end {
                new_pieces.push(*piece);
            } else if start <= p_start && p_end <= end {
                // entirely inside: dropped
            } else if start > p_start && end < p_end {
                // deletion straddles the middle of this piece
                new_pieces.push(Piece {
                    len: start - p_start,
                    ..*piece
                });
                new_pieces.push(Piece {
                    start: piece.start + (end - p_start),
                    len: p_end - end,
                    ..*piece
                });
            } else if start > p_start {
                // overlap at the tail
                new_pieces.push(Piece {
                    len: start - p_start,
                    ..*piece
                });
            } else {
                // overlap at the head
                new_pieces.push(Piece {
                    start: piece.start + (end - p_start),
                    len: p_end - end,
                    ..*piece
                });
            }
        }

        self.pieces = new_pieces;
        self.length -= end - start;
        self.bump();
        debug_assert!(self.validate().is_ok());
        removed
    }

    /// Delete `[start, end)` then insert `text` at `start`
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> String {
        let removed = self.delete(start, end);
        self.insert(start, text);
        removed
    }

    /// Deep copy of the piece list and add buffer
    #[must_use]
    pub fn snapshot(&self) -> PieceTableSnapshot {
        PieceTableSnapshot {
            pieces: self.pieces.clone(),
            add: self.add.iter().collect(),
        }
    }

    /// Restore a snapshot taken from this table
    ///
    /// Always advances the version, even when the restored content equals
    /// the current content.
    pub fn restore(&mut self, snapshot: &PieceTableSnapshot) {
        self.add = snapshot.add.chars().collect();
        self.pieces = snapshot.pieces.clone();
        self.length = self.pieces.iter().map(|p| p.len).sum();
        self.bump();
        debug_assert!(self.validate().is_ok());
    }

    /// Verify the structural invariants of the span list
    ///
    /// A violation is a programmer bug, reported as a corrupt-buffer
    /// condition rather than a user-visible error.
    pub fn validate(&self) -> crate::error::Result<()> {
        let mut sum = 0;
        for piece in &self.pieces {
            let storage_len = match piece.source {
                BufferSource::Original => self.original.len(),
                BufferSource::Add => self.add.len(),
            };
            if piece.len == 0 || piece.start + piece.len > storage_len {
                return Err(CoreError::critical(
                    ErrorKind::Internal,
                    "CORRUPT_BUFFER",
                    format!(
                        "piece {:?} out of bounds for storage of length {}",
                        piece, storage_len
                    ),
                ));
            }
            sum += piece.len;
        }
        if sum != self.length {
            return Err(CoreError::critical(
                ErrorKind::Internal,
                "CORRUPT_BUFFER",
                format!("piece lengths sum to {} but length is {}", sum, self.length),
            ));
        }
        Ok(())
    }

    /// Iterate the content chars in order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.pieces
            .iter()
            .flat_map(|piece| self.piece_slice(piece).iter().copied())
    }

    fn piece_slice(&self, piece: &Piece) -> &[char] {
        match piece.source {
            BufferSource::Original => &self.original[piece.start..piece.start + piece.len],
            BufferSource::Add => &self.add[piece.start..piece.start + piece.len],
        }
    }

    /// Start and end offsets of a line, newline excluded
    fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        self.with_line_index(|index| {
            let start = index.line_start(line)?;
            let end = match index.line_start(line + 1) {
                Some(next) => next - 1,
                None => self.length,
            };
            Some((start, end))
        })
    }

    fn with_line_index<R>(&self, f: impl FnOnce(&LineIndex) -> R) -> R {
        let mut guard = self.line_index.borrow_mut();
        let index = guard.get_or_insert_with(|| LineIndex::build(self.chars()));
        f(index)
    }

    fn bump(&mut self) {
        self.version += 1;
        *self.line_index.borrow_mut() = None;
    }
}

impl Clone for PieceTable {
    fn clone(&self) -> Self {
        Self {
            original: self.original.clone(),
            add: self.add.clone(),
            pieces: self.pieces.clone(),
            length: self.length,
            version: self.version,
            line_index: RefCell::new(None),
        }
    }
}

impl std::fmt::Debug for PieceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PieceTable")
            .field("length", &self.length)
            .field("pieces", &self.pieces.len())
            .field("version", &self.version)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
