//! Ordered set of editing cursors with optional selections
//!
//! The set maintains three invariants after every mutation:
//! - cursors are sorted by position
//! - no two cursors share a position
//! - no two selections overlap (overlapping selections merge into their
//!   union)
//!
//! Editing applies changes in offset-descending cursor order so earlier
//! offsets stay valid; overlapping selections would double-delete, which
//! is why the merge pass runs before any command touches the buffer.

use serde::{Deserialize, Serialize};

use crate::position::{Position, Range, Selection};

/// One editing point: position, optional selection, and the remembered
/// column for vertical motion
///
/// When a selection is present its `head` equals `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub position: Position,
    pub selection: Option<Selection>,
    /// Preferred column for vertical motion across lines of varying
    /// length; preserved by vertical moves, reset by horizontal ones
    pub desired_column: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(position: Position) -> Self {
        Self {
            position,
            selection: None,
            desired_column: position.column,
        }
    }

    /// Cursor with an active selection; the head becomes the position
    #[must_use]
    pub fn with_selection(anchor: Position, head: Position) -> Self {
        Self {
            position: head,
            selection: Some(Selection::new(anchor, head)),
            desired_column: head.column,
        }
    }

    /// The non-empty selection, if any
    #[must_use]
    pub fn active_selection(&self) -> Option<Selection> {
        self.selection.filter(|s| !s.is_empty())
    }
}

/// The ordered cursor set
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    primary: usize,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// A single cursor at the document origin
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::new(Position::origin())],
            primary: 0,
        }
    }

    /// The cursor considered "the" cursor for single-cursor operations
    #[must_use]
    pub fn primary(&self) -> &Cursor {
        &self.cursors[self.primary]
    }

    /// Read-only view of all cursors, guaranteed sorted
    #[must_use]
    pub fn all(&self) -> &[Cursor] {
        &self.cursors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Collapse to one cursor without a selection
    pub fn set_single(&mut self, pos: Position) {
        self.cursors = vec![Cursor::new(pos)];
        self.primary = 0;
    }

    /// Move the primary cursor
    ///
    /// With `extend`, the current position (or existing anchor) stays
    /// fixed and the selection grows to the new position.
    pub fn set_position(&mut self, pos: Position, extend: bool) {
        let cursor = &mut self.cursors[self.primary];
        if extend {
            let anchor = cursor.selection.map_or(cursor.position, |s| s.anchor);
            cursor.selection = Some(Selection::new(anchor, pos));
        } else {
            cursor.selection = None;
        }
        cursor.position = pos;
        cursor.desired_column = pos.column;
        self.normalize();
    }

    /// Add a cursor unless one already sits at the same position
    pub fn add_cursor(&mut self, pos: Position) {
        if self.cursors.iter().any(|c| c.position == pos) {
            return;
        }
        self.cursors.push(Cursor::new(pos));
        self.normalize();
    }

    /// Add a cursor with a selection unless one already sits at the head
    pub fn add_cursor_with_selection(&mut self, anchor: Position, head: Position) {
        if self.cursors.iter().any(|c| c.position == head) {
            return;
        }
        self.cursors.push(Cursor::with_selection(anchor, head));
        self.normalize();
    }

    /// Keep the primary cursor only
    pub fn clear_secondary(&mut self) {
        let primary = self.cursors[self.primary];
        self.cursors = vec![primary];
        self.primary = 0;
    }

    /// Keep positions, drop every selection
    pub fn clear_selections(&mut self) {
        for cursor in &mut self.cursors {
            cursor.selection = None;
        }
    }

    /// Apply a position transformer to every cursor
    ///
    /// With `extend`, each cursor keeps (or starts) a selection anchored
    /// at its prior anchor (or prior position). Overlapping results are
    /// merged.
    pub fn move_cursors(&mut self, f: impl Fn(&Cursor) -> Position, extend: bool) {
        for cursor in &mut self.cursors {
            let new_pos = f(cursor);
            if extend {
                let anchor = cursor.selection.map_or(cursor.position, |s| s.anchor);
                cursor.selection = Some(Selection::new(anchor, new_pos));
            } else {
                cursor.selection = None;
            }
            cursor.position = new_pos;
        }
        self.normalize();
    }

    /// Remember the current column of every cursor for vertical motion
    ///
    /// Called after horizontal moves only.
    pub fn update_desired_columns(&mut self) {
        for cursor in &mut self.cursors {
            cursor.desired_column = cursor.position.column;
        }
    }

    /// One cursor selecting from the origin to `end`
    pub fn select_all(&mut self, end: Position) {
        self.cursors = vec![Cursor::with_selection(Position::origin(), end)];
        self.primary = 0;
    }

    /// Replace the set with one cursor per selection
    ///
    /// An empty list collapses to a single cursor at the origin.
    pub fn set_selections(&mut self, selections: &[Selection]) {
        if selections.is_empty() {
            self.set_single(Position::origin());
            return;
        }
        self.cursors = selections
            .iter()
            .map(|s| {
                if s.is_empty() {
                    Cursor::new(s.head)
                } else {
                    Cursor::with_selection(s.anchor, s.head)
                }
            })
            .collect();
        self.primary = 0;
        self.normalize();
    }

    /// One range per cursor; empty selections contribute empty ranges
    #[must_use]
    pub fn selections(&self) -> Vec<Range> {
        self.cursors
            .iter()
            .map(|c| {
                c.active_selection()
                    .map_or(Range::new(c.position, c.position), |s| s.range())
            })
            .collect()
    }

    /// Non-empty selection ranges only
    #[must_use]
    pub fn selected_ranges(&self) -> Vec<Range> {
        self.cursors
            .iter()
            .filter_map(|c| c.active_selection())
            .map(|s| s.range())
            .collect()
    }

    /// By-value copy of the cursor list
    #[must_use]
    pub fn snapshot(&self) -> Vec<Cursor> {
        self.cursors.clone()
    }

    /// Replace the set with a snapshot
    pub fn restore(&mut self, snapshot: &[Cursor]) {
        if snapshot.is_empty() {
            self.set_single(Position::origin());
            return;
        }
        self.cursors = snapshot.to_vec();
        self.primary = 0;
        self.normalize();
    }

    /// Re-establish the set invariants: sort, then merge cursors sharing
    /// a position and cursors with overlapping selections
    pub fn normalize(&mut self) {
        let primary_pos = self
            .cursors
            .get(self.primary)
            .map_or(Position::origin(), |c| c.position);

        self.cursors.sort_by_key(|c| c.position);

        let mut merged: Vec<Cursor> = Vec::with_capacity(self.cursors.len());
        for cursor in self.cursors.drain(..) {
            match merged.last_mut() {
                Some(last) if last.position == cursor.position => {
                    if let Some(joined) = union_selection(last, &cursor) {
                        apply_union(last, joined);
                    }
                    // without selections the two cursors are identical
                }
                Some(last) if selections_overlap(last, &cursor) => {
                    let a = last.active_selection().unwrap();
                    let b = cursor.active_selection().unwrap();
                    let start = a.min().min(b.min());
                    let end = a.max().max(b.max());
                    apply_union(last, Selection::new(start, end));
                }
                _ => merged.push(cursor),
            }
        }
        self.cursors = merged;

        // Re-locate the primary by position; the leftmost candidate wins
        self.primary = self
            .cursors
            .iter()
            .position(|c| c.position == primary_pos)
            .or_else(|| {
                self.cursors
                    .iter()
                    .position(|c| c.active_selection().is_some_and(|s| s.range().contains(primary_pos)))
            })
            .unwrap_or_else(|| {
                self.cursors
                    .partition_point(|c| c.position < primary_pos)
                    .min(self.cursors.len().saturating_sub(1))
            });
    }
}

/// Union of two same-position cursors' selections, if either has one
fn union_selection(a: &Cursor, b: &Cursor) -> Option<Selection> {
    match (a.active_selection(), b.active_selection()) {
        (Some(sa), Some(sb)) => Some(Selection::new(
            sa.min().min(sb.min()),
            sa.max().max(sb.max()),
        )),
        (Some(s), None) | (None, Some(s)) => Some(s),
        (None, None) => None,
    }
}

/// Merged cursors land on the head side of the union (its max)
fn apply_union(target: &mut Cursor, union: Selection) {
    let head = union.max();
    target.selection = Some(Selection::new(union.min(), head));
    target.position = head;
    target.desired_column = head.column;
}

fn selections_overlap(a: &Cursor, b: &Cursor) -> bool {
    match (a.active_selection(), b.active_selection()) {
        (Some(sa), Some(sb)) => sb.min() < sa.max(),
        _ => false,
    }
}
