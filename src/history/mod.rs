//! Linear undo/redo history
//!
//! Every user command is one atomic undo entry: an action groups the
//! command's low-level edits with the cursor set captured before and
//! after, so undo restores both text and selection state. New edits after
//! an undo truncate the redo tail.

use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::position::Position;

/// A single invertible edit operation
///
/// Inserts store the inserted text at the insertion position; deletes
/// store the deleted text at the start of the removed range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditOp {
    Insert { position: Position, text: String },
    Delete { position: Position, text: String },
}

impl EditOp {
    /// Get the inverse operation (for undo)
    #[must_use]
    pub fn inverse(&self) -> EditOp {
        match self {
            EditOp::Insert { position, text } => EditOp::Delete {
                position: *position,
                text: text.clone(),
            },
            EditOp::Delete { position, text } => EditOp::Insert {
                position: *position,
                text: text.clone(),
            },
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            EditOp::Insert { position, .. } | EditOp::Delete { position, .. } => *position,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            EditOp::Insert { text, .. } | EditOp::Delete { text, .. } => text,
        }
    }

    /// Position just past `text` laid out starting at `position`
    #[must_use]
    pub fn end_position(position: Position, text: &str) -> Position {
        let newlines = text.matches('\n').count();
        if newlines == 0 {
            Position::new(position.line, position.column + text.chars().count())
        } else {
            let tail = text.rsplit('\n').next().unwrap_or("");
            Position::new(position.line + newlines, tail.chars().count())
        }
    }
}

/// One grouped undo unit spanning all edits of a single user command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditAction {
    /// Operations in the order they were applied
    pub ops: Vec<EditOp>,
    /// Cursor set captured before the command ran
    pub cursors_before: Vec<Cursor>,
    /// Cursor set captured after the command ran
    pub cursors_after: Vec<Cursor>,
}

impl EditAction {
    #[must_use]
    pub fn new(ops: Vec<EditOp>, cursors_before: Vec<Cursor>, cursors_after: Vec<Cursor>) -> Self {
        Self {
            ops,
            cursors_before,
            cursors_after,
        }
    }

    /// Inverse operations in reverse application order (for undo)
    #[must_use]
    pub fn inverse_ops(&self) -> Vec<EditOp> {
        self.ops.iter().rev().map(EditOp::inverse).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Linear history of grouped operations
#[derive(Clone, Debug, Default)]
pub struct UndoStack {
    done: Vec<EditAction>,
    undone: Vec<EditAction>,
}

impl UndoStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action; any redo tail is discarded
    pub fn push(&mut self, action: EditAction) {
        self.done.push(action);
        self.undone.clear();
    }

    /// Pop the most recent action onto the redo stack
    ///
    /// The caller applies the inverted operations.
    pub fn undo(&mut self) -> Option<EditAction> {
        let action = self.done.pop()?;
        self.undone.push(action.clone());
        Some(action)
    }

    /// Pop the most recently undone action back onto the done stack
    ///
    /// The caller re-applies the operations in recorded order.
    pub fn redo(&mut self) -> Option<EditAction> {
        let action = self.undone.pop()?;
        self.done.push(action.clone());
        Some(action)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
