//! Document orchestration
//!
//! A `Document` owns one piece table, one cursor set, and one undo stack,
//! and brokers every mutation. Each user command runs synchronously:
//! consult the indent helpers, apply piece-table edits in offset-
//! descending cursor order, push one undo action, bump the version, then
//! emit the change event. Subscribers observing [`Document::version`]
//! during the event always see the post-mutation value.

pub mod options;

mod editing;
mod motion;

use std::path::{Path, PathBuf};

use crate::buffer::{PieceTable, PieceTableSnapshot};
use crate::cursor::{Cursor, CursorSet};
use crate::error::Result;
use crate::history::{EditAction, EditOp, UndoStack};
use crate::indent;
use crate::position::{Position, Range, Selection};

use options::{document_settings_registry, DocumentOptions, LineEnding};

/// Payload of a change notification
///
/// Carries the operations recorded for the command (inverted operations
/// for an undo) and the version counter after the mutation.
#[derive(Clone, Debug)]
pub struct ChangeEvent {
    pub operations: Vec<EditOp>,
    pub version: u64,
}

type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;
type CursorListener = Box<dyn FnMut(&[Cursor])>;

/// Top-level command executor and change notifier
pub struct Document {
    table: PieceTable,
    cursors: CursorSet,
    history: UndoStack,
    options: DocumentOptions,
    file_path: Option<PathBuf>,
    language: Option<String>,
    /// Content at the last save point, for dirty tracking
    saved_content: String,
    dirty: bool,
    change_listeners: Vec<ChangeListener>,
    cursor_listeners: Vec<CursorListener>,
}

impl Document {
    /// Create a document from raw text
    ///
    /// `\r\n` line endings are normalized to `\n`; the detected style is
    /// recorded and re-applied by [`content_with_line_endings`].
    ///
    /// [`content_with_line_endings`]: Document::content_with_line_endings
    pub fn new(text: &str, mut options: DocumentOptions) -> Self {
        if LineEnding::detect(text) == LineEnding::CRLF {
            options.line_ending = LineEnding::CRLF;
        }
        let normalized = text.replace("\r\n", "\n");

        if options.detect_indent {
            match indent::detect_indent_style(&normalized) {
                Some(indent::IndentStyle::Tabs) => options.insert_spaces = false,
                Some(indent::IndentStyle::Spaces(n)) => {
                    options.insert_spaces = true;
                    options.tab_size = n;
                }
                None => {}
            }
        }

        Self {
            table: PieceTable::new(&normalized),
            cursors: CursorSet::new(),
            history: UndoStack::new(),
            options,
            file_path: None,
            language: None,
            saved_content: normalized,
            dirty: false,
            change_listeners: Vec::new(),
            cursor_listeners: Vec::new(),
        }
    }

    /// Empty document with default options
    pub fn empty() -> Self {
        Self::new("", DocumentOptions::default())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    #[must_use]
    pub fn content(&self) -> String {
        self.table.content()
    }

    /// Content with the recorded line-ending style re-applied, for savers
    #[must_use]
    pub fn content_with_line_endings(&self) -> String {
        match self.options.line_ending {
            LineEnding::LF => self.table.content(),
            LineEnding::CRLF => self.table.content().replace('\n', "\r\n"),
        }
    }

    #[must_use]
    pub fn line(&self, line: usize) -> String {
        self.table.line(line)
    }

    #[must_use]
    pub fn line_length(&self, line: usize) -> usize {
        self.table.line_length(line)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.table.line_count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.table.version()
    }

    #[must_use]
    pub fn position_to_offset(&self, pos: Position) -> usize {
        self.table.position_to_offset(pos)
    }

    #[must_use]
    pub fn offset_to_position(&self, offset: usize) -> Position {
        self.table.offset_to_position(offset)
    }

    #[must_use]
    pub fn text_in_range(&self, start: Position, end: Position) -> String {
        self.table.text_in_range(start, end)
    }

    /// The primary cursor
    #[must_use]
    pub fn primary_cursor(&self) -> &Cursor {
        self.cursors.primary()
    }

    /// All cursors, sorted by position
    #[must_use]
    pub fn cursors(&self) -> &[Cursor] {
        self.cursors.all()
    }

    /// One range per cursor (empty selections included)
    #[must_use]
    pub fn selections(&self) -> Vec<Range> {
        self.cursors.selections()
    }

    /// Non-empty selection ranges only
    #[must_use]
    pub fn selected_ranges(&self) -> Vec<Range> {
        self.cursors.selected_ranges()
    }

    /// Selected text across all cursors, newline-joined
    #[must_use]
    pub fn selected_text(&self) -> String {
        let parts: Vec<String> = self
            .cursors
            .all()
            .iter()
            .filter_map(|c| c.active_selection())
            .map(|s| self.table.text_in_range(s.min(), s.max()))
            .collect();
        parts.join("\n")
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    #[must_use]
    pub fn line_ending(&self) -> LineEnding {
        self.options.line_ending
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    // ------------------------------------------------------------------
    // Cursor placement
    // ------------------------------------------------------------------

    /// Collapse to a single cursor at `pos` (clamped to the document)
    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.clamp_position(pos);
        self.cursors.set_single(pos);
        self.emit_cursor_change();
    }

    /// Move the primary cursor, optionally extending its selection
    pub fn set_cursor_position(&mut self, pos: Position, extend: bool) {
        let pos = self.clamp_position(pos);
        self.cursors.set_position(pos, extend);
        self.emit_cursor_change();
    }

    /// Add a cursor at `pos` unless one is already there
    pub fn add_cursor(&mut self, pos: Position) {
        let pos = self.clamp_position(pos);
        self.cursors.add_cursor(pos);
        self.emit_cursor_change();
    }

    /// Add a cursor with a selection unless one already sits at the head
    pub fn add_cursor_with_selection(&mut self, anchor: Position, head: Position) {
        let anchor = self.clamp_position(anchor);
        let head = self.clamp_position(head);
        self.cursors.add_cursor_with_selection(anchor, head);
        self.emit_cursor_change();
    }

    /// Drop every cursor but the primary
    pub fn clear_secondary_cursors(&mut self) {
        self.cursors.clear_secondary();
        self.emit_cursor_change();
    }

    /// Drop every selection, keeping cursor positions
    pub fn clear_selections(&mut self) {
        self.cursors.clear_selections();
        self.emit_cursor_change();
    }

    /// Replace the cursor set with one cursor per selection
    pub fn set_selections(&mut self, selections: &[Selection]) {
        let clamped: Vec<Selection> = selections
            .iter()
            .map(|s| Selection::new(self.clamp_position(s.anchor), self.clamp_position(s.head)))
            .collect();
        self.cursors.set_selections(&clamped);
        self.emit_cursor_change();
    }

    // ------------------------------------------------------------------
    // Options and save point
    // ------------------------------------------------------------------

    /// Apply a named option (canonical name or alias) from a string value
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<()> {
        document_settings_registry()
            .execute(name, value, &mut self.options)
            .map_err(Into::into)
    }

    /// Record the current content as the save point and clear the dirty
    /// flag
    pub fn mark_saved(&mut self) {
        self.saved_content = self.table.content();
        self.dirty = false;
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Subscribe to change events (fired once per mutating command)
    pub fn on_change(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.change_listeners.push(Box::new(listener));
    }

    /// Subscribe to cursor events (fired after any command that moves
    /// cursors, including mutating ones)
    pub fn on_cursor_change(&mut self, listener: impl FnMut(&[Cursor]) + 'static) {
        self.cursor_listeners.push(Box::new(listener));
    }

    fn emit_change(&mut self, operations: Vec<EditOp>) {
        let event = ChangeEvent {
            operations,
            version: self.table.version(),
        };
        for listener in &mut self.change_listeners {
            listener(&event);
        }
        self.emit_cursor_change();
    }

    fn emit_cursor_change(&mut self) {
        let cursors = self.cursors.snapshot();
        for listener in &mut self.cursor_listeners {
            listener(&cursors);
        }
    }

    // ------------------------------------------------------------------
    // Undo / redo
    // ------------------------------------------------------------------

    /// Invert the most recent action and restore its before-cursors
    ///
    /// Silent no-op on an empty stack.
    pub fn undo(&mut self) {
        let action = match self.history.undo() {
            Some(action) => action,
            None => return,
        };
        let inverse = action.inverse_ops();
        for op in &inverse {
            self.apply_op(op);
        }
        self.cursors.restore(&action.cursors_before);
        self.dirty = self.table.content() != self.saved_content;
        self.emit_change(inverse);
    }

    /// Re-apply the most recently undone action and restore its
    /// after-cursors
    pub fn redo(&mut self) {
        let action = match self.history.redo() {
            Some(action) => action,
            None => return,
        };
        for op in &action.ops {
            self.apply_op(op);
        }
        self.cursors.restore(&action.cursors_after);
        self.dirty = self.table.content() != self.saved_content;
        self.emit_change(action.ops);
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn apply_op(&mut self, op: &EditOp) {
        match op {
            EditOp::Insert { position, text } => {
                let offset = self.table.position_to_offset(*position);
                self.table.insert(offset, text);
            }
            EditOp::Delete { position, text } => {
                let offset = self.table.position_to_offset(*position);
                self.table.delete(offset, offset + text.chars().count());
            }
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Piece-list and add-buffer snapshot
    #[must_use]
    pub fn snapshot(&self) -> PieceTableSnapshot {
        self.table.snapshot()
    }

    /// Restore a piece-table snapshot
    ///
    /// Always advances the version; undo history is cleared because the
    /// recorded positions no longer describe this content.
    pub fn restore(&mut self, snapshot: &PieceTableSnapshot) {
        self.table.restore(snapshot);
        self.history.clear();
        let clamped = self
            .cursors
            .snapshot()
            .iter()
            .map(|c| Cursor::new(self.clamp_position(c.position)))
            .collect::<Vec<_>>();
        self.cursors.restore(&clamped);
        self.dirty = self.table.content() != self.saved_content;
        self.emit_change(Vec::new());
    }

    /// Cursor snapshot
    #[must_use]
    pub fn cursor_snapshot(&self) -> Vec<Cursor> {
        self.cursors.snapshot()
    }

    /// Restore a cursor snapshot
    pub fn restore_cursors(&mut self, snapshot: &[Cursor]) {
        self.cursors.restore(snapshot);
        self.emit_cursor_change();
    }

    // ------------------------------------------------------------------
    // Shared helpers
    // ------------------------------------------------------------------

    /// Record a finished editing command: push one undo action, mark the
    /// document dirty, and emit the change event
    fn finish_edit(&mut self, ops: Vec<EditOp>, cursors_before: Vec<Cursor>) {
        if ops.is_empty() {
            return;
        }
        let cursors_after = self.cursors.snapshot();
        self.history
            .push(EditAction::new(ops.clone(), cursors_before, cursors_after));
        self.dirty = true;
        self.emit_change(ops);
    }

    /// Clamp a position to the document: line to the last line, column to
    /// the line length
    fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.table.line_count() - 1);
        Position::new(line, pos.column.min(self.table.line_length(line)))
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("length", &self.table.len())
            .field("lines", &self.table.line_count())
            .field("cursors", &self.cursors.len())
            .field("version", &self.table.version())
            .field("dirty", &self.dirty)
            .finish()
    }
}
