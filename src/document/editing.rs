//! Editing commands
//!
//! Every command follows the same shape: apply one editing step per
//! cursor in offset-descending order (so earlier offsets stay valid),
//! reconcile the cursor offsets against the net size change of the edits
//! below each cursor, then record a single undo action and emit one
//! change event. Commands with nothing to do (backspace at offset 0,
//! empty insert) return silently without touching the version.

use crate::cursor::Cursor;
use crate::history::EditOp;
use crate::indent::{self, AutoIndentMode};
use crate::position::{Position, Selection};
use crate::syntax;

use super::Document;

impl Document {
    /// Insert text at every cursor, replacing active selections
    pub fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text_len = text.chars().count();
        let owned = text.to_string();
        self.edit_per_cursor(|doc, cursor| {
            let mut ops = Vec::new();
            let at = doc.delete_selection_if_any(cursor, &mut ops);
            let offset = doc.table.position_to_offset(at);
            doc.table.insert(offset, &owned);
            ops.push(EditOp::Insert {
                position: at,
                text: owned.clone(),
            });
            Some((ops, offset + text_len))
        });
    }

    /// Delete the selection, or one char before each cursor
    pub fn backspace(&mut self) {
        self.edit_per_cursor(|doc, cursor| {
            let mut ops = Vec::new();
            if cursor.active_selection().is_some() {
                let at = doc.delete_selection_if_any(cursor, &mut ops);
                let offset = doc.table.position_to_offset(at);
                return Some((ops, offset));
            }
            let offset = doc.table.position_to_offset(cursor.position);
            if offset == 0 {
                return None;
            }
            let position = doc.table.offset_to_position(offset - 1);
            let removed = doc.table.delete(offset - 1, offset);
            ops.push(EditOp::Delete {
                position,
                text: removed,
            });
            Some((ops, offset - 1))
        });
    }

    /// Delete the selection, or one char after each cursor
    pub fn delete_forward(&mut self) {
        self.edit_per_cursor(|doc, cursor| {
            let mut ops = Vec::new();
            if cursor.active_selection().is_some() {
                let at = doc.delete_selection_if_any(cursor, &mut ops);
                let offset = doc.table.position_to_offset(at);
                return Some((ops, offset));
            }
            let offset = doc.table.position_to_offset(cursor.position);
            if offset >= doc.table.len() {
                return None;
            }
            let removed = doc.table.delete(offset, offset + 1);
            ops.push(EditOp::Delete {
                position: cursor.position,
                text: removed,
            });
            Some((ops, offset))
        });
    }

    /// Insert a newline plus computed indentation at every cursor
    ///
    /// In full auto-indent mode, a cursor sitting between an opener and
    /// its closer gets a blank indented line to land on plus a dedented
    /// line for the closer.
    pub fn newline(&mut self) {
        let opts = self.options;
        let unit = indent::indent_unit(opts.tab_size, opts.insert_spaces);
        self.edit_per_cursor(move |doc, cursor| {
            let mut ops = Vec::new();
            let at = doc.delete_selection_if_any(cursor, &mut ops);
            let line_text = doc.table.line(at.line);
            let before: String = line_text.chars().take(at.column).collect();
            let char_before = before.chars().last();
            let char_after = line_text.chars().nth(at.column);
            let computed =
                indent::new_line_indent(&before, char_before, char_after, opts.auto_indent, &unit);
            let text = match &computed.extra_line {
                Some(close_indent) => format!("\n{}\n{}", computed.indent, close_indent),
                None => format!("\n{}", computed.indent),
            };
            let offset = doc.table.position_to_offset(at);
            doc.table.insert(offset, &text);
            ops.push(EditOp::Insert { position: at, text });
            // the cursor lands at the end of the indented line either way
            Some((ops, offset + 1 + computed.indent.chars().count()))
        });
    }

    /// Insert a closing bracket, re-indenting the line to match its
    /// opener when the cursor sits on pure leading whitespace
    pub fn insert_with_auto_dedent(&mut self, ch: char) {
        let opts = self.options;
        if opts.auto_indent != AutoIndentMode::Full || !syntax::is_close_bracket(ch) {
            self.insert(&ch.to_string());
            return;
        }
        self.edit_per_cursor(move |doc, cursor| {
            let mut ops = Vec::new();
            let at = doc.delete_selection_if_any(cursor, &mut ops);
            let line_text = doc.table.line(at.line);
            let before: String = line_text.chars().take(at.column).collect();

            if indent::should_dedent_on_char(&before, ch) {
                let lines: Vec<String> =
                    (0..doc.table.line_count()).map(|i| doc.table.line(i)).collect();
                let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
                if let Some(target) = indent::matching_bracket_indent(&line_refs, at.line, ch) {
                    let line_start = doc.table.position_to_offset(Position::new(at.line, 0));
                    let removed = doc
                        .table
                        .delete(line_start, line_start + before.chars().count());
                    ops.push(EditOp::Delete {
                        position: Position::new(at.line, 0),
                        text: removed,
                    });
                    let inserted = format!("{target}{ch}");
                    doc.table.insert(line_start, &inserted);
                    let inserted_len = inserted.chars().count();
                    ops.push(EditOp::Insert {
                        position: Position::new(at.line, 0),
                        text: inserted,
                    });
                    return Some((ops, line_start + inserted_len));
                }
            }

            let offset = doc.table.position_to_offset(at);
            let text = ch.to_string();
            doc.table.insert(offset, &text);
            ops.push(EditOp::Insert { position: at, text });
            Some((ops, offset + 1))
        });
    }

    /// Remove up to one indent step from the start of every cursor line
    pub fn outdent(&mut self) {
        let cursors_before = self.cursors.snapshot();
        let snapshot = cursors_before.clone();
        let tab_size = self.options.tab_size;

        // distinct cursor lines, processed bottom-up
        let mut lines: Vec<usize> = snapshot.iter().map(|c| c.position.line).collect();
        lines.dedup();

        let mut ops = Vec::new();
        let mut removed_by_line: Vec<(usize, usize)> = Vec::new();
        for &line in lines.iter().rev() {
            let text = self.table.line(line);
            let width = outdent_width(&text, tab_size);
            if width == 0 {
                continue;
            }
            let start = self.table.position_to_offset(Position::new(line, 0));
            let removed = self.table.delete(start, start + width);
            ops.push(EditOp::Delete {
                position: Position::new(line, 0),
                text: removed,
            });
            removed_by_line.push((line, width));
        }
        if ops.is_empty() {
            return;
        }

        let adjust = |pos: Position| -> Position {
            match removed_by_line.iter().find(|&&(line, _)| line == pos.line) {
                Some(&(_, width)) => Position::new(pos.line, pos.column - pos.column.min(width)),
                None => pos,
            }
        };
        let new_cursors: Vec<Cursor> = snapshot
            .iter()
            .map(|c| {
                let mut cursor = *c;
                cursor.position = adjust(c.position);
                cursor.desired_column = cursor.position.column;
                cursor.selection = c
                    .selection
                    .map(|s| Selection::new(adjust(s.anchor), adjust(s.head)));
                cursor
            })
            .collect();
        self.cursors.restore(&new_cursors);
        self.finish_edit(ops, cursors_before);
    }

    /// Delete the active selection, recording the operation; returns the
    /// position the cursor collapses to
    fn delete_selection_if_any(&mut self, cursor: &Cursor, ops: &mut Vec<EditOp>) -> Position {
        if let Some(sel) = cursor.active_selection() {
            let start = self.table.position_to_offset(sel.min());
            let end = self.table.position_to_offset(sel.max());
            let removed = self.table.delete(start, end);
            ops.push(EditOp::Delete {
                position: sel.min(),
                text: removed,
            });
            sel.min()
        } else {
            cursor.position
        }
    }

    /// Run one editing step per cursor in offset-descending order
    ///
    /// The step applies its own piece-table edits and returns the
    /// recorded operations plus the cursor's raw landing offset (valid
    /// before the edits of lower cursors). Landing offsets are then
    /// shifted by the net size change of everything below, the cursor
    /// set is rebuilt, and the command is recorded as one undo action.
    fn edit_per_cursor<F>(&mut self, mut step: F)
    where
        F: FnMut(&mut Self, &Cursor) -> Option<(Vec<EditOp>, usize)>,
    {
        let cursors_before = self.cursors.snapshot();
        let snapshot = cursors_before.clone();

        let pre_offsets: Vec<usize> = snapshot
            .iter()
            .map(|c| self.table.position_to_offset(c.position))
            .collect();

        let mut ops: Vec<EditOp> = Vec::new();
        // (landing offset, net delta) per cursor
        let mut results: Vec<(usize, isize)> = snapshot
            .iter()
            .enumerate()
            .map(|(i, _)| (pre_offsets[i], 0))
            .collect();
        let mut edited = false;

        for i in (0..snapshot.len()).rev() {
            if let Some((cursor_ops, landing)) = step(self, &snapshot[i]) {
                let delta: isize = cursor_ops
                    .iter()
                    .map(|op| {
                        let len = op.text().chars().count() as isize;
                        match op {
                            EditOp::Insert { .. } => len,
                            EditOp::Delete { .. } => -len,
                        }
                    })
                    .sum();
                results[i] = (landing, delta);
                edited = true;
                ops.extend(cursor_ops);
            }
        }
        if !edited || ops.is_empty() {
            return;
        }

        let mut shift: isize = 0;
        let mut new_cursors = Vec::with_capacity(snapshot.len());
        for &(landing, delta) in &results {
            let adjusted = (landing as isize + shift) as usize;
            shift += delta;
            new_cursors.push(Cursor::new(self.table.offset_to_position(adjusted)));
        }
        self.cursors.restore(&new_cursors);
        self.finish_edit(ops, cursors_before);
    }
}

/// Chars removed from the line start by one outdent step: one tab, or up
/// to `tab_size` spaces
fn outdent_width(line: &str, tab_size: usize) -> usize {
    let mut chars = line.chars();
    match chars.next() {
        Some('\t') => 1,
        Some(' ') => {
            let mut width = 1;
            while width < tab_size && chars.next() == Some(' ') {
                width += 1;
            }
            width
        }
        _ => 0,
    }
}
