//! Motion commands and multi-cursor helpers
//!
//! Motion never mutates text and never emits change events, only cursor
//! events. Horizontal moves reset each cursor's desired column; vertical
//! moves preserve it and clamp the column to the target line length.

use crate::movement::words;
use crate::position::{Position, Selection};

use super::Document;

impl Document {
    /// Move every cursor one char left
    ///
    /// Without `extend`, an active selection collapses to its start.
    pub fn move_left(&mut self, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| {
                if !extend {
                    if let Some(sel) = c.active_selection() {
                        return sel.min();
                    }
                }
                let offset = table.position_to_offset(c.position);
                if offset == 0 {
                    c.position
                } else {
                    table.offset_to_position(offset - 1)
                }
            },
            extend,
        );
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    /// Move every cursor one char right
    ///
    /// Without `extend`, an active selection collapses to its end.
    pub fn move_right(&mut self, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| {
                if !extend {
                    if let Some(sel) = c.active_selection() {
                        return sel.max();
                    }
                }
                let offset = table.position_to_offset(c.position);
                if offset >= table.len() {
                    c.position
                } else {
                    table.offset_to_position(offset + 1)
                }
            },
            extend,
        );
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    pub fn move_up(&mut self, extend: bool) {
        self.move_vertical(-1, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        self.move_vertical(1, extend);
    }

    /// Move one page up; the caller supplies the page height in rows
    pub fn move_page_up(&mut self, rows: usize, extend: bool) {
        self.move_vertical(-(rows as isize), extend);
    }

    /// Move one page down; the caller supplies the page height in rows
    pub fn move_page_down(&mut self, rows: usize, extend: bool) {
        self.move_vertical(rows as isize, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        self.cursors
            .move_cursors(|c| Position::new(c.position.line, 0), extend);
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| Position::new(c.position.line, table.line_length(c.position.line)),
            extend,
        );
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.cursors.move_cursors(|_| Position::origin(), extend);
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    pub fn move_document_end(&mut self, extend: bool) {
        let end = self.table.offset_to_position(self.table.len());
        self.cursors.move_cursors(|_| end, extend);
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    /// Move to the start of the previous word
    pub fn move_word_left(&mut self, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| {
                let offset = table.position_to_offset(c.position);
                table.offset_to_position(words::prev_word_offset(table, offset))
            },
            extend,
        );
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    /// Move to the start of the next word
    pub fn move_word_right(&mut self, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| {
                let offset = table.position_to_offset(c.position);
                table.offset_to_position(words::next_word_offset(table, offset))
            },
            extend,
        );
        self.cursors.update_desired_columns();
        self.emit_cursor_change();
    }

    /// Collapse to one cursor selecting the whole document
    pub fn select_all(&mut self) {
        let end = self.table.offset_to_position(self.table.len());
        self.cursors.select_all(end);
        self.emit_cursor_change();
    }

    /// Expand every cursor to cover its full line(s), trailing newline
    /// included
    pub fn select_line(&mut self) {
        let table = &self.table;
        let selections: Vec<Selection> = self
            .cursors
            .all()
            .iter()
            .map(|c| {
                let (first, last) = match c.active_selection() {
                    Some(sel) => (sel.min().line, sel.max().line),
                    None => (c.position.line, c.position.line),
                };
                let start = Position::new(first, 0);
                let end = if last + 1 < table.line_count() {
                    Position::new(last + 1, 0)
                } else {
                    table.offset_to_position(table.len())
                };
                Selection::new(start, end)
            })
            .collect();
        self.cursors.set_selections(&selections);
        self.emit_cursor_change();
    }

    /// Select the word under the primary cursor, or add a cursor at the
    /// next occurrence of the primary selection
    ///
    /// The search starts after the last cursor and wraps to the document
    /// start; an occurrence that already carries a cursor is not
    /// re-added.
    pub fn select_next_occurrence(&mut self) {
        let primary = *self.cursors.primary();
        let needle = match primary.active_selection() {
            Some(sel) => self.table.text_in_range(sel.min(), sel.max()),
            None => {
                if self.select_word_under_primary() {
                    self.emit_cursor_change();
                }
                return;
            }
        };
        let needle_chars: Vec<char> = needle.chars().collect();
        if needle_chars.is_empty() {
            return;
        }

        let content: Vec<char> = self.table.chars().collect();
        let last = *self.cursors.all().last().unwrap();
        let from = match last.active_selection() {
            Some(sel) => self.table.position_to_offset(sel.max()),
            None => self.table.position_to_offset(last.position),
        };
        let found = find_occurrence(&content, &needle_chars, from)
            .or_else(|| find_occurrence(&content, &needle_chars, 0));
        let start_offset = match found {
            Some(offset) => offset,
            None => return,
        };

        let start = self.table.offset_to_position(start_offset);
        let end = self.table.offset_to_position(start_offset + needle_chars.len());
        if self.cursors.all().iter().any(|c| c.position == end) {
            return;
        }
        self.cursors.add_cursor_with_selection(start, end);
        self.emit_cursor_change();
    }

    /// Replace the cursor set with one cursor per occurrence of the
    /// primary selection (or the word under the cursor)
    pub fn select_all_occurrences(&mut self) {
        let primary = *self.cursors.primary();
        let needle = match primary.active_selection() {
            Some(sel) => self.table.text_in_range(sel.min(), sel.max()),
            None => {
                let line_text = self.table.line(primary.position.line);
                match words::word_range_at(&line_text, primary.position.column) {
                    Some((start, end)) => {
                        line_text.chars().skip(start).take(end - start).collect()
                    }
                    None => return,
                }
            }
        };
        let needle_chars: Vec<char> = needle.chars().collect();
        if needle_chars.is_empty() {
            return;
        }

        let content: Vec<char> = self.table.chars().collect();
        let mut selections = Vec::new();
        let mut from = 0;
        while let Some(found) = find_occurrence(&content, &needle_chars, from) {
            let start = self.table.offset_to_position(found);
            let end = self.table.offset_to_position(found + needle_chars.len());
            selections.push(Selection::new(start, end));
            from = found + needle_chars.len();
        }
        if selections.is_empty() {
            return;
        }
        self.cursors.set_selections(&selections);
        self.emit_cursor_change();
    }

    /// Add a cursor one line above the topmost cursor
    pub fn add_cursor_above(&mut self) {
        let first = *self.cursors.all().first().unwrap();
        if first.position.line == 0 {
            return;
        }
        let line = first.position.line - 1;
        let column = first.desired_column.min(self.table.line_length(line));
        self.cursors.add_cursor(Position::new(line, column));
        self.emit_cursor_change();
    }

    /// Add a cursor one line below the bottommost cursor
    pub fn add_cursor_below(&mut self) {
        let last = *self.cursors.all().last().unwrap();
        if last.position.line + 1 >= self.table.line_count() {
            return;
        }
        let line = last.position.line + 1;
        let column = last.desired_column.min(self.table.line_length(line));
        self.cursors.add_cursor(Position::new(line, column));
        self.emit_cursor_change();
    }

    /// Convert each multi-line selection into one selection per covered
    /// line
    pub fn split_selection_into_lines(&mut self) {
        let table = &self.table;
        let mut selections = Vec::new();
        for cursor in self.cursors.all() {
            match cursor.active_selection() {
                Some(sel) if sel.max().line > sel.min().line => {
                    let (start, end) = (sel.min(), sel.max());
                    for line in start.line..=end.line {
                        if line == start.line {
                            selections.push(Selection::new(
                                start,
                                Position::new(line, table.line_length(line)),
                            ));
                        } else if line == end.line {
                            // a selection ending at column 0 covers none
                            // of this line
                            if end.column > 0 {
                                selections.push(Selection::new(Position::new(line, 0), end));
                            }
                        } else {
                            selections.push(Selection::new(
                                Position::new(line, 0),
                                Position::new(line, table.line_length(line)),
                            ));
                        }
                    }
                }
                Some(sel) => selections.push(sel),
                None => selections.push(Selection::caret(cursor.position)),
            }
        }
        self.cursors.set_selections(&selections);
        self.emit_cursor_change();
    }

    /// Give the primary cursor a selection over the word under it
    fn select_word_under_primary(&mut self) -> bool {
        let primary = *self.cursors.primary();
        let line = primary.position.line;
        let line_text = self.table.line(line);
        match words::word_range_at(&line_text, primary.position.column) {
            Some((start, end)) => {
                self.cursors.set_position(Position::new(line, start), false);
                self.cursors.set_position(Position::new(line, end), true);
                true
            }
            None => false,
        }
    }

    fn move_vertical(&mut self, delta: isize, extend: bool) {
        let table = &self.table;
        self.cursors.move_cursors(
            |c| {
                let line = c.position.line as isize + delta;
                if line < 0 {
                    return Position::origin();
                }
                let line = line as usize;
                if line >= table.line_count() {
                    return table.offset_to_position(table.len());
                }
                Position::new(line, c.desired_column.min(table.line_length(line)))
            },
            extend,
        );
        self.emit_cursor_change();
    }
}

/// First occurrence of `needle` at or after `from`, by char offset
fn find_occurrence(content: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || content.len() < needle.len() {
        return None;
    }
    (from..=content.len() - needle.len()).find(|&i| content[i..i + needle.len()] == *needle)
}
