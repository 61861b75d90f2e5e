//! Lexical bracket matching
//!
//! Pure queries over an immutable snapshot of document lines: given a
//! cursor position, find the matching pair the cursor touches, or the
//! innermost pair enclosing it. Matching is lexical: it has no notion
//! of strings or comments and will pair brackets across them.
//!
//! The three bracket types track depth independently; `(` never closes
//! against `]`.

use crate::position::Position;

const PAIRS: [(char, char); 3] = [('(', ')'), ('[', ']'), ('{', '}')];

/// A matched pair of bracket positions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BracketMatch {
    pub open: Position,
    pub close: Position,
}

/// The partner of a bracket character, in either direction
#[must_use]
pub fn matching_bracket(c: char) -> Option<char> {
    for (open, close) in PAIRS {
        if c == open {
            return Some(close);
        }
        if c == close {
            return Some(open);
        }
    }
    None
}

#[must_use]
pub fn is_open_bracket(c: char) -> bool {
    PAIRS.iter().any(|&(open, _)| c == open)
}

#[must_use]
pub fn is_close_bracket(c: char) -> bool {
    PAIRS.iter().any(|&(_, close)| c == close)
}

/// Find the pair the cursor touches, or the pair enclosing it
///
/// A bracket at the cursor wins over one just before the cursor, which
/// wins over the enclosing scan. The enclosing pair is returned only
/// while the cursor sits at or before its closer. Unmatched brackets
/// return `None`.
#[must_use]
pub fn find_matching_bracket(lines: &[&str], position: Position) -> Option<BracketMatch> {
    let chars: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
    if chars.is_empty() {
        return None;
    }

    if let Some(m) = match_at(&chars, position) {
        return Some(m);
    }
    if position.column > 0 {
        let before = Position::new(position.line, position.column - 1);
        if let Some(m) = match_at(&chars, before) {
            return Some(m);
        }
    }

    enclosing_pair(&chars, position)
}

/// The unmatched opener for `close` strictly before `position`
///
/// Scans backward counting depth for this bracket type only.
#[must_use]
pub fn find_unmatched_open(lines: &[&str], position: Position, close: char) -> Option<Position> {
    let open = matching_bracket(close)?;
    let chars: Vec<Vec<char>> = lines.iter().map(|l| l.chars().collect()).collect();
    backward_match(&chars, position, open, close)
}

/// Match the bracket sitting exactly at `pos`, if any
fn match_at(chars: &[Vec<char>], pos: Position) -> Option<BracketMatch> {
    let c = *chars.get(pos.line)?.get(pos.column)?;
    if is_open_bracket(c) {
        let close = matching_bracket(c)?;
        let close_pos = forward_match(chars, pos, c, close)?;
        Some(BracketMatch {
            open: pos,
            close: close_pos,
        })
    } else if is_close_bracket(c) {
        let open = matching_bracket(c)?;
        let open_pos = backward_match(chars, pos, open, c)?;
        Some(BracketMatch {
            open: open_pos,
            close: pos,
        })
    } else {
        None
    }
}

/// Innermost pair around the cursor
///
/// Finds the nearest unmatched opener before the cursor, tracking a
/// separate depth per bracket type, then matches it forward.
fn enclosing_pair(chars: &[Vec<char>], pos: Position) -> Option<BracketMatch> {
    let mut depth = [0usize; PAIRS.len()];
    let mut found: Option<(Position, usize)> = None;

    'scan: for line in (0..=pos.line.min(chars.len() - 1)).rev() {
        let row = &chars[line];
        let upper = if line == pos.line {
            pos.column.min(row.len())
        } else {
            row.len()
        };
        for col in (0..upper).rev() {
            let c = row[col];
            for (t, (open, close)) in PAIRS.iter().enumerate() {
                if c == *close {
                    depth[t] += 1;
                } else if c == *open {
                    if depth[t] == 0 {
                        found = Some((Position::new(line, col), t));
                        break 'scan;
                    }
                    depth[t] -= 1;
                }
            }
        }
    }

    let (open_pos, t) = found?;
    let (open, close) = PAIRS[t];
    let close_pos = forward_match(chars, open_pos, open, close)?;

    // Enclosing only while the cursor sits at or before the closer
    if abs_offset(chars, pos) <= abs_offset(chars, close_pos) {
        Some(BracketMatch {
            open: open_pos,
            close: close_pos,
        })
    } else {
        None
    }
}

/// Closer matching the opener at `from`, scanning forward
fn forward_match(chars: &[Vec<char>], from: Position, open: char, close: char) -> Option<Position> {
    let mut depth = 0usize;
    for line in from.line..chars.len() {
        let row = &chars[line];
        let start = if line == from.line { from.column + 1 } else { 0 };
        for col in start..row.len() {
            let c = row[col];
            if c == open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    return Some(Position::new(line, col));
                }
                depth -= 1;
            }
        }
    }
    None
}

/// Opener matching the closer at `from`, scanning backward
fn backward_match(chars: &[Vec<char>], from: Position, open: char, close: char) -> Option<Position> {
    if chars.is_empty() {
        return None;
    }
    let mut depth = 0usize;
    for line in (0..=from.line.min(chars.len() - 1)).rev() {
        let row = &chars[line];
        let upper = if line == from.line {
            from.column.min(row.len())
        } else {
            row.len()
        };
        for col in (0..upper).rev() {
            let c = row[col];
            if c == close {
                depth += 1;
            } else if c == open {
                if depth == 0 {
                    return Some(Position::new(line, col));
                }
                depth -= 1;
            }
        }
    }
    None
}

/// Absolute offset of a position in the joined snapshot
fn abs_offset(chars: &[Vec<char>], pos: Position) -> usize {
    let mut offset = 0;
    for row in chars.iter().take(pos.line) {
        offset += row.len() + 1;
    }
    offset + pos.column
}
