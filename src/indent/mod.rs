//! Indentation helpers for newline and bracket keystrokes
//!
//! Pure functions consumed by the document's `newline` and
//! `insert_with_auto_dedent` commands, plus the auto-pair table the
//! caller's keystroke handling composes with.

use serde::{Deserialize, Serialize};

use crate::syntax;

/// How aggressively new lines are indented
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoIndentMode {
    /// Never indent
    None,
    /// Copy the previous line's indentation
    Keep,
    /// Additionally open a block after a trailing opener and dedent on
    /// closing brackets
    #[default]
    Full,
}

/// Result of computing the indentation for a new line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewLineIndent {
    /// Leading whitespace for the line the cursor lands on
    pub indent: String,
    /// When the cursor sat between an opener and its closer: the
    /// indentation for the extra line that carries the closer
    pub extra_line: Option<String>,
}

/// Longest run of spaces and tabs at the start of a line
#[must_use]
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(_, c)| c != ' ' && c != '\t')
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// One logical indentation step
#[must_use]
pub fn indent_unit(tab_size: usize, insert_spaces: bool) -> String {
    if insert_spaces {
        " ".repeat(tab_size)
    } else {
        "\t".to_string()
    }
}

/// Indentation for the line created by a newline keystroke
///
/// `line_before_cursor` is the current line's content up to the cursor;
/// `char_before` and `char_after` surround the cursor.
#[must_use]
pub fn new_line_indent(
    line_before_cursor: &str,
    char_before: Option<char>,
    char_after: Option<char>,
    mode: AutoIndentMode,
    unit: &str,
) -> NewLineIndent {
    let base = leading_whitespace(line_before_cursor);
    match mode {
        AutoIndentMode::None => NewLineIndent {
            indent: String::new(),
            extra_line: None,
        },
        AutoIndentMode::Keep => NewLineIndent {
            indent: base.to_string(),
            extra_line: None,
        },
        AutoIndentMode::Full => {
            let opens_block = char_before.is_some_and(syntax::is_open_bracket);
            let mut indent = base.to_string();
            let mut extra_line = None;
            if opens_block {
                indent.push_str(unit);
                let closes = match (char_before, char_after) {
                    (Some(open), Some(after)) => syntax::matching_bracket(open) == Some(after),
                    _ => false,
                };
                if closes {
                    extra_line = Some(base.to_string());
                }
            }
            NewLineIndent { indent, extra_line }
        }
    }
}

/// Check if typing `ch` on a whitespace-only line should re-indent it
#[must_use]
pub fn should_dedent_on_char(line_before_cursor: &str, ch: char) -> bool {
    syntax::is_close_bracket(ch)
        && !line_before_cursor.is_empty()
        && line_before_cursor.chars().all(|c| c == ' ' || c == '\t')
}

/// Indentation of the line holding the opener that `close_char` matches
///
/// `current_line` is the line the closer is being typed on; the scan
/// covers everything above it.
#[must_use]
pub fn matching_bracket_indent(
    lines: &[&str],
    current_line: usize,
    close_char: char,
) -> Option<String> {
    let open_pos = syntax::find_unmatched_open(
        lines,
        crate::position::Position::new(current_line, 0),
        close_char,
    )?;
    Some(leading_whitespace(lines[open_pos.line]).to_string())
}

/// Auto-pair table: openers and the closers typed for them
const AUTO_PAIRS: [(char, char); 6] = [
    ('{', '}'),
    ('[', ']'),
    ('(', ')'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

/// The closer automatically inserted after `ch`, if `ch` opens a pair
#[must_use]
pub fn closing_pair(ch: char) -> Option<char> {
    AUTO_PAIRS
        .iter()
        .find(|&&(open, _)| open == ch)
        .map(|&(_, close)| close)
}

fn is_any_closer(ch: char) -> bool {
    AUTO_PAIRS.iter().any(|&(_, close)| close == ch)
}

/// Check if typing `ch` should insert its closing pair
///
/// Pairing is suppressed when the character after the cursor is
/// non-whitespace and not itself a closer, so `"(` typed before `word`
/// stays a lone bracket.
#[must_use]
pub fn should_auto_pair(ch: char, char_after: Option<char>) -> bool {
    if closing_pair(ch).is_none() {
        return false;
    }
    match char_after {
        None => true,
        Some(after) => after.is_whitespace() || is_any_closer(after),
    }
}

/// Check if typing `ch` should step over an identical closer instead of
/// inserting (typing-over behavior)
#[must_use]
pub fn should_skip_closing(ch: char, char_after: Option<char>) -> bool {
    is_any_closer(ch) && char_after == Some(ch)
}

/// Check if backspace between `char_before` and `char_after` should
/// delete both halves of a pair
#[must_use]
pub fn should_delete_pair(char_before: Option<char>, char_after: Option<char>) -> bool {
    match (char_before, char_after) {
        (Some(before), Some(after)) => closing_pair(before) == Some(after),
        _ => false,
    }
}

/// Detected indentation style of a document
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndentStyle {
    Tabs,
    Spaces(usize),
}

/// Attempt to detect the indentation style used in a document
///
/// Builds a histogram of indentation increases between subsequent lines
/// over the first 1000 lines and returns a style only when the winner is
/// clearly ahead.
#[must_use]
pub fn detect_indent_style(text: &str) -> Option<IndentStyle> {
    // Index 0 counts tabs, 1..=8 count space increases of that width
    let mut histogram = [0usize; 9];
    let mut prev_count = 0usize;
    let mut prev_is_tabs = false;

    for line in text.lines().take(1000) {
        let ws = leading_whitespace(line);
        if ws.len() == line.len() {
            // blank or whitespace-only lines carry no signal
            continue;
        }
        let is_tabs = ws.starts_with('\t');
        let count = ws.chars().count();
        if count > 256 {
            continue;
        }

        if count > prev_count && (prev_is_tabs == is_tabs || prev_count == 0) {
            if is_tabs {
                histogram[0] += 1;
            } else {
                let step = count - prev_count;
                if step <= 8 {
                    histogram[step] += 1;
                }
            }
        }
        prev_count = count;
        prev_is_tabs = is_tabs;
    }

    // Tabs are a strong signal on their own
    histogram[0] *= 2;

    let (best, best_freq) = histogram
        .iter()
        .enumerate()
        .max_by_key(|&(_, freq)| *freq)
        .map(|(i, freq)| (i, *freq))?;
    let runner_up = histogram
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != best)
        .map(|(_, freq)| *freq)
        .max()
        .unwrap_or(0);

    if best_freq >= 1 && (runner_up as f64 / best_freq as f64) < 0.66 {
        Some(match best {
            0 => IndentStyle::Tabs,
            n => IndentStyle::Spaces(n),
        })
    } else {
        None
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
