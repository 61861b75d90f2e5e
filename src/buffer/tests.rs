//! Tests for the piece table

use super::PieceTable;
use crate::position::Position;

#[test]
fn test_new_empty() {
    let table = PieceTable::new("");
    assert_eq!(table.len(), 0);
    assert!(table.is_empty());
    assert_eq!(table.line_count(), 1);
    assert_eq!(table.content(), "");
    assert_eq!(table.version(), 0);
}

#[test]
fn test_new_from_text() {
    let table = PieceTable::new("hello\nworld");
    assert_eq!(table.len(), 11);
    assert_eq!(table.line_count(), 2);
    assert_eq!(table.content(), "hello\nworld");
}

#[test]
fn test_insert_at_start_middle_end() {
    let mut table = PieceTable::new("bd");
    table.insert(0, "a");
    assert_eq!(table.content(), "abd");
    table.insert(2, "c");
    assert_eq!(table.content(), "abcd");
    table.insert(4, "e");
    assert_eq!(table.content(), "abcde");
}

#[test]
fn test_insert_at_piece_boundary() {
    let mut table = PieceTable::new("ad");
    table.insert(1, "b");
    // offset 2 is the boundary between the add piece and the suffix
    table.insert(2, "c");
    assert_eq!(table.content(), "abcd");
}

#[test]
fn test_insert_empty_is_noop() {
    let mut table = PieceTable::new("abc");
    let version = table.version();
    table.insert(1, "");
    assert_eq!(table.version(), version);
    assert_eq!(table.content(), "abc");
}

#[test]
fn test_insert_clamps_offset() {
    let mut table = PieceTable::new("ab");
    table.insert(100, "c");
    assert_eq!(table.content(), "abc");
}

#[test]
fn test_delete_exactly_one_piece() {
    let mut table = PieceTable::new("abc");
    table.insert(3, "def");
    assert_eq!(table.delete(3, 6), "def");
    assert_eq!(table.content(), "abc");
}

#[test]
fn test_delete_straddles_piece_middle() {
    let mut table = PieceTable::new("abcdef");
    assert_eq!(table.delete(2, 4), "cd");
    assert_eq!(table.content(), "abef");
}

#[test]
fn test_delete_spans_many_pieces() {
    let mut table = PieceTable::new("ab");
    table.insert(2, "cd");
    table.insert(4, "ef");
    assert_eq!(table.content(), "abcdef");
    assert_eq!(table.delete(1, 5), "bcde");
    assert_eq!(table.content(), "af");
}

#[test]
fn test_delete_empty_range_is_noop() {
    let mut table = PieceTable::new("abc");
    let version = table.version();
    assert_eq!(table.delete(2, 2), "");
    assert_eq!(table.delete(5, 9), "");
    assert_eq!(table.version(), version);
}

#[test]
fn test_replace() {
    let mut table = PieceTable::new("hello world");
    assert_eq!(table.replace(6, 11, "there"), "world");
    assert_eq!(table.content(), "hello there");
}

#[test]
fn test_version_strictly_increases() {
    let mut table = PieceTable::new("abc");
    let mut last = table.version();
    let mut step = |table: &PieceTable| {
        assert!(table.version() > last);
        last = table.version();
    };
    table.insert(0, "x");
    step(&table);
    table.delete(0, 1);
    step(&table);
    let snapshot = table.snapshot();
    table.restore(&snapshot);
    step(&table);
}

#[test]
fn test_line_queries() {
    let table = PieceTable::new("one\ntwo\nthree");
    assert_eq!(table.line(0), "one");
    assert_eq!(table.line(1), "two");
    assert_eq!(table.line(2), "three");
    assert_eq!(table.line(3), "");
    assert_eq!(table.line_length(0), 3);
    assert_eq!(table.line_length(2), 5);
    assert_eq!(table.line_length(9), 0);
}

#[test]
fn test_lines_never_contain_newline() {
    let table = PieceTable::new("a\n\nb\n");
    for line in 0..table.line_count() {
        assert!(!table.line(line).contains('\n'));
    }
}

#[test]
fn test_position_offset_round_trip() {
    let mut table = PieceTable::new("ab\ncde\n\nf");
    table.insert(3, "X\nY");
    for offset in 0..=table.len() {
        let pos = table.offset_to_position(offset);
        assert_eq!(table.position_to_offset(pos), offset);
    }
}

#[test]
fn test_position_to_offset_clamps() {
    let table = PieceTable::new("ab\ncd");
    // column past the line end clamps to the line end
    assert_eq!(table.position_to_offset(Position::new(0, 99)), 2);
    // line past the last clamps to the document end
    assert_eq!(table.position_to_offset(Position::new(9, 0)), 5);
}

#[test]
fn test_offset_to_position_clamps() {
    let table = PieceTable::new("ab\ncd");
    assert_eq!(table.offset_to_position(99), Position::new(1, 2));
}

#[test]
fn test_line_index_consistency_after_edits() {
    let mut table = PieceTable::new("one\ntwo");
    table.insert(3, "\nmid");
    table.delete(0, 2);
    for line in 0..table.line_count() {
        let offset = table.position_to_offset(Position::new(line, 0));
        assert_eq!(table.offset_to_position(offset), Position::new(line, 0));
    }
}

#[test]
fn test_text_in_ranges() {
    let table = PieceTable::new("one\ntwo\nthree");
    assert_eq!(table.text_in_offset_range(0, 3), "one");
    assert_eq!(table.text_in_offset_range(2, 6), "e\ntw");
    assert_eq!(table.text_in_offset_range(6, 2), "");
    assert_eq!(
        table.text_in_range(Position::new(0, 1), Position::new(1, 1)),
        "ne\nt"
    );
}

#[test]
fn test_char_at() {
    let mut table = PieceTable::new("ab");
    table.insert(1, "c");
    assert_eq!(table.char_at(0), Some('a'));
    assert_eq!(table.char_at(1), Some('c'));
    assert_eq!(table.char_at(2), Some('b'));
    assert_eq!(table.char_at(3), None);
}

#[test]
fn test_snapshot_restore() {
    let mut table = PieceTable::new("hello");
    table.insert(5, " world");
    let snapshot = table.snapshot();
    table.delete(0, 6);
    assert_eq!(table.content(), "world");
    table.restore(&snapshot);
    assert_eq!(table.content(), "hello world");
    assert_eq!(table.line_count(), 1);
}

#[test]
fn test_unicode_offsets_count_scalars() {
    let mut table = PieceTable::new("aé漢\nb");
    assert_eq!(table.len(), 5);
    assert_eq!(table.line_length(0), 3);
    table.insert(2, "🦀");
    assert_eq!(table.content(), "aé🦀漢\nb");
    assert_eq!(table.offset_to_position(5), Position::new(1, 0));
}

// Model test: apply the same edit script to the table and to a plain
// String, then compare content, length, and line structure.
#[test]
fn test_matches_string_model() {
    enum Op {
        Insert(usize, &'static str),
        Delete(usize, usize),
    }
    let script = [
        Op::Insert(0, "fn main() {\n}\n"),
        Op::Insert(12, "    let x = 1;\n"),
        Op::Delete(4, 8),
        Op::Insert(4, "run"),
        Op::Delete(0, 3),
        Op::Insert(24, "\n\n"),
        Op::Delete(10, 11),
        Op::Insert(0, "// top\n"),
    ];

    let mut table = PieceTable::new("");
    let mut model = String::new();
    for op in &script {
        match *op {
            Op::Insert(offset, text) => {
                table.insert(offset, text);
                let byte = model
                    .char_indices()
                    .nth(offset)
                    .map_or(model.len(), |(b, _)| b);
                model.insert_str(byte, text);
            }
            Op::Delete(start, end) => {
                table.delete(start, end);
                let byte_of = |s: &String, n: usize| {
                    s.char_indices().nth(n).map_or(s.len(), |(b, _)| b)
                };
                let (b_start, b_end) = (byte_of(&model, start), byte_of(&model, end));
                model.replace_range(b_start..b_end, "");
            }
        }
        assert_eq!(table.content(), model);
        assert_eq!(table.len(), model.chars().count());
        assert!(table.validate().is_ok());
    }
    assert_eq!(
        table.line_count(),
        model.split('\n').count(),
        "line count disagrees with the model"
    );
}
