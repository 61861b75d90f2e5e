//! Tests for indentation helpers and the auto-pair table

use super::*;

#[test]
fn test_leading_whitespace() {
    assert_eq!(leading_whitespace("    x"), "    ");
    assert_eq!(leading_whitespace("\t\t y"), "\t\t ");
    assert_eq!(leading_whitespace("none"), "");
    assert_eq!(leading_whitespace("   "), "   ");
    assert_eq!(leading_whitespace(""), "");
}

#[test]
fn test_indent_unit() {
    assert_eq!(indent_unit(2, true), "  ");
    assert_eq!(indent_unit(4, true), "    ");
    assert_eq!(indent_unit(4, false), "\t");
}

#[test]
fn test_new_line_indent_none() {
    let result = new_line_indent("    foo {", Some('{'), None, AutoIndentMode::None, "  ");
    assert_eq!(result.indent, "");
    assert!(result.extra_line.is_none());
}

#[test]
fn test_new_line_indent_keep() {
    let result = new_line_indent("    foo", Some('o'), None, AutoIndentMode::Keep, "  ");
    assert_eq!(result.indent, "    ");
    assert!(result.extra_line.is_none());
}

#[test]
fn test_new_line_indent_full_after_opener() {
    let result = new_line_indent("  if x {", Some('{'), None, AutoIndentMode::Full, "  ");
    assert_eq!(result.indent, "    ");
    assert!(result.extra_line.is_none());
}

#[test]
fn test_new_line_indent_full_between_pair() {
    let result = new_line_indent("if (x) {", Some('{'), Some('}'), AutoIndentMode::Full, "  ");
    assert_eq!(result.indent, "  ");
    assert_eq!(result.extra_line.as_deref(), Some(""));
}

#[test]
fn test_new_line_indent_mismatched_pair_gets_no_extra_line() {
    let result = new_line_indent("a {", Some('{'), Some(']'), AutoIndentMode::Full, "  ");
    assert_eq!(result.indent, "  ");
    assert!(result.extra_line.is_none());
}

#[test]
fn test_should_dedent_on_char() {
    assert!(should_dedent_on_char("    ", '}'));
    assert!(should_dedent_on_char("\t", ']'));
    assert!(!should_dedent_on_char("  x", '}'));
    assert!(!should_dedent_on_char("", '}'));
    assert!(!should_dedent_on_char("    ", 'a'));
}

#[test]
fn test_matching_bracket_indent() {
    let lines = ["  if (x) {", "    y();", "    "];
    assert_eq!(matching_bracket_indent(&lines, 2, '}').as_deref(), Some("  "));
    assert_eq!(matching_bracket_indent(&lines, 2, ')'), None);
}

#[test]
fn test_closing_pair_table() {
    assert_eq!(closing_pair('{'), Some('}'));
    assert_eq!(closing_pair('('), Some(')'));
    assert_eq!(closing_pair('"'), Some('"'));
    assert_eq!(closing_pair('`'), Some('`'));
    assert_eq!(closing_pair('}'), None);
    assert_eq!(closing_pair('x'), None);
}

#[test]
fn test_should_auto_pair_suppressed_before_text() {
    assert!(should_auto_pair('(', None));
    assert!(should_auto_pair('(', Some(' ')));
    assert!(should_auto_pair('(', Some(')')));
    assert!(should_auto_pair('[', Some('}')));
    assert!(!should_auto_pair('(', Some('w')));
    assert!(!should_auto_pair('x', None));
}

#[test]
fn test_should_skip_closing() {
    assert!(should_skip_closing(')', Some(')')));
    assert!(should_skip_closing('"', Some('"')));
    assert!(!should_skip_closing(')', Some('}')));
    assert!(!should_skip_closing(')', None));
    assert!(!should_skip_closing('(', Some('(')));
}

#[test]
fn test_should_delete_pair() {
    assert!(should_delete_pair(Some('('), Some(')')));
    assert!(should_delete_pair(Some('"'), Some('"')));
    assert!(!should_delete_pair(Some('('), Some(']')));
    assert!(!should_delete_pair(None, Some(')')));
    assert!(!should_delete_pair(Some('('), None));
}

#[test]
fn test_detect_indent_spaces() {
    let text = "fn main() {\n    let a = 1;\n    if a > 0 {\n        go();\n    }\n}\n";
    assert_eq!(detect_indent_style(text), Some(IndentStyle::Spaces(4)));
}

#[test]
fn test_detect_indent_tabs() {
    let text = "fn main() {\n\tlet a = 1;\n\tif a > 0 {\n\t\tgo();\n\t}\n}\n";
    assert_eq!(detect_indent_style(text), Some(IndentStyle::Tabs));
}

#[test]
fn test_detect_indent_unindented_text() {
    assert_eq!(detect_indent_style("plain\ntext\nonly\n"), None);
}
