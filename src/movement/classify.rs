//! Character classification for movement operations

/// Check if a character is part of a word: exactly `[A-Za-z0-9_]`
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
