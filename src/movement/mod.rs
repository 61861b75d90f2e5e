//! Word semantics for cursor motion
//!
//! A word character is exactly `[A-Za-z0-9_]`; everything else,
//! whitespace and newlines included, is a boundary. This means:
//! - `hello_world` is ONE word (underscore is a word character)
//! - `foo->bar` is two words separated by `->`
//! - non-ASCII letters are not word characters
//!
//! ## Modules
//!
//! - [`classify`] - Character classification functions
//! - [`words`] - Offset-based word boundary scans over the buffer

pub mod classify;
pub mod words;

pub use classify::is_word_char;
