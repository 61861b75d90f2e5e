//! Ember editing core - piece-table document buffer with multi-cursor
//! editing, linear undo/redo, bracket matching, and auto-indent
//!
//! The core is a passive, single-threaded data structure: every command
//! completes synchronously, out-of-range inputs are clamped, and the
//! monotonic version counter is the change-detection protocol for
//! everything layered on top.

pub mod buffer;
pub mod cursor;
pub mod document;
pub mod error;
pub mod history;
pub mod indent;
pub mod movement;
pub mod position;
pub mod syntax;
