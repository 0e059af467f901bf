//! Reusable TUI widgets.

pub mod field_editor;
