//! Text editing buffer for a single form field.
//!
//! Loaded from the wizard's current [`FieldValue`] when a field gains focus
//! and converted back after every keystroke.

use crate::core::wizard::FieldValue;
use crate::tui::form::FieldKind;

pub struct FieldEditor {
    kind: FieldKind,
    content: String,
    cursor: usize,
}

impl FieldEditor {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            content: String::new(),
            cursor: 0,
        }
    }

    /// Replace the buffer with `value`, cursor at the end.
    pub fn load(&mut self, kind: FieldKind, value: Option<&FieldValue>) {
        self.kind = kind;
        self.content = value.map(ToString::to_string).unwrap_or_default();
        self.cursor = self.content.len();
    }

    /// The buffer as a store value. A blank number field becomes `Null`;
    /// number fields keep unparseable text so validation can report it.
    /// Checkboxes never reach the editor's buffer; they are toggled directly.
    pub fn to_value(&self) -> FieldValue {
        let trimmed = self.content.trim();
        if self.kind != FieldKind::Number {
            return FieldValue::Text(self.content.clone());
        }
        if trimmed.is_empty() {
            return FieldValue::Null;
        }
        trimmed
            .parse::<f64>()
            .map(FieldValue::Number)
            .unwrap_or_else(|_| FieldValue::Text(self.content.clone()))
    }

    /// Insert a character; number fields only accept numeric characters.
    /// Returns whether the buffer changed.
    pub fn insert_char(&mut self, c: char) -> bool {
        let accepted = match self.kind {
            FieldKind::Text => !c.is_control(),
            FieldKind::Number => c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E'),
            FieldKind::Checkbox => false,
        };
        if accepted {
            self.content.insert(self.cursor, c);
            self.cursor += c.len_utf8();
        }
        accepted
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0);
        self.content.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.content.len() {
            return false;
        }
        let next = self.content[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.content.len());
        self.content.drain(self.cursor..next);
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.content[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.content[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.content.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters, for placing the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.content[..self.cursor].chars().count()
    }
}
