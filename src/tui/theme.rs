//! Teal & Coral color theme for the wizard TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Teal: primary accent, active step, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x00, 0x80, 0x80);
/// Light teal: highlights, hints.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x00, 0x96, 0x88);

/// Coral: calls to action (Next / Submit).
pub const ACCENT: Color = Color::Rgb(0xFF, 0x7F, 0x50);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Charcoal: base background.
pub const BG_BASE: Color = Color::Rgb(0x0A, 0x19, 0x19);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Disabled buttons, future steps.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Validation and submission failures.
pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
/// Completed steps, done view.
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
/// In-flight submission.
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// The step the user is on.
pub fn step_active() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

pub fn step_completed() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn step_pending() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn error() -> Style {
    Style::default().fg(ERROR)
}

pub fn button_enabled() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn button_busy() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(WARNING)
        .add_modifier(Modifier::BOLD)
}

pub fn button_disabled() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[Enter] next").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text() -> Style {
    Style::default().fg(TEXT)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
