use crate::core::wizard::{Transition, WizardResult};

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for the spinner and notice TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A `next` / `submit` command resolved on its task.
    Advanced(WizardResult<Transition>),
    /// Request to quit the application.
    Quit,
}

/// High-level actions resolved from key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Next,
    Back,
    /// Step label "click": jump without validation.
    JumpTo(usize),
    FocusNext,
    FocusPrev,
    Toggle,
    Quit,
}

/// Notice severity for the banner line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A short-lived message shown above the buttons.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            ttl_ticks: 60,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            ttl_ticks: 100,
        }
    }
}
