//! Terminal host for the demo wizard.
//!
//! Elm-style loop in [`app`], the bundled three-step form in [`form`].

pub mod app;
pub mod events;
pub mod form;
pub mod theme;
pub mod widgets;
