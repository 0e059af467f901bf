/// stepform - Multi-Step Form Wizard Orchestrator
///
/// Core library providing the step-wizard state machine, its validation
/// engine and value store, plus a terminal front end that hosts it.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
