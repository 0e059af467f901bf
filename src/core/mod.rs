//! Core wizard engine and its ambient services.

pub mod logging;
pub mod wizard;
