//! Unit-level scenario tests over the wizard's public API.

mod navigation;
mod submission;
