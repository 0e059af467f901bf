//! Crate-internal test suites.
//!
//! - `common`: fixtures shared by the suites below
//! - `mocks`: mockall-backed submit actions
//! - `property`: proptest invariants for the controller and schema rules
//! - `unit`: scenario tests over the public controller API

mod mocks;
mod property;
mod unit;
