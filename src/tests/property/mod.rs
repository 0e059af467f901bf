//! Property-based tests for the wizard
//!
//! ## Test Modules
//!
//! - `controller_props`: navigation invariants of the state machine
//!   - `back` from step i > 0 lands on i - 1 regardless of validity
//!   - `jump_to` any in-range index succeeds without validating
//!   - an invalid `next` never moves the wizard
//!   - the current step stays in range under any command sequence
//!
//! - `schema_props`: declarative rule behaviour
//!   - number bounds accept exactly the values inside them
//!   - `when` picks its branch from the other field
//!
//! By default proptest runs 256 cases per property; override with
//! `PROPTEST_CASES`.

mod schema_props;
