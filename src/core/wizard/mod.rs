//! Multi-Step Form Wizard
//!
//! Drives a user through an ordered sequence of form steps that share one
//! value store, validating each step before moving forward and running a
//! single submit action at the end.
//!
//! # Overview
//!
//! - [`ValueStore`]: cumulative field values shared by every step
//! - [`ValidationEngine`] / [`Schema`]: per-step rules evaluated against the
//!   whole store, so a rule may depend on an earlier step's answer
//! - [`ObjectSchema`] / [`Rule`]: a declarative schema builder
//! - [`StepRegistry`]: the fixed, ordered list of [`Step`]s
//! - [`SubmissionGate`]: at most one in-flight submit per wizard
//! - [`WizardController`]: the state machine tying it all together
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stepform::core::wizard::*;
//!
//! let registry = StepRegistry::new(vec![
//!     Step::new("Personal Data").with_fields(["firstName"]),
//!     Step::new("More info"),
//! ])?;
//! let wizard = WizardController::new(
//!     registry,
//!     ValueStore::new([("firstName", "")]),
//!     Arc::new(submit_fn(|values| async move { save(values).await })),
//! );
//!
//! wizard.set_value("firstName", "Ada")?;
//! wizard.next().await?;              // Editing(1)
//! wizard.next().await?;              // Submitting -> Completed
//! ```

mod controller;
mod error;
mod schema;
mod steps;
mod submission;
mod validation;
mod values;

pub use controller::*;
pub use error::*;
pub use schema::*;
pub use steps::*;
pub use submission::*;
pub use validation::*;
pub use values::*;
