//! Wizard Error Types

use serde::{Deserialize, Serialize};

/// Errors produced by the external submit action, or by the gate guarding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SubmissionError {
    #[error("Submission rejected: {0}")]
    Rejected(String),

    #[error("Submission failed: {0}")]
    Failed(String),

    #[error("A submission is already in flight")]
    Busy,
}

/// Errors that can occur during wizard operations.
///
/// Every variant leaves the wizard usable; rejected commands do not change
/// its state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WizardError {
    #[error("A wizard needs at least one step")]
    NoSteps,

    #[error("Duplicate step label: {0}")]
    DuplicateLabel(String),

    #[error("Unknown step label: {0}")]
    UnknownLabel(String),

    #[error("Step index {index} out of range (wizard has {len} steps)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Submission in progress")]
    SubmissionInProgress,

    #[error("Wizard already completed")]
    AlreadyCompleted,

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

pub type WizardResult<T> = Result<T, WizardError>;
