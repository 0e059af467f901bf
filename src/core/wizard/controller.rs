//! Wizard Controller
//!
//! The step-wizard state machine. States are `Editing(i)` for every step
//! index, `Submitting` and the terminal `Completed`:
//!
//! ```text
//!   Editing(0) --next/valid--> Editing(1) --...--> Editing(N-1)
//!        ^  <------back-------     |                    |
//!        |                          jump_to(k)           next/valid
//!        |                                               v
//!        |                     Editing(N-1) <--fail-- Submitting --ok--> Completed
//! ```
//!
//! `next` and `submit` validate the current step against its schema before
//! moving; `back` and `jump_to` never validate. `jump_to` mirrors clicking a
//! step label: it can leave earlier steps unvalidated, and the step markers
//! will still show them as complete.
//!
//! The controller is a cheap handle (`Clone`) over shared state, so a host
//! can keep issuing commands while a submission is suspended; those commands
//! are rejected with [`WizardError::SubmissionInProgress`] and leave the
//! state untouched. The submit action runs on its own task: dropping the
//! future returned by [`WizardController::submit`] does not cancel it, and
//! the controller still lands in `Completed` or back in `Editing`.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::error::{SubmissionError, WizardError, WizardResult};
use super::steps::StepRegistry;
use super::submission::{SubmissionGate, SubmitAction};
use super::validation::{FieldErrors, ValidationEngine};
use super::values::{FieldValue, ValueStore};

// ============================================================================
// State Types
// ============================================================================

/// Lifecycle status of a wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    Editing,
    Submitting,
    Completed,
}

impl WizardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStatus::Editing => "editing",
            WizardStatus::Submitting => "submitting",
            WizardStatus::Completed => "completed",
        }
    }
}

/// Observable wizard state, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// Index of the displayed step; always within `0..steps`
    pub current_step: usize,
    pub status: WizardStatus,
    /// Validation messages for the current step
    pub errors: FieldErrors,
    /// Outcome of the last failed submission, for a banner
    pub submission_error: Option<SubmissionError>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WizardState {
    fn new() -> Self {
        Self {
            current_step: 0,
            status: WizardStatus::Editing,
            errors: FieldErrors::new(),
            submission_error: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Cosmetic "done" marker for a step label. Says nothing about whether
    /// the step's data was ever validated.
    pub fn is_step_complete(&self, index: usize) -> bool {
        index < self.current_step || self.status == WizardStatus::Completed
    }
}

/// Per-step display info for a stepper header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepMarker {
    pub index: usize,
    pub label: String,
    pub active: bool,
    pub completed: bool,
}

/// Result of a command that was accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Moved between steps
    Moved { from: usize, to: usize },
    /// Current step failed validation; the wizard stayed put
    Invalid(FieldErrors),
    /// The submit action succeeded; the wizard is finished
    Completed,
}

// ============================================================================
// WizardController
// ============================================================================

struct Inner {
    state: WizardState,
    values: ValueStore,
}

struct Shared {
    id: Uuid,
    registry: StepRegistry,
    action: Arc<dyn SubmitAction>,
    gate: SubmissionGate,
    inner: RwLock<Inner>,
    status_tx: watch::Sender<WizardStatus>,
}

impl Shared {
    // The lock is never held across an await point.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, inner: &mut Inner, status: WizardStatus) {
        inner.state.status = status;
        self.status_tx.send_replace(status);
    }

    /// Apply the outcome of a submission that was started from the last step.
    fn finish_submission(&self, result: Result<(), SubmissionError>) -> WizardResult<Transition> {
        let mut inner = self.write();
        let last = self.registry.index_of_last();

        match result {
            Ok(()) => {
                inner.state.completed_at = Some(Utc::now());
                inner.state.submission_error = None;
                self.set_status(&mut inner, WizardStatus::Completed);
                tracing::info!(wizard_id = %self.id, "Wizard completed");
                Ok(Transition::Completed)
            }
            Err(err) => {
                inner.state.current_step = last;
                inner.state.submission_error = Some(err.clone());
                self.set_status(&mut inner, WizardStatus::Editing);
                tracing::warn!(wizard_id = %self.id, error = %err, "Submission failed");
                Err(WizardError::Submission(err))
            }
        }
    }
}

fn ensure_editing(state: &WizardState) -> WizardResult<()> {
    match state.status {
        WizardStatus::Editing => Ok(()),
        WizardStatus::Submitting => Err(WizardError::SubmissionInProgress),
        WizardStatus::Completed => Err(WizardError::AlreadyCompleted),
    }
}

/// Drives one wizard instance.
#[derive(Clone)]
pub struct WizardController {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for WizardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WizardController")
            .field("id", &self.shared.id)
            .field("steps", &self.shared.registry.len())
            .field("state", &self.shared.read().state)
            .finish()
    }
}

impl WizardController {
    /// Create a wizard in `Editing(0)`.
    pub fn new(
        registry: StepRegistry,
        initial_values: ValueStore,
        action: Arc<dyn SubmitAction>,
    ) -> Self {
        let id = Uuid::new_v4();
        let (status_tx, _) = watch::channel(WizardStatus::Editing);

        tracing::info!(
            wizard_id = %id,
            steps = registry.len(),
            fields = initial_values.len(),
            "Wizard created"
        );

        Self {
            shared: Arc::new(Shared {
                id,
                registry,
                action,
                gate: SubmissionGate::new(),
                inner: RwLock::new(Inner {
                    state: WizardState::new(),
                    values: initial_values,
                }),
                status_tx,
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.shared.registry
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn state(&self) -> WizardState {
        self.shared.read().state.clone()
    }

    pub fn values(&self) -> ValueStore {
        self.shared.read().values.snapshot()
    }

    pub fn value(&self, field: &str) -> Option<FieldValue> {
        self.shared.read().values.field(field).cloned()
    }

    pub fn current_step(&self) -> usize {
        self.shared.read().state.current_step
    }

    pub fn status(&self) -> WizardStatus {
        self.shared.read().state.status
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step() == self.shared.registry.index_of_last()
    }

    pub fn is_completed(&self) -> bool {
        self.status() == WizardStatus::Completed
    }

    pub fn is_step_complete(&self, index: usize) -> bool {
        self.shared.read().state.is_step_complete(index)
    }

    pub fn step_markers(&self) -> Vec<StepMarker> {
        let inner = self.shared.read();
        self.shared
            .registry
            .iter()
            .enumerate()
            .map(|(index, step)| StepMarker {
                index,
                label: step.label().to_string(),
                active: index == inner.state.current_step,
                completed: inner.state.is_step_complete(index),
            })
            .collect()
    }

    /// Status updates; yields `Completed` once the submit action succeeds.
    pub fn completion(&self) -> watch::Receiver<WizardStatus> {
        self.shared.status_tx.subscribe()
    }

    /// Resolve once the wizard reaches `Completed`.
    pub async fn wait_completed(&self) {
        let mut rx = self.completion();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(|status| *status == WizardStatus::Completed).await;
    }

    // ── Commands ────────────────────────────────────────────────────────

    /// Edit a field. Rejected while submitting and after completion.
    pub fn set_value(
        &self,
        field: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> WizardResult<()> {
        let mut inner = self.shared.write();
        ensure_editing(&inner.state)?;

        let field = field.into();
        tracing::trace!(wizard_id = %self.shared.id, field = %field, "Field updated");
        inner.values.set(field, value);
        Ok(())
    }

    /// Retreat one step without validating the current one.
    pub fn back(&self) -> WizardResult<Transition> {
        let mut inner = self.shared.write();
        ensure_editing(&inner.state)?;

        let from = inner.state.current_step;
        if from == 0 {
            return Err(WizardError::AtFirstStep);
        }

        let to = from - 1;
        inner.state.current_step = to;
        inner.state.errors.clear();
        tracing::debug!(wizard_id = %self.shared.id, from, to, "Moved back");
        Ok(Transition::Moved { from, to })
    }

    /// Move straight to step `index` without validating the current step.
    pub fn jump_to(&self, index: usize) -> WizardResult<Transition> {
        let mut inner = self.shared.write();
        ensure_editing(&inner.state)?;

        let len = self.shared.registry.len();
        if index >= len {
            return Err(WizardError::IndexOutOfRange { index, len });
        }

        let from = inner.state.current_step;
        inner.state.current_step = index;
        inner.state.errors.clear();
        tracing::debug!(wizard_id = %self.shared.id, from, to = index, "Jumped to step");
        Ok(Transition::Moved { from, to: index })
    }

    /// [`jump_to`](Self::jump_to) by step label.
    pub fn jump_to_label(&self, label: &str) -> WizardResult<Transition> {
        let index = self
            .shared
            .registry
            .position(label)
            .ok_or_else(|| WizardError::UnknownLabel(label.to_string()))?;
        self.jump_to(index)
    }

    /// Validate the current step and advance; on the last step this submits.
    pub async fn next(&self) -> WizardResult<Transition> {
        self.submit().await
    }

    /// Validate the current step; advance when it is not the last one,
    /// otherwise run the submit action.
    ///
    /// A failed submission returns `Err(WizardError::Submission(_))`, leaves
    /// the wizard on the last step and keeps every entered value.
    pub async fn submit(&self) -> WizardResult<Transition> {
        let snapshot = {
            let mut inner = self.shared.write();
            ensure_editing(&inner.state)?;

            let from = inner.state.current_step;
            let schema = self.shared.registry.schema_for(from);
            if let Err(errors) = ValidationEngine::validate(schema, &inner.values) {
                tracing::debug!(
                    wizard_id = %self.shared.id,
                    step = from,
                    errors = errors.len(),
                    "Step failed validation"
                );
                inner.state.errors = errors.clone();
                return Ok(Transition::Invalid(errors));
            }

            inner.state.errors.clear();

            if from < self.shared.registry.index_of_last() {
                let to = from + 1;
                inner.state.current_step = to;
                tracing::debug!(wizard_id = %self.shared.id, from, to, "Advanced");
                return Ok(Transition::Moved { from, to });
            }

            inner.state.submission_error = None;
            self.shared.set_status(&mut inner, WizardStatus::Submitting);
            tracing::info!(wizard_id = %self.shared.id, "Submitting");
            inner.values.snapshot()
        };

        let shared = self.shared.clone();
        let task = tokio::spawn(async move {
            let outcome = AssertUnwindSafe(shared.gate.run(shared.action.as_ref(), snapshot))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| {
                    Err(SubmissionError::Failed("submit action panicked".to_string()))
                });
            shared.finish_submission(outcome)
        });

        match task.await {
            Ok(result) => result,
            // The task body cannot panic past catch_unwind; this only covers
            // runtime shutdown.
            Err(join_err) => Err(WizardError::Submission(SubmissionError::Failed(
                join_err.to_string(),
            ))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
