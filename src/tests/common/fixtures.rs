//! Test Fixtures
//!
//! Wizards over a small three-step registry, and a submit action that
//! records what it was called with.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::wizard::{
    FieldErrors, FieldValue, ObjectSchema, Rule, Step, StepRegistry, SubmissionError,
    SubmitAction, ValueStore, WizardController,
};

// =============================================================================
// Registry Fixtures
// =============================================================================

/// `name` (required) → `age` (number ≥ 18) → `notes` (no schema).
pub fn create_test_registry() -> StepRegistry {
    StepRegistry::new(vec![
        Step::new("Who")
            .with_fields(["name"])
            .with_schema(ObjectSchema::new().field("name", Rule::text().required())),
        Step::new("Age").with_fields(["age"]).with_schema(
            ObjectSchema::new().field("age", Rule::number().required().min(18.0, "too young")),
        ),
        Step::new("Notes").with_fields(["notes"]),
    ])
    .expect("valid registry")
}

/// Initial values that fail the first two steps.
pub fn blank_values() -> ValueStore {
    ValueStore::new([
        ("name", FieldValue::from("")),
        ("age", FieldValue::Null),
        ("notes", FieldValue::from("")),
    ])
}

/// Values that pass every step.
pub fn valid_values() -> ValueStore {
    ValueStore::new([
        ("name", FieldValue::from("Ada")),
        ("age", FieldValue::from(36)),
        ("notes", FieldValue::from("hello")),
    ])
}

/// A registry of `len` steps with no schemas.
pub fn create_open_registry(len: usize) -> StepRegistry {
    StepRegistry::new((0..len).map(|i| Step::new(format!("Step {i}"))).collect())
        .expect("valid registry")
}

/// A registry of `len` steps whose every schema rejects.
pub fn create_blocking_registry(len: usize) -> StepRegistry {
    let reject = |_: &ValueStore| -> FieldErrors {
        [("blocked".to_string(), "always invalid".to_string())]
            .into_iter()
            .collect()
    };
    StepRegistry::new(
        (0..len)
            .map(|i| Step::new(format!("Step {i}")).with_schema(reject))
            .collect(),
    )
    .expect("valid registry")
}

// =============================================================================
// Submit Action Fixtures
// =============================================================================

/// Records every submission and answers from a queue of outcomes
/// (`Ok(())` once the queue is empty).
#[derive(Default)]
pub struct RecordingAction {
    calls: Mutex<Vec<ValueStore>>,
    outcomes: Mutex<VecDeque<Result<(), SubmissionError>>>,
}

impl RecordingAction {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_outcomes(
        outcomes: impl IntoIterator<Item = Result<(), SubmissionError>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::default(),
            outcomes: Mutex::new(outcomes.into_iter().collect()),
        })
    }

    pub fn calls(&self) -> Vec<ValueStore> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmitAction for RecordingAction {
    async fn submit(&self, values: ValueStore) -> Result<(), SubmissionError> {
        self.calls.lock().unwrap().push(values);
        self.outcomes.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

// =============================================================================
// Wizard Fixtures
// =============================================================================

pub fn create_test_wizard(values: ValueStore, action: Arc<dyn SubmitAction>) -> WizardController {
    WizardController::new(create_test_registry(), values, action)
}

/// A wizard with valid values and a fresh [`RecordingAction`].
pub fn create_valid_wizard() -> (WizardController, Arc<RecordingAction>) {
    let action = RecordingAction::new();
    let wizard = create_test_wizard(valid_values(), action.clone());
    (wizard, action)
}
