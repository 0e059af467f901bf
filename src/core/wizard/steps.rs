//! Step Registry
//!
//! The ordered, immutable list of steps a wizard walks through. Built once
//! when the wizard is created; there are no mutation operations afterwards.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::error::{WizardError, WizardResult};
use super::validation::Schema;

// ============================================================================
// Step
// ============================================================================

/// One page of the wizard.
#[derive(Clone)]
pub struct Step {
    label: String,
    schema: Option<Arc<dyn Schema>>,
    owned_fields: Vec<String>,
}

impl Step {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            schema: None,
            owned_fields: Vec::new(),
        }
    }

    pub fn with_schema(mut self, schema: impl Schema + 'static) -> Self {
        self.schema = Some(Arc::new(schema));
        self
    }

    /// Fields rendered on this step. Informational only: any step may read or
    /// write any field.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owned_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn schema(&self) -> Option<&dyn Schema> {
        self.schema.as_deref()
    }

    pub fn owned_fields(&self) -> &[String] {
        &self.owned_fields
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("has_schema", &self.schema.is_some())
            .field("owned_fields", &self.owned_fields)
            .finish()
    }
}

// ============================================================================
// StepRegistry
// ============================================================================

/// Ordered sequence of steps, indices `0..len()`.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Arc<[Step]>,
}

impl StepRegistry {
    /// Build a registry. Requires at least one step and unique labels.
    pub fn new(steps: Vec<Step>) -> WizardResult<Self> {
        if steps.is_empty() {
            return Err(WizardError::NoSteps);
        }

        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.label()) {
                return Err(WizardError::DuplicateLabel(step.label().to_string()));
            }
        }

        Ok(Self {
            steps: steps.into(),
        })
    }

    pub fn step_at(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: construction rejects an empty step list.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn index_of_last(&self) -> usize {
        self.steps.len() - 1
    }

    /// Index of the step with the given label.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.label() == label)
    }

    /// Schema lookup by index; `None` for out-of-range indices and for steps
    /// without a schema.
    pub fn schema_for(&self, index: usize) -> Option<&dyn Schema> {
        self.step_at(index).and_then(Step::schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.steps.iter().map(Step::label).collect()
    }
}
