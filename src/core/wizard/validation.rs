//! Validation Engine
//!
//! A step's schema is opaque to the wizard: it is anything implementing
//! [`Schema`], evaluated against the *entire* [`ValueStore`] so that a rule
//! may branch on a value entered in an earlier step. Failures are reported
//! as data ([`FieldErrors`]), never as faults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::values::ValueStore;

// ============================================================================
// FieldErrors
// ============================================================================

/// Per-field validation messages, in the order the schema produced them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    errors: IndexMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`. The first message recorded for a field
    /// wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn first(&self) -> Option<(&str, &str)> {
        self.errors
            .first()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldErrors {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut errors = FieldErrors::new();
        for (field, message) in iter {
            errors.insert(field, message);
        }
        errors
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Validation rules for one step.
///
/// Implementations must be pure functions of the value store.
pub trait Schema: Send + Sync {
    fn validate(&self, values: &ValueStore) -> FieldErrors;
}

impl<F> Schema for F
where
    F: Fn(&ValueStore) -> FieldErrors + Send + Sync,
{
    fn validate(&self, values: &ValueStore) -> FieldErrors {
        self(values)
    }
}

// ============================================================================
// ValidationEngine
// ============================================================================

/// Runs a step's schema against the value store.
pub struct ValidationEngine;

impl ValidationEngine {
    /// Validate `values` against `schema`.
    ///
    /// A step without a schema is always valid.
    pub fn validate(schema: Option<&dyn Schema>, values: &ValueStore) -> Result<(), FieldErrors> {
        let Some(schema) = schema else {
            return Ok(());
        };

        let errors = schema.validate(values);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
