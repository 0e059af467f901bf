//! Field Value Store
//!
//! Holds the single cumulative mapping of field name to value that every
//! wizard step reads from and writes to. The store never validates; that is
//! the job of [`super::validation::ValidationEngine`].

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============================================================================
// FieldValue
// ============================================================================

/// A single untyped form value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    /// Unset / cleared input
    #[default]
    Null,
    /// Checkbox-style input
    Bool(bool),
    /// Numeric input
    Number(f64),
    /// Free text input
    Text(String),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of the value.
    ///
    /// Text that parses as a number is accepted, the way a browser number
    /// input hands its value over as a string. NaN is never a number, and
    /// text spellings of infinity (`"inf"`) are not accepted either.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True for `Null` and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

// ============================================================================
// ValueStore
// ============================================================================

/// Cumulative field values shared by all steps of one wizard.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueStore {
    values: IndexMap<String, FieldValue>,
}

impl ValueStore {
    /// Create a store seeded with the caller's initial values.
    pub fn new<I, K, V>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            values: initial
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The whole mapping, in insertion order.
    pub fn get(&self) -> &IndexMap<String, FieldValue> {
        &self.values
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Set (or overwrite) a field. Fields not present in the initial values
    /// are appended.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(field.into(), value.into());
    }

    /// Owned copy frozen at call time, handed to the submit action.
    pub fn snapshot(&self) -> ValueStore {
        self.clone()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.values).unwrap_or(serde_json::Value::Null)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for ValueStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ValueStore::new(iter)
    }
}

// ============================================================================
// Tests
// ============================================================================
