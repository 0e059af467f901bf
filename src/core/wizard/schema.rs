//! Declarative Object Schemas
//!
//! A small rule language for step schemas, for hosts that would rather
//! describe constraints than hand-write a [`Schema`] closure:
//!
//! ```rust,ignore
//! use stepform::core::wizard::{ObjectSchema, Rule};
//!
//! let bank_accounts = ObjectSchema::new().field(
//!     "money",
//!     Rule::when(
//!         "millionaire",
//!         true,
//!         Rule::number().required().min(1_000_000.0, "You need to have 1 million."),
//!         Rule::number().required(),
//!     ),
//! );
//! ```
//!
//! Rules see the whole value store, so `Rule::When` can depend on a field
//! owned by another step.

use super::validation::{FieldErrors, Schema};
use super::values::{FieldValue, ValueStore};

/// A numeric or length limit with an optional custom message.
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T> {
    pub limit: T,
    pub message: Option<String>,
}

/// Constraint for a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// No constraint.
    Any,
    /// Value must be present (not null, not blank text).
    Required,
    /// Value must be numeric when present.
    Number {
        required: bool,
        min: Option<Bound<f64>>,
        max: Option<Bound<f64>>,
    },
    /// Value must be text when present.
    Text {
        required: bool,
        min_len: Option<Bound<usize>>,
        max_len: Option<Bound<usize>>,
    },
    /// Pick `then` when `field` equals `is`, otherwise `otherwise`.
    When {
        field: String,
        is: FieldValue,
        then: Box<Rule>,
        otherwise: Box<Rule>,
    },
}

impl Rule {
    pub fn present() -> Self {
        Rule::Required
    }

    pub fn number() -> Self {
        Rule::Number {
            required: false,
            min: None,
            max: None,
        }
    }

    pub fn text() -> Self {
        Rule::Text {
            required: false,
            min_len: None,
            max_len: None,
        }
    }

    pub fn when(
        field: impl Into<String>,
        is: impl Into<FieldValue>,
        then: Rule,
        otherwise: Rule,
    ) -> Self {
        Rule::When {
            field: field.into(),
            is: is.into(),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Mark a number or text rule as required. Other rules become
    /// [`Rule::Required`].
    pub fn required(self) -> Self {
        match self {
            Rule::Number { min, max, .. } => Rule::Number {
                required: true,
                min,
                max,
            },
            Rule::Text {
                min_len, max_len, ..
            } => Rule::Text {
                required: true,
                min_len,
                max_len,
            },
            _ => Rule::Required,
        }
    }

    /// Lower bound for a number rule.
    pub fn min(self, limit: f64, message: impl Into<String>) -> Self {
        match self {
            Rule::Number { required, max, .. } => Rule::Number {
                required,
                min: Some(Bound {
                    limit,
                    message: Some(message.into()),
                }),
                max,
            },
            other => other,
        }
    }

    /// Upper bound for a number rule.
    pub fn max(self, limit: f64, message: impl Into<String>) -> Self {
        match self {
            Rule::Number { required, min, .. } => Rule::Number {
                required,
                min,
                max: Some(Bound {
                    limit,
                    message: Some(message.into()),
                }),
            },
            other => other,
        }
    }

    /// Minimum character count for a text rule.
    pub fn min_len(self, limit: usize) -> Self {
        match self {
            Rule::Text {
                required, max_len, ..
            } => Rule::Text {
                required,
                min_len: Some(Bound {
                    limit,
                    message: None,
                }),
                max_len,
            },
            other => other,
        }
    }

    /// Maximum character count for a text rule.
    pub fn max_len(self, limit: usize) -> Self {
        match self {
            Rule::Text {
                required, min_len, ..
            } => Rule::Text {
                required,
                min_len,
                max_len: Some(Bound {
                    limit,
                    message: None,
                }),
            },
            other => other,
        }
    }

    /// Check `field` against this rule; returns the first failing message.
    pub fn check(&self, field: &str, values: &ValueStore) -> Option<String> {
        let value = values.field(field).unwrap_or(&FieldValue::Null);

        match self {
            Rule::Any => None,
            Rule::Required => value
                .is_blank()
                .then(|| format!("{field} is a required field")),
            Rule::Number { required, min, max } => {
                if value.is_blank() {
                    return required.then(|| format!("{field} is a required field"));
                }
                let Some(n) = value.as_number() else {
                    return Some(format!("{field} must be a number"));
                };
                if let Some(bound) = min {
                    if n < bound.limit {
                        return Some(bound.message.clone().unwrap_or_else(|| {
                            format!(
                                "{field} must be greater than or equal to {}",
                                bound.limit
                            )
                        }));
                    }
                }
                if let Some(bound) = max {
                    if n > bound.limit {
                        return Some(bound.message.clone().unwrap_or_else(|| {
                            format!("{field} must be less than or equal to {}", bound.limit)
                        }));
                    }
                }
                None
            }
            Rule::Text {
                required,
                min_len,
                max_len,
            } => {
                if value.is_blank() {
                    return required.then(|| format!("{field} is a required field"));
                }
                let Some(text) = value.as_text() else {
                    return Some(format!("{field} must be text"));
                };
                let len = text.chars().count();
                if let Some(bound) = min_len {
                    if len < bound.limit {
                        return Some(bound.message.clone().unwrap_or_else(|| {
                            format!("{field} must be at least {} characters", bound.limit)
                        }));
                    }
                }
                if let Some(bound) = max_len {
                    if len > bound.limit {
                        return Some(bound.message.clone().unwrap_or_else(|| {
                            format!("{field} must be at most {} characters", bound.limit)
                        }));
                    }
                }
                None
            }
            Rule::When {
                field: other,
                is,
                then,
                otherwise,
            } => {
                let branch_on = values.field(other).unwrap_or(&FieldValue::Null);
                if branch_on == is {
                    then.check(field, values)
                } else {
                    otherwise.check(field, values)
                }
            }
        }
    }
}

/// A set of per-field rules, checked in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    fields: Vec<(String, Rule)>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.fields.push((name.into(), rule));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, values: &ValueStore) -> FieldErrors {
        self.fields
            .iter()
            .filter_map(|(name, rule)| {
                rule.check(name, values)
                    .map(|message| (name.clone(), message))
            })
            .collect()
    }
}
