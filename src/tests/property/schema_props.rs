//! Property-based tests for declarative schema rules
//!
//! Tests invariants:
//! - a bounded number rule accepts exactly the values inside its bounds
//! - a required rule rejects blank text of any width
//! - `when` checks the branch selected by the other field

use proptest::prelude::*;

use crate::core::wizard::{FieldValue, ObjectSchema, Rule, Schema, ValueStore};

proptest! {
    #[test]
    fn prop_number_bounds(n in -1_000.0f64..1_000.0, lo in -500.0f64..0.0, hi in 0.0f64..500.0) {
        let rule = Rule::number().required().min(lo, "low").max(hi, "high");
        let values = ValueStore::new([("n", FieldValue::Number(n))]);

        let expected = if n < lo {
            Some("low".to_string())
        } else if n > hi {
            Some("high".to_string())
        } else {
            None
        };
        prop_assert_eq!(rule.check("n", &values), expected);
    }

    #[test]
    fn prop_numeric_text_is_checked_as_number(n in 0u32..10_000) {
        let rule = Rule::number().min(5_000.0, "low");
        let values = ValueStore::new([("n", FieldValue::from(n.to_string()))]);
        prop_assert_eq!(rule.check("n", &values).is_none(), n >= 5_000);
    }

    #[test]
    fn prop_required_rejects_whitespace(blank in "[ \t]{0,12}") {
        let values = ValueStore::new([("name", FieldValue::from(blank))]);
        prop_assert_eq!(
            Rule::text().required().check("name", &values),
            Some("name is a required field".to_string())
        );
    }

    #[test]
    fn prop_when_selects_branch(flag: bool, money in 0.0f64..2_000_000.0) {
        let schema = ObjectSchema::new().field(
            "money",
            Rule::when(
                "millionaire",
                true,
                Rule::number().required().min(1_000_000.0, "need a million"),
                Rule::number().required(),
            ),
        );
        let values = ValueStore::new([
            ("millionaire", FieldValue::Bool(flag)),
            ("money", FieldValue::Number(money)),
        ]);

        let errors = schema.validate(&values);
        prop_assert_eq!(errors.contains("money"), flag && money < 1_000_000.0);
    }
}
