//! The bundled three-step demo form.
//!
//! Personal data, bank accounts, and a free-text description. The bank step's
//! rule depends on the millionaire checkbox from the first step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DemoConfig;
use crate::core::wizard::{
    submit_fn, FieldValue, ObjectSchema, Rule, Step, StepRegistry, SubmissionError, SubmitAction,
    ValueStore, WizardController, WizardResult,
};

pub const PERSONAL_DATA: &str = "Personal Data";
pub const BANK_ACCOUNTS: &str = "Bank Accounts";
pub const MORE_INFO: &str = "More info";

pub const MILLIONAIRE_MESSAGE: &str =
    "Because you said you are millionaire. You need to have 1 million.";

/// How a field is edited and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Checkbox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
}

const PERSONAL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "firstName",
        label: "First Name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "lastName",
        label: "Last Name",
        kind: FieldKind::Text,
    },
    FieldSpec {
        name: "millionaire",
        label: "I am a millionaire",
        kind: FieldKind::Checkbox,
    },
];

const BANK_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "money",
    label: "All the money I have",
    kind: FieldKind::Number,
}];

const MORE_INFO_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "description",
    label: "Description",
    kind: FieldKind::Text,
}];

/// Fields rendered on the step with the given label.
pub fn fields_for(label: &str) -> &'static [FieldSpec] {
    match label {
        PERSONAL_DATA => PERSONAL_FIELDS,
        BANK_ACCOUNTS => BANK_FIELDS,
        MORE_INFO => MORE_INFO_FIELDS,
        _ => &[],
    }
}

pub fn initial_values() -> ValueStore {
    ValueStore::new([
        ("firstName", FieldValue::from("")),
        ("lastName", FieldValue::from("")),
        ("millionaire", FieldValue::from(false)),
        ("money", FieldValue::from(0)),
        ("description", FieldValue::from("")),
    ])
}

/// `money` is always required; millionaires need at least one million.
pub fn bank_accounts_schema() -> ObjectSchema {
    ObjectSchema::new().field(
        "money",
        Rule::when(
            "millionaire",
            true,
            Rule::number()
                .required()
                .min(1_000_000.0, MILLIONAIRE_MESSAGE),
            Rule::number().required(),
        ),
    )
}

pub fn registry() -> WizardResult<StepRegistry> {
    let step = |label: &str| {
        Step::new(label).with_fields(fields_for(label).iter().map(|f| f.name))
    };

    StepRegistry::new(vec![
        step(PERSONAL_DATA),
        step(BANK_ACCOUNTS).with_schema(bank_accounts_schema()),
        step(MORE_INFO),
    ])
}

/// Submit action that waits `submit_delay_ms`, then logs the values.
///
/// With `fail_first_submit` the first call is rejected as a simulated
/// network failure.
pub fn submit_action(config: &DemoConfig) -> Arc<dyn SubmitAction> {
    let delay = Duration::from_millis(config.submit_delay_ms);
    let fail_next = Arc::new(AtomicBool::new(config.fail_first_submit));

    Arc::new(submit_fn(move |values: ValueStore| {
        let fail = fail_next.swap(false, Ordering::SeqCst);
        async move {
            tokio::time::sleep(delay).await;
            if fail {
                return Err(SubmissionError::Failed(
                    "simulated network failure".to_string(),
                ));
            }
            tracing::info!(values = %values.to_json(), "Form submitted");
            Ok(())
        }
    }))
}

pub fn build(config: &DemoConfig) -> WizardResult<WizardController> {
    Ok(WizardController::new(
        registry()?,
        initial_values(),
        submit_action(config),
    ))
}
