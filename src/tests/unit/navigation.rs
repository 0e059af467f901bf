//! Navigation Tests
//!
//! Step-to-step movement, validation gating and step completion markers.

use rstest::rstest;

use crate::core::wizard::{FieldValue, Transition, WizardError, WizardStatus};
use crate::tests::common::{blank_values, create_test_wizard, valid_values, RecordingAction};

// =============================================================================
// Advancing
// =============================================================================

#[tokio::test]
async fn test_next_reports_field_errors_and_stays() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());

    match wizard.next().await.unwrap() {
        Transition::Invalid(errors) => {
            assert_eq!(errors.get("name"), Some("name is a required field"));
        }
        other => panic!("expected Invalid, got {other:?}"),
    }
    assert_eq!(wizard.current_step(), 0);
    assert!(wizard.state().errors.contains("name"));
}

#[tokio::test]
async fn test_errors_clear_after_fix() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    wizard.next().await.unwrap();

    wizard.set_value("name", "Ada").unwrap();
    assert_eq!(
        wizard.next().await.unwrap(),
        Transition::Moved { from: 0, to: 1 }
    );
    assert!(wizard.state().errors.is_empty());
}

#[rstest]
#[case::missing(FieldValue::Null, Some("age is a required field"))]
#[case::not_a_number(FieldValue::from("abc"), Some("age must be a number"))]
#[case::too_low(FieldValue::from(17), Some("too young"))]
#[case::boundary(FieldValue::from(18), None)]
#[case::numeric_text(FieldValue::from("40"), None)]
#[tokio::test]
async fn test_age_step_validation(#[case] age: FieldValue, #[case] expected: Option<&str>) {
    let wizard = create_test_wizard(valid_values(), RecordingAction::new());
    wizard.jump_to(1).unwrap();
    wizard.set_value("age", age).unwrap();

    let t = wizard.next().await.unwrap();
    match expected {
        Some(message) => {
            let Transition::Invalid(errors) = t else {
                panic!("expected Invalid, got {t:?}");
            };
            assert_eq!(errors.get("age"), Some(message));
            assert_eq!(wizard.current_step(), 1);
        }
        None => assert_eq!(t, Transition::Moved { from: 1, to: 2 }),
    }
}

// =============================================================================
// Back / Jump
// =============================================================================

#[test]
fn test_back_at_first_step_is_rejected() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    assert_eq!(wizard.back(), Err(WizardError::AtFirstStep));
    assert_eq!(wizard.current_step(), 0);
}

#[test]
fn test_back_skips_validation_and_clears_errors() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    wizard.jump_to(2).unwrap();

    assert_eq!(wizard.back(), Ok(Transition::Moved { from: 2, to: 1 }));
    assert_eq!(wizard.back(), Ok(Transition::Moved { from: 1, to: 0 }));
}

#[rstest]
#[case("Who", 0)]
#[case("Age", 1)]
#[case("Notes", 2)]
fn test_jump_to_label(#[case] label: &str, #[case] index: usize) {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    wizard.jump_to_label(label).unwrap();
    assert_eq!(wizard.current_step(), index);
}

#[test]
fn test_jump_to_unknown_label() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    assert_eq!(
        wizard.jump_to_label("Nope"),
        Err(WizardError::UnknownLabel("Nope".to_string()))
    );
}

#[test]
fn test_values_survive_navigation() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    wizard.set_value("name", "Grace").unwrap();
    wizard.jump_to(2).unwrap();
    wizard.back().unwrap();
    wizard.jump_to(0).unwrap();
    assert_eq!(wizard.value("name"), Some(FieldValue::from("Grace")));
}

// =============================================================================
// Step Markers
// =============================================================================

#[test]
fn test_markers_follow_current_step() {
    let wizard = create_test_wizard(blank_values(), RecordingAction::new());
    wizard.jump_to(2).unwrap();

    let markers = wizard.step_markers();
    assert_eq!(markers.len(), 3);
    assert!(markers[0].completed && markers[1].completed);
    assert!(!markers[2].completed);
    assert!(markers[2].active);
    assert_eq!(markers[1].label, "Age");
}

#[tokio::test]
async fn test_all_markers_complete_after_submit() {
    let wizard = create_test_wizard(valid_values(), RecordingAction::new());
    wizard.jump_to(2).unwrap();
    wizard.next().await.unwrap();

    assert_eq!(wizard.status(), WizardStatus::Completed);
    assert!(wizard.step_markers().iter().all(|m| m.completed));
}
