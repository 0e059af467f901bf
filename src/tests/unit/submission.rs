//! Submission Tests
//!
//! Final-step submission, failure and retry, and the single-flight guarantee.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::core::wizard::{
    submit_fn, FieldValue, SubmissionError, SubmitAction, Transition, ValueStore, WizardError,
    WizardStatus,
};
use crate::tests::common::{create_test_wizard, create_valid_wizard, valid_values, RecordingAction};
use crate::tests::mocks::{mock_action_never, mock_action_sequence};

// =============================================================================
// Success / Failure
// =============================================================================

#[tokio::test]
async fn test_submit_passes_all_values() {
    let (wizard, action) = create_valid_wizard();
    wizard.jump_to(2).unwrap();

    assert_eq!(wizard.next().await.unwrap(), Transition::Completed);

    let calls = action.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], valid_values());
    assert!(wizard.state().completed_at.is_some());
}

#[tokio::test]
async fn test_submit_before_last_step_only_advances() {
    let wizard = create_test_wizard(valid_values(), mock_action_never());
    assert_eq!(
        wizard.submit().await.unwrap(),
        Transition::Moved { from: 0, to: 1 }
    );
    assert_eq!(wizard.status(), WizardStatus::Editing);
}

#[tokio::test]
async fn test_failure_then_retry() {
    let wizard = create_test_wizard(
        valid_values(),
        mock_action_sequence(vec![
            Err(SubmissionError::Rejected("duplicate".into())),
            Ok(()),
        ]),
    );
    wizard.jump_to(2).unwrap();

    let err = wizard.next().await.unwrap_err();
    assert_eq!(
        err,
        WizardError::Submission(SubmissionError::Rejected("duplicate".into()))
    );

    let state = wizard.state();
    assert_eq!(state.status, WizardStatus::Editing);
    assert_eq!(state.current_step, 2);
    assert_eq!(
        state.submission_error,
        Some(SubmissionError::Rejected("duplicate".into()))
    );
    assert_eq!(wizard.values(), valid_values());

    assert_eq!(wizard.next().await.unwrap(), Transition::Completed);
    assert!(wizard.state().submission_error.is_none());
}

#[tokio::test]
async fn test_completed_is_terminal() {
    let (wizard, action) = create_valid_wizard();
    wizard.jump_to(2).unwrap();
    wizard.next().await.unwrap();

    assert_eq!(wizard.next().await, Err(WizardError::AlreadyCompleted));
    assert_eq!(wizard.back(), Err(WizardError::AlreadyCompleted));
    assert_eq!(wizard.jump_to(0), Err(WizardError::AlreadyCompleted));
    assert_eq!(
        wizard.set_value("name", "Bob"),
        Err(WizardError::AlreadyCompleted)
    );
    assert_eq!(action.call_count(), 1);
    assert_eq!(wizard.status(), WizardStatus::Completed);
}

// =============================================================================
// Single Flight
// =============================================================================

#[tokio::test]
async fn test_commands_rejected_while_submitting() {
    let (release_tx, release_rx) = oneshot::channel::<()>();
    let release_rx = Arc::new(tokio::sync::Mutex::new(Some(release_rx)));
    let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));

    let action: Arc<dyn SubmitAction> = {
        let calls = calls.clone();
        Arc::new(submit_fn(move |values: ValueStore| {
            let release_rx = release_rx.clone();
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                assert_eq!(values.field("name"), Some(&FieldValue::from("Ada")));
                if let Some(rx) = release_rx.lock().await.take() {
                    let _ = rx.await;
                }
                Ok(())
            }
        }))
    };

    let wizard = create_test_wizard(valid_values(), action);
    wizard.jump_to(2).unwrap();

    let pending = {
        let wizard = wizard.clone();
        tokio::spawn(async move { wizard.next().await })
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        while wizard.status() != WizardStatus::Submitting {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    assert_eq!(wizard.next().await, Err(WizardError::SubmissionInProgress));
    assert_eq!(wizard.back(), Err(WizardError::SubmissionInProgress));
    assert_eq!(wizard.jump_to(0), Err(WizardError::SubmissionInProgress));
    assert_eq!(
        wizard.set_value("name", "Changed"),
        Err(WizardError::SubmissionInProgress)
    );
    assert_eq!(wizard.current_step(), 2);

    release_tx.send(()).unwrap();
    assert_eq!(pending.await.unwrap(), Ok(Transition::Completed));
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    assert_eq!(wizard.value("name"), Some(FieldValue::from("Ada")));
}

#[tokio::test]
async fn test_dropped_caller_still_completes() {
    let (wizard, action) = create_valid_wizard();
    wizard.jump_to(2).unwrap();

    // Poll once to start the submission, then drop the future
    {
        let next = wizard.next();
        tokio::pin!(next);
        let _ = futures::poll!(next.as_mut());
    }

    tokio::time::timeout(Duration::from_secs(5), wizard.wait_completed())
        .await
        .unwrap();
    assert_eq!(action.call_count(), 1);
}

#[tokio::test]
async fn test_recording_action_outcomes() {
    let action = RecordingAction::with_outcomes([Err(SubmissionError::Failed("x".into()))]);
    let wizard = create_test_wizard(valid_values(), action.clone());
    wizard.jump_to(2).unwrap();

    assert!(wizard.next().await.is_err());
    assert!(wizard.next().await.is_ok());
    assert_eq!(action.call_count(), 2);
}
