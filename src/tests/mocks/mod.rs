//! Mock submit actions built on the mockall-generated `MockSubmitAction`.

#![allow(dead_code)]

use std::sync::Arc;

use mockall::Sequence;

use crate::core::wizard::{MockSubmitAction, SubmissionError, SubmitAction};

/// A mock that answers successive submissions with `outcomes`, in order,
/// and expects exactly that many calls.
pub fn mock_action_sequence(
    outcomes: Vec<Result<(), SubmissionError>>,
) -> Arc<dyn SubmitAction> {
    let mut mock = MockSubmitAction::new();
    let mut seq = Sequence::new();
    for outcome in outcomes {
        mock.expect_submit()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_| outcome);
    }
    Arc::new(mock)
}

/// A mock that must never be called.
pub fn mock_action_never() -> Arc<dyn SubmitAction> {
    let mut mock = MockSubmitAction::new();
    mock.expect_submit().never();
    Arc::new(mock)
}
