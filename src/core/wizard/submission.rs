//! Submission Gate
//!
//! Wraps the host's asynchronous submit action and guarantees that at most
//! one invocation is in flight per wizard. A second attempt while one is
//! pending is rejected with [`SubmissionError::Busy`] rather than queued.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::error::SubmissionError;
use super::values::ValueStore;

// ============================================================================
// Submit Action Trait
// ============================================================================

/// The externally supplied, side-effecting submit callback.
///
/// Receives the value store frozen at the moment submission started.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitAction: Send + Sync {
    async fn submit(&self, values: ValueStore) -> Result<(), SubmissionError>;
}

/// Adapter turning an async closure into a [`SubmitAction`].
pub struct FnSubmit<F> {
    f: F,
}

/// Build a [`SubmitAction`] from `|values| async move { ... }`.
pub fn submit_fn<F, Fut>(f: F) -> FnSubmit<F>
where
    F: Fn(ValueStore) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SubmissionError>> + Send + 'static,
{
    FnSubmit { f }
}

#[async_trait]
impl<F, Fut> SubmitAction for FnSubmit<F>
where
    F: Fn(ValueStore) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), SubmissionError>> + Send + 'static,
{
    async fn submit(&self, values: ValueStore) -> Result<(), SubmissionError> {
        (self.f)(values).await
    }
}

// ============================================================================
// Gate
// ============================================================================

#[derive(Debug, Default)]
pub struct SubmissionGate {
    in_flight: AtomicBool,
}

/// Held for the duration of one submission; releases the gate on drop, so a
/// failed, panicking or dropped submission never wedges it.
#[derive(Debug)]
pub struct GatePermit<'a> {
    gate: &'a SubmissionGate,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::Release);
    }
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the gate, or `None` if a submission is already running.
    pub fn try_acquire(&self) -> Option<GatePermit<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GatePermit { gate: self })
    }

    /// Run `action` with `values` if no other submission is in flight.
    pub async fn run(
        &self,
        action: &dyn SubmitAction,
        values: ValueStore,
    ) -> Result<(), SubmissionError> {
        let Some(_permit) = self.try_acquire() else {
            tracing::warn!("Rejected re-entrant submission");
            return Err(SubmissionError::Busy);
        };

        tracing::debug!(fields = values.len(), "Running submit action");
        action.submit(values).await
    }
}
