//! # Calculation Sequencing
//!
//! Recompute requests for one document are never coalesced, so several may
//! be in flight at once and answer out of order. A [`CalculationSession`]
//! numbers each request when it is issued and applies completions
//! last-response-wins by issue order: once ticket `n` has completed, any
//! completion for a ticket below `n` is discarded, success or failure.
//!
//! A failure never replaces the last good result; it is recorded as the
//! session's last error and the previous totals stay in place.

use std::sync::atomic::{AtomicU64, Ordering};

use fisco_core::FiscalDocument;
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::orchestrator::CalculationResult;

/// Sequence number handed out when a recompute is issued. Consumed by
/// [`CalculationSession::complete`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket must be completed for its result to be applied"]
pub struct CalculationTicket(u64);

impl CalculationTicket {
    /// Issue-order sequence number, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What happened to a completed calculation.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result is now the session's latest.
    Applied,
    /// A later-issued request completed first; this one was discarded.
    Stale,
    /// The calculation failed; the previous result is kept.
    Failed(EngineError),
}

#[derive(Debug, Default)]
struct SessionState {
    latest_completed: u64,
    last_result: Option<CalculationResult>,
    last_error: Option<EngineError>,
}

/// Per-document sequencing state.
#[derive(Debug)]
pub struct CalculationSession {
    next_sequence: AtomicU64,
    state: Mutex<SessionState>,
}

impl Default for CalculationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationSession {
    /// A session with nothing issued.
    pub fn new() -> Self {
        Self {
            next_sequence: AtomicU64::new(1),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Issue a ticket for a new recompute. Call before awaiting anything.
    pub fn begin(&self) -> CalculationTicket {
        CalculationTicket(self.next_sequence.fetch_add(1, Ordering::SeqCst))
    }

    /// Record the outcome of the calculation issued under `ticket`.
    pub fn complete(
        &self,
        ticket: CalculationTicket,
        outcome: Result<CalculationResult, EngineError>,
    ) -> Completion {
        let mut state = self.state.lock();
        if ticket.0 < state.latest_completed {
            tracing::debug!(
                sequence = ticket.0,
                latest = state.latest_completed,
                failed = outcome.is_err(),
                "discarding stale calculation response"
            );
            return Completion::Stale;
        }
        state.latest_completed = ticket.0;
        match outcome {
            Ok(result) => {
                state.last_result = Some(result);
                state.last_error = None;
                Completion::Applied
            }
            Err(e) => {
                tracing::warn!(sequence = ticket.0, severity = %e.severity(), error = %e, "recompute failed");
                state.last_error = Some(e.clone());
                Completion::Failed(e)
            }
        }
    }

    /// Sequence number of the most recently completed ticket (0 if none).
    pub fn latest_completed(&self) -> u64 {
        self.state.lock().latest_completed
    }

    /// The last successful result, if any.
    pub fn last_result(&self) -> Option<CalculationResult> {
        self.state.lock().last_result.clone()
    }

    /// The error from the latest completion, cleared by the next success.
    pub fn last_error(&self) -> Option<EngineError> {
        self.state.lock().last_error.clone()
    }

    /// Apply the last successful result to `doc`.
    ///
    /// Returns `Ok(false)` when nothing has succeeded yet. The document is
    /// left untouched on error.
    pub fn apply_latest(&self, doc: &mut FiscalDocument) -> Result<bool, EngineError> {
        let state = self.state.lock();
        match &state.last_result {
            Some(result) => result.apply_to(doc).map(|()| true),
            None => Ok(false),
        }
    }
}
