//! Submission state machine: validate the draft, call the grading service,
//! store the result.
//!
//! The controller is split into [`begin`](SubmissionController::begin) and
//! [`complete`](SubmissionController::complete) so the event loop can run the
//! grading call as a spawned task. [`submit`](SubmissionController::submit)
//! chains the two for callers that can simply await.

use tracing::{debug, info, warn};
use tradegrader_core::error::{ServiceError, ServiceErrorKind};
use tradegrader_core::model::{AnalysisResult, TradeRequest};
use tradegrader_core::ports::GradingClient;

use crate::draft::TradeDraft;
use crate::error::SubmissionError;

/// Where the submission currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Nothing submitted yet.
    Idle,
    /// The draft is being checked.
    Validating,
    /// A grading call is in flight.
    Loading {
        /// Attempt the call belongs to.
        attempt: u64,
    },
    /// The latest attempt stored a result.
    Success,
    /// The latest attempt failed.
    Failed(SubmissionError),
}

/// A validated draft ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Attempt number; completions must carry it back.
    pub attempt: u64,
    /// Request body for the grading service.
    pub request: TradeRequest,
}

/// Effect of a grading completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    /// The result is now stored.
    Stored(AnalysisResult),
    /// The attempt failed; the error is now shown.
    Failed(ServiceError),
    /// The completion did not belong to the loading attempt.
    StaleDiscarded,
}

/// Drives one draft's submissions.
#[derive(Debug)]
pub struct SubmissionController {
    phase: SubmissionPhase,
    result: Option<AnalysisResult>,
    attempts: u64,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            result: None,
            attempts: 0,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &SubmissionPhase {
        &self.phase
    }

    /// The stored result, if the latest successful attempt has not been
    /// replaced by a newer one.
    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// The error of the latest failed attempt.
    #[must_use]
    pub fn error(&self) -> Option<&SubmissionError> {
        match &self.phase {
            SubmissionPhase::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Returns true while a grading call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SubmissionPhase::Loading { .. })
    }

    /// Validates `draft` and, if it passes, enters `Loading`.
    ///
    /// Any stored result is cleared as soon as validation passes. A failed
    /// validation leaves the stored result alone.
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionError::InFlight`] while another attempt is
    /// loading, or [`SubmissionError::Validation`] if a side has no
    /// non-blank entry.
    pub fn begin(&mut self, draft: &TradeDraft) -> Result<PendingSubmission, SubmissionError> {
        if self.is_loading() {
            return Err(SubmissionError::InFlight);
        }

        self.phase = SubmissionPhase::Validating;
        let request = match draft.to_request() {
            Ok(request) => request,
            Err(validation) => {
                debug!(empty_sides = ?validation.empty_sides, "submission rejected locally");
                let error = SubmissionError::from(validation);
                self.phase = SubmissionPhase::Failed(error.clone());
                return Err(error);
            }
        };

        self.attempts += 1;
        let attempt = self.attempts;
        self.result = None;
        self.phase = SubmissionPhase::Loading { attempt };
        info!(
            attempt,
            incoming = request.incoming_players.len(),
            outgoing = request.outgoing_players.len(),
            "submitting trade for grading"
        );
        Ok(PendingSubmission { attempt, request })
    }

    /// Applies the grading response for `attempt`.
    pub fn complete(
        &mut self,
        attempt: u64,
        result: Result<AnalysisResult, ServiceError>,
    ) -> GradingOutcome {
        if self.phase != (SubmissionPhase::Loading { attempt }) {
            debug!(attempt, "stale grading response discarded");
            return GradingOutcome::StaleDiscarded;
        }

        let result = result.and_then(|analysis| {
            if analysis.is_well_formed() {
                Ok(analysis)
            } else {
                Err(ServiceError::new(
                    ServiceErrorKind::Malformed,
                    format!("score {} is outside 0-100", analysis.score),
                ))
            }
        });

        match result {
            Ok(analysis) => {
                info!(
                    attempt,
                    score = analysis.score,
                    grade = %analysis.grade,
                    trade_id = analysis.trade_id,
                    "trade graded"
                );
                self.result = Some(analysis.clone());
                self.phase = SubmissionPhase::Success;
                GradingOutcome::Stored(analysis)
            }
            Err(error) => {
                warn!(attempt, %error, "grading failed");
                self.phase = SubmissionPhase::Failed(SubmissionError::Service(error.clone()));
                GradingOutcome::Failed(error)
            }
        }
    }

    /// Validates, grades and stores in one call.
    ///
    /// # Errors
    ///
    /// Returns the validation, in-flight or service error that ended the
    /// attempt.
    pub async fn submit(
        &mut self,
        draft: &TradeDraft,
        client: &dyn GradingClient,
    ) -> Result<AnalysisResult, SubmissionError> {
        let pending = self.begin(draft)?;
        let response = client.analyze(&pending.request).await;
        match self.complete(pending.attempt, response) {
            GradingOutcome::Stored(analysis) => Ok(analysis),
            GradingOutcome::Failed(error) => Err(SubmissionError::Service(error)),
            GradingOutcome::StaleDiscarded => Err(SubmissionError::Superseded),
        }
    }
}
