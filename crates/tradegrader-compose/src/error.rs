//! Engine error types.
//!
//! Slot-scoped search failures live on the owning controller and never
//! appear here; these are the errors returned to whoever drives the engine.

use thiserror::Error;
use tradegrader_core::error::ServiceError;
use tradegrader_core::model::Side;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

/// A slot index that does not exist on its side.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    /// The index is past the end of the side's slot list.
    #[error("no {side} slot at index {index} (side has {len})")]
    OutOfRange {
        /// Side that was addressed.
        side: Side,
        /// Index that was requested.
        index: usize,
        /// Current number of slots on that side.
        len: usize,
    },
}

/// Local rejection of a draft before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please enter at least one player on each side of the trade")]
pub struct ValidationError {
    /// Sides that have no non-blank entry.
    pub empty_sides: Vec<Side>,
}

/// Why a submission did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The draft failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The grading service failed or answered with a malformed body.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A submission is already loading.
    #[error("a submission is already in flight")]
    InFlight,

    /// A newer submission replaced this one before it completed.
    #[error("submission was superseded by a newer attempt")]
    Superseded,
}

/// Error returned when a user action cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// The action addressed a slot that does not exist.
    #[error(transparent)]
    Slot(#[from] SlotError),

    /// The submit action was rejected.
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
