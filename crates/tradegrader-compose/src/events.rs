//! Messages flowing into the composer's event loop.

use tradegrader_core::error::{SearchError, ServiceError};
use tradegrader_core::model::{AnalysisResult, Side, Suggestion};

use crate::debounce::Generation;

/// Internal identity of a slot, used only to route asynchronous completions.
///
/// Slots are addressed positionally by the user; keys are allocated per side
/// and never reused, so a completion for a removed slot finds no owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey(pub(crate) u64);

/// Side plus key: enough to find the controller that issued some work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddress {
    /// Side the slot lives on.
    pub side: Side,
    /// Stable key within that side.
    pub key: SlotKey,
}

/// Action taken by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// A keystroke changed the slot's text.
    Input {
        /// Side of the slot.
        side: Side,
        /// Position of the slot.
        index: usize,
        /// Full new text of the slot.
        text: String,
    },
    /// A suggestion was picked from the slot's list.
    Select {
        /// Side of the slot.
        side: Side,
        /// Position of the slot.
        index: usize,
        /// The chosen suggestion.
        suggestion: Suggestion,
    },
    /// The user interacted outside the slot's list.
    Dismiss {
        /// Side of the slot.
        side: Side,
        /// Position of the slot.
        index: usize,
    },
    /// The slot's remove control was pressed.
    Remove {
        /// Side of the slot.
        side: Side,
        /// Position of the slot.
        index: usize,
    },
    /// A value was written into the slot without searching.
    Update {
        /// Side of the slot.
        side: Side,
        /// Position of the slot.
        index: usize,
        /// New text.
        text: String,
    },
    /// An empty slot is appended to a side.
    AddSlot {
        /// Side to extend.
        side: Side,
    },
    /// The draft is submitted for grading.
    Submit,
}

/// Completion of asynchronous work started by the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerEvent {
    /// A slot's quiet interval elapsed.
    DebounceElapsed {
        /// Slot that scheduled the tick.
        slot: SlotAddress,
        /// Generation of the tick.
        generation: Generation,
    },
    /// A player search finished.
    SearchCompleted {
        /// Slot that issued the search.
        slot: SlotAddress,
        /// Sequence number of the request.
        sequence: u64,
        /// Suggestions or the failure.
        result: Result<Vec<Suggestion>, SearchError>,
    },
    /// A grading call finished.
    GradingCompleted {
        /// Submission attempt the call belongs to.
        attempt: u64,
        /// Analysis or the failure.
        result: Result<AnalysisResult, ServiceError>,
    },
}
