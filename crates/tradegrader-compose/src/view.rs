//! Read-only snapshots published by the composer after every step.

use tradegrader_core::model::{AnalysisResult, Recommendation, Suggestion};

use crate::autocomplete::{AutocompleteController, AutocompleteState};
use crate::submission::SubmissionPhase;

/// What a renderer needs to draw one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    /// Position within the side.
    pub index: usize,
    /// Current text.
    pub text: String,
    /// Autocomplete state.
    pub state: AutocompleteState,
    /// Suggestions to list; empty unless results are showing.
    pub suggestions: Vec<Suggestion>,
    /// Inline search error.
    pub error: Option<String>,
}

impl SlotView {
    pub(crate) fn of(index: usize, controller: &AutocompleteController) -> Self {
        Self {
            index,
            text: controller.text().to_owned(),
            state: controller.state(),
            suggestions: controller.visible_suggestions().to_vec(),
            error: controller.error().map(ToString::to_string),
        }
    }
}

/// Snapshot of the whole composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerView {
    /// Incoming slots, in order.
    pub incoming: Vec<SlotView>,
    /// Outgoing slots, in order.
    pub outgoing: Vec<SlotView>,
    /// Submission phase.
    pub submission: SubmissionPhase,
    /// Stored analysis, if any.
    pub result: Option<AnalysisResult>,
    /// Recommendation band of `result`.
    pub recommendation: Option<Recommendation>,
    /// True while a grading call is in flight; the submit control is
    /// disabled.
    pub loading: bool,
}

impl ComposerView {
    /// Texts of the incoming slots.
    #[must_use]
    pub fn incoming_texts(&self) -> Vec<&str> {
        self.incoming.iter().map(|slot| slot.text.as_str()).collect()
    }

    /// Texts of the outgoing slots.
    #[must_use]
    pub fn outgoing_texts(&self) -> Vec<&str> {
        self.outgoing.iter().map(|slot| slot.text.as_str()).collect()
    }
}
