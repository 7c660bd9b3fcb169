//! Per-slot autocomplete state machine.
//!
//! The controller owns the slot's text, its suggestion list and error, and
//! the slot's debounce scheduler. It never performs I/O itself: a fired
//! debounce yields a [`SearchRequest`] for the caller to execute, and the
//! caller feeds the response back through
//! [`AutocompleteController::on_search_completed`]. Responses are matched
//! against the latest issued sequence number; anything older is dropped.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use tradegrader_core::error::SearchError;
use tradegrader_core::model::Suggestion;

use crate::debounce::{DebounceScheduler, Generation};
use crate::events::{ComposerEvent, SlotAddress};

/// Observable state of one slot's autocomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocompleteState {
    /// No text.
    Idle,
    /// Text present, search not fired yet.
    Typing,
    /// A request is in flight.
    Searching,
    /// Suggestions available, list open.
    ShowingResults,
    /// The last search failed.
    Error,
    /// List dismissed, text retained.
    Closed,
}

/// Lifecycle of one search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Issued, no response yet.
    Pending,
    /// Answered with suggestions.
    Resolved,
    /// Overtaken before its response was applied.
    Superseded,
    /// Answered with an error.
    Failed,
}

/// A search issued by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Text searched for.
    pub query: String,
    /// Monotonically increasing per controller, starting at 1.
    pub sequence: u64,
    /// Current status.
    pub status: RequestStatus,
}

/// What a search response did to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Suggestions are now shown.
    Applied,
    /// The error is now shown.
    Failed,
    /// The response belonged to a superseded request and was ignored.
    StaleDiscarded,
}

/// Autocomplete controller for a single slot.
#[derive(Debug)]
pub struct AutocompleteController {
    address: SlotAddress,
    text: String,
    state: AutocompleteState,
    suggestions: Vec<Suggestion>,
    error: Option<SearchError>,
    last_request: Option<SearchRequest>,
    debounce: DebounceScheduler<ComposerEvent>,
}

impl AutocompleteController {
    /// Creates an idle controller whose debounce ticks go to `sink`.
    #[must_use]
    pub fn new(address: SlotAddress, quiet: Duration, sink: UnboundedSender<ComposerEvent>) -> Self {
        Self {
            address,
            text: String::new(),
            state: AutocompleteState::Idle,
            suggestions: Vec::new(),
            error: None,
            last_request: None,
            debounce: DebounceScheduler::new(quiet, sink),
        }
    }

    /// Routing address of this controller.
    #[must_use]
    pub fn address(&self) -> SlotAddress {
        self.address
    }

    /// Current slot text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AutocompleteState {
        self.state
    }

    /// Suggestions from the latest resolved request.
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Suggestions to render: only while results are being shown.
    #[must_use]
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.state == AutocompleteState::ShowingResults {
            &self.suggestions
        } else {
            &[]
        }
    }

    /// Error from the latest failed request, until cleared.
    #[must_use]
    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    /// The most recently issued request.
    #[must_use]
    pub fn last_request(&self) -> Option<&SearchRequest> {
        self.last_request.as_ref()
    }

    /// Sequence number of the most recently issued request, 0 if none.
    #[must_use]
    pub fn latest_sequence(&self) -> u64 {
        self.last_request.as_ref().map_or(0, |r| r.sequence)
    }

    /// Returns true if a debounce tick is waiting to fire.
    #[must_use]
    pub fn has_pending_debounce(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Returns true while the suggestion list is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            AutocompleteState::Typing
                | AutocompleteState::Searching
                | AutocompleteState::ShowingResults
                | AutocompleteState::Error
        )
    }

    /// Stores `text` immediately and (re)schedules a debounced search.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state = AutocompleteState::Typing;
        let slot = self.address;
        let generation = self
            .debounce
            .schedule(|generation| ComposerEvent::DebounceElapsed { slot, generation });
        debug!(side = %slot.side, generation, "debounced search scheduled");
    }

    /// Handles a delivered debounce tick.
    ///
    /// Returns the request to execute, or `None` if the tick was superseded
    /// or the text is empty. An empty text never reaches the network.
    pub fn on_debounce_elapsed(&mut self, generation: Generation) -> Option<SearchRequest> {
        if !self.debounce.accept(generation) {
            debug!(side = %self.address.side, generation, "stale debounce tick ignored");
            return None;
        }

        self.supersede_in_flight();
        self.suggestions.clear();
        self.error = None;

        if self.text.is_empty() {
            self.state = AutocompleteState::Idle;
            return None;
        }

        let request = SearchRequest {
            query: self.text.clone(),
            sequence: self.latest_sequence() + 1,
            status: RequestStatus::Pending,
        };
        debug!(
            side = %self.address.side,
            sequence = request.sequence,
            query = %request.query,
            "search issued"
        );
        self.last_request = Some(request.clone());
        self.state = AutocompleteState::Searching;
        Some(request)
    }

    /// Applies a search response if it belongs to the latest pending request.
    pub fn on_search_completed(
        &mut self,
        sequence: u64,
        result: Result<Vec<Suggestion>, SearchError>,
    ) -> SearchOutcome {
        let Some(request) = self
            .last_request
            .as_mut()
            .filter(|r| r.sequence == sequence && r.status == RequestStatus::Pending)
        else {
            debug!(side = %self.address.side, sequence, "stale search response discarded");
            return SearchOutcome::StaleDiscarded;
        };

        match result {
            Ok(suggestions) => {
                request.status = RequestStatus::Resolved;
                debug!(
                    side = %self.address.side,
                    sequence,
                    count = suggestions.len(),
                    "search resolved"
                );
                self.suggestions = suggestions;
                self.error = None;
                self.state = AutocompleteState::ShowingResults;
                SearchOutcome::Applied
            }
            Err(error) => {
                request.status = RequestStatus::Failed;
                debug!(side = %self.address.side, sequence, %error, "search failed");
                self.suggestions.clear();
                self.error = Some(error);
                self.state = AutocompleteState::Error;
                SearchOutcome::Failed
            }
        }
    }

    /// Commits the suggestion's display string and closes the list.
    pub fn on_select(&mut self, suggestion: &Suggestion) {
        self.quiesce();
        self.text.clone_from(&suggestion.display);
        self.suggestions.clear();
        self.error = None;
        self.state = AutocompleteState::Closed;
    }

    /// Closes the list after an interaction outside it. Text is kept.
    pub fn on_outside_dismiss(&mut self) {
        if !self.is_open() {
            return;
        }
        self.quiesce();
        self.error = None;
        self.state = AutocompleteState::Closed;
    }

    /// Empties the slot and drops any pending or in-flight work.
    pub fn on_clear(&mut self) {
        self.quiesce();
        self.text.clear();
        self.suggestions.clear();
        self.error = None;
        self.state = AutocompleteState::Idle;
    }

    /// Writes `text` without searching.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.quiesce();
        self.text = text.into();
        self.suggestions.clear();
        self.error = None;
        self.state = if self.text.is_empty() {
            AutocompleteState::Idle
        } else {
            AutocompleteState::Closed
        };
    }

    /// Cancels the debounce timer. Called when the slot goes away.
    pub fn teardown(&mut self) {
        self.quiesce();
    }

    fn quiesce(&mut self) {
        if self.debounce.cancel() {
            debug!(side = %self.address.side, "pending debounce cancelled");
        }
        self.supersede_in_flight();
    }

    fn supersede_in_flight(&mut self) {
        if let Some(request) = self
            .last_request
            .as_mut()
            .filter(|r| r.status == RequestStatus::Pending)
        {
            request.status = RequestStatus::Superseded;
            debug!(
                side = %self.address.side,
                sequence = request.sequence,
                "in-flight search superseded"
            );
        }
    }
}
