//! Event loop tying slots, searches and submission together.
//!
//! A [`Composer`] owns the draft and the submission controller. User actions
//! are applied synchronously. Debounce timers and HTTP calls run as spawned
//! tasks that report back as [`ComposerEvent`]s on the composer's channel;
//! those tasks never touch state directly.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use tradegrader_core::model::{AnalysisResult, Side};
use tradegrader_core::ports::{GradingClient, SearchClient};

use crate::autocomplete::SearchRequest;
use crate::config::ComposerConfig;
use crate::draft::TradeDraft;
use crate::error::ComposeError;
use crate::events::{ComposerEvent, SlotAddress, UserAction};
use crate::slots::SlotList;
use crate::submission::{PendingSubmission, SubmissionController};
use crate::view::{ComposerView, SlotView};

/// Owner of all composition state.
pub struct Composer {
    draft: TradeDraft,
    submission: SubmissionController,
    search: Arc<dyn SearchClient>,
    grading: Arc<dyn GradingClient>,
    events_tx: mpsc::UnboundedSender<ComposerEvent>,
    events_rx: mpsc::UnboundedReceiver<ComposerEvent>,
}

impl std::fmt::Debug for Composer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Composer")
            .field("draft", &self.draft)
            .field("submission", &self.submission)
            .finish_non_exhaustive()
    }
}

impl Composer {
    /// Creates a composer with one empty slot per side.
    #[must_use]
    pub fn new(
        config: &ComposerConfig,
        search: Arc<dyn SearchClient>,
        grading: Arc<dyn GradingClient>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            draft: TradeDraft::new(config.debounce, &events_tx),
            submission: SubmissionController::new(),
            search,
            grading,
            events_tx,
            events_rx,
        }
    }

    /// The draft being composed.
    #[must_use]
    pub fn draft(&self) -> &TradeDraft {
        &self.draft
    }

    /// The submission controller.
    #[must_use]
    pub fn submission(&self) -> &SubmissionController {
        &self.submission
    }

    /// Applies one user action.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::Slot`] for an index that does not exist and
    /// [`ComposeError::Submission`] when a submit is rejected locally.
    pub fn apply(&mut self, action: UserAction) -> Result<(), ComposeError> {
        match action {
            UserAction::Input { side, index, text } => {
                self.slots(side).controller_mut(index)?.on_input(text);
            }
            UserAction::Select {
                side,
                index,
                suggestion,
            } => {
                self.slots(side).controller_mut(index)?.on_select(&suggestion);
                debug!(%side, index, display = %suggestion.display, "suggestion selected");
            }
            UserAction::Dismiss { side, index } => {
                self.slots(side).controller_mut(index)?.on_outside_dismiss();
            }
            UserAction::Remove { side, index } => {
                self.slots(side).remove(index)?;
            }
            UserAction::Update { side, index, text } => {
                self.slots(side).update(index, text)?;
            }
            UserAction::AddSlot { side } => {
                self.slots(side).add();
            }
            UserAction::Submit => {
                let pending = self.submission.begin(&self.draft)?;
                self.spawn_grading(pending);
            }
        }
        Ok(())
    }

    /// Waits for the next completion from a spawned timer or request.
    pub async fn next_event(&mut self) -> Option<ComposerEvent> {
        self.events_rx.recv().await
    }

    /// Routes a completion to its owner.
    ///
    /// Completions for slots that no longer exist are dropped.
    pub fn handle_event(&mut self, event: ComposerEvent) {
        match event {
            ComposerEvent::DebounceElapsed { slot, generation } => {
                let Some(controller) = self.draft.controller_at(slot) else {
                    debug!(side = %slot.side, "debounce tick for removed slot dropped");
                    return;
                };
                if let Some(request) = controller.on_debounce_elapsed(generation) {
                    self.spawn_search(slot, request);
                }
            }
            ComposerEvent::SearchCompleted {
                slot,
                sequence,
                result,
            } => match self.draft.controller_at(slot) {
                Some(controller) => {
                    controller.on_search_completed(sequence, result);
                }
                None => debug!(side = %slot.side, sequence, "search response for removed slot dropped"),
            },
            ComposerEvent::GradingCompleted { attempt, result } => {
                self.submission.complete(attempt, result);
            }
        }
    }

    /// Builds a snapshot of the current state.
    #[must_use]
    pub fn view(&self) -> ComposerView {
        let side_view = |side: Side| -> Vec<SlotView> {
            self.draft
                .side(side)
                .controllers()
                .enumerate()
                .map(|(index, controller)| SlotView::of(index, controller))
                .collect()
        };
        ComposerView {
            incoming: side_view(Side::Incoming),
            outgoing: side_view(Side::Outgoing),
            submission: self.submission.phase().clone(),
            result: self.submission.result().cloned(),
            recommendation: self.submission.result().map(AnalysisResult::recommendation),
            loading: self.submission.is_loading(),
        }
    }

    /// Runs the event loop until `actions` closes.
    ///
    /// A snapshot is published on `views` after every action and every
    /// completion. On exit every slot is torn down.
    pub async fn run(
        mut self,
        mut actions: mpsc::UnboundedReceiver<UserAction>,
        views: watch::Sender<ComposerView>,
    ) {
        info!("composer started");
        views.send_replace(self.view());

        loop {
            tokio::select! {
                action = actions.recv() => {
                    let Some(action) = action else { break };
                    if let Err(error) = self.apply(action) {
                        warn!(%error, "action rejected");
                    }
                }
                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                }
            }
            views.send_replace(self.view());
        }

        self.draft.teardown();
        info!("composer stopped");
    }

    fn slots(&mut self, side: Side) -> &mut SlotList {
        self.draft.side_mut(side)
    }

    fn spawn_search(&self, slot: SlotAddress, request: SearchRequest) {
        let client = Arc::clone(&self.search);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.search(&request.query).await;
            let _ = events.send(ComposerEvent::SearchCompleted {
                slot,
                sequence: request.sequence,
                result,
            });
        });
    }

    fn spawn_grading(&self, pending: PendingSubmission) {
        let client = Arc::clone(&self.grading);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client.analyze(&pending.request).await;
            let _ = events.send(ComposerEvent::GradingCompleted {
                attempt: pending.attempt,
                result,
            });
        });
    }
}
