//! Cancellable debounce scheduler.
//!
//! A [`DebounceScheduler`] holds at most one pending tick. Scheduling a new
//! tick aborts the previous timer task, so only the last tick scheduled
//! within a quiet window is ever delivered. Delivery goes to an
//! `mpsc` sink owned by whoever drives the event loop; the owner then
//! confirms the tick with [`DebounceScheduler::accept`], which also rejects a
//! tick that was already in the channel when it was superseded.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Generation number identifying one scheduled tick.
pub type Generation = u64;

#[derive(Debug)]
struct PendingTick {
    generation: Generation,
    handle: JoinHandle<()>,
}

/// Coalesces rapid triggers into a single delayed delivery.
///
/// Dropping the scheduler cancels any pending tick.
#[derive(Debug)]
pub struct DebounceScheduler<T> {
    quiet: Duration,
    sink: UnboundedSender<T>,
    pending: Option<PendingTick>,
    generation: Generation,
}

impl<T> DebounceScheduler<T> {
    /// Creates a scheduler that delivers ticks to `sink` after `quiet`.
    #[must_use]
    pub fn new(quiet: Duration, sink: UnboundedSender<T>) -> Self {
        Self {
            quiet,
            sink,
            pending: None,
            generation: 0,
        }
    }

    /// Returns true if a tick is scheduled and not yet accepted or cancelled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discards the pending tick, if any. Returns true if one was discarded.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Confirms a delivered tick.
    ///
    /// Returns true only for the generation of the currently pending tick;
    /// the tick is then no longer pending. Anything older, or anything
    /// delivered after [`cancel`](Self::cancel), is rejected.
    pub fn accept(&mut self, generation: Generation) -> bool {
        match &self.pending {
            Some(pending) if pending.generation == generation => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

impl<T: Send + 'static> DebounceScheduler<T> {
    /// Schedules a tick, replacing any pending one.
    ///
    /// `tick` builds the payload from the new generation number. Requires a
    /// running tokio runtime.
    pub fn schedule(&mut self, tick: impl FnOnce(Generation) -> T) -> Generation {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let payload = tick(generation);
        let deadline = Instant::now() + self.quiet;
        let sink = self.sink.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // A closed sink means the owner is gone; nothing left to notify.
            let _ = sink.send(payload);
        });

        self.pending = Some(PendingTick { generation, handle });
        generation
    }
}

impl<T> Drop for DebounceScheduler<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
