//! Shared test fakes and utilities for the trade grader.

mod clock;
mod grading;
mod repository;
mod rng;
mod search;

pub use clock::FixedClock;
pub use grading::RecordingGradingClient;
pub use repository::{FailingTradeRepository, InMemoryTradeRepository};
pub use rng::{MockRng, SequenceRng};
pub use search::ScriptedSearchClient;
