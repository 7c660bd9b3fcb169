//! Shared application state.

use std::sync::Arc;

use tradegrader_core::clock::Clock;
use tradegrader_core::repository::TradeRepository;
use tradegrader_grading::application::grader::TradeGrader;
use tradegrader_grading::domain::catalog::PlayerCatalog;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Players offered by the search endpoint.
    pub catalog: Arc<PlayerCatalog>,
    /// Grader used by the analyze endpoint.
    pub grader: Arc<dyn TradeGrader>,
    /// Clock used to stamp graded trades.
    pub clock: Arc<dyn Clock>,
    /// Trade history persistence.
    pub trade_repository: Arc<dyn TradeRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        catalog: Arc<PlayerCatalog>,
        grader: Arc<dyn TradeGrader>,
        clock: Arc<dyn Clock>,
        trade_repository: Arc<dyn TradeRepository>,
    ) -> Self {
        Self {
            catalog,
            grader,
            clock,
            trade_repository,
        }
    }
}
