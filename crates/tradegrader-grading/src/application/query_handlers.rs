//! Query handlers for the grading context.

use serde::Serialize;
use tradegrader_core::error::DomainError;
use tradegrader_core::model::Player;
use tradegrader_core::repository::{TradeRecord, TradeRepository};

use crate::domain::catalog::PlayerCatalog;

/// Number of trades returned by the history query.
pub const HISTORY_LIMIT: u32 = 20;

/// Read-only view of recently graded trades.
#[derive(Debug, Serialize)]
pub struct TradeHistoryView {
    /// Newest first.
    pub trades: Vec<TradeRecord>,
}

/// Searches the catalog.
///
/// # Errors
///
/// Returns `DomainError::Validation` if `query` is empty.
pub fn search_players(catalog: &PlayerCatalog, query: &str) -> Result<Vec<Player>, DomainError> {
    if query.is_empty() {
        return Err(DomainError::Validation(
            "query parameter q must not be empty".to_owned(),
        ));
    }
    Ok(catalog.search(query))
}

/// Returns the most recent graded trades.
///
/// # Errors
///
/// Propagates repository failures.
pub async fn get_trade_history(repo: &dyn TradeRepository) -> Result<TradeHistoryView, DomainError> {
    let trades = repo.recent(HISTORY_LIMIT).await?;
    Ok(TradeHistoryView { trades })
}
