//! Player catalog routes.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::{debug, instrument};
use tradegrader_core::model::Player;
use tradegrader_grading::application::query_handlers;

use crate::error::ApiError;
use crate::extract::AppQuery;
use crate::state::AppState;

/// Query string of GET /players/search.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search text; required and non-empty.
    pub q: Option<String>,
}

/// GET /players
async fn list_players(State(state): State<AppState>) -> Json<Vec<Player>> {
    Json(state.catalog.players().to_vec())
}

/// GET /players/search?q=
#[instrument(skip(state, params), fields(q = params.q.as_deref().unwrap_or_default()))]
async fn search_players(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let query = params.q.unwrap_or_default();
    let players = query_handlers::search_players(&state.catalog, &query)?;
    debug!(count = players.len(), "player search served");
    Ok(Json(players))
}

/// Returns the router for player routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/players", get(list_players))
        .route("/players/search", get(search_players))
}
