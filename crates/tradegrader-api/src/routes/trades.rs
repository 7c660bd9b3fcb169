//! Trade grading and history routes.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info, instrument};
use tradegrader_core::model::{AnalysisResult, TradeRequest};
use tradegrader_grading::application::query_handlers::{self, TradeHistoryView};
use tradegrader_grading::application::command_handlers;
use tradegrader_grading::domain::commands;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /analyze-trade
#[instrument(
    skip(state, request),
    fields(
        incoming = request.incoming_players.len(),
        outgoing = request.outgoing_players.len()
    )
)]
async fn analyze_trade(
    State(state): State<AppState>,
    AppJson(request): AppJson<TradeRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let command = commands::AnalyzeTrade {
        correlation_id: Uuid::new_v4(),
        incoming_players: request.incoming_players,
        outgoing_players: request.outgoing_players,
    };

    info!(correlation_id = %command.correlation_id, "handling analyze_trade command");

    let result = command_handlers::handle_analyze_trade(
        &command,
        &*state.grader,
        state.clock.as_ref(),
        &*state.trade_repository,
    )
    .await?;

    Ok(Json(result))
}

/// GET /trade-history
async fn trade_history(
    State(state): State<AppState>,
) -> Result<Json<TradeHistoryView>, ApiError> {
    let view = query_handlers::get_trade_history(&*state.trade_repository).await?;
    Ok(Json(view))
}

/// Returns the router for trade routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze-trade", post(analyze_trade))
        .route("/trade-history", get(trade_history))
}
