//! Trade Grader — HTTP API.
//!
//! Serves player search, trade grading and trade history to the
//! composition engine.

use axum::Router;

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the application router without transport layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest(
            "/api",
            routes::players::router().merge(routes::trades::router()),
        )
        .with_state(state)
}
