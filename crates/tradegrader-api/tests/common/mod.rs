//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;
use tradegrader_core::clock::Clock;
use tradegrader_core::rng::DeterministicRng;
use tradegrader_grading::application::grader::HeuristicGrader;
use tradegrader_grading::domain::catalog::PlayerCatalog;
use tradegrader_test_support::{FixedClock, MockRng};
use tradegrader_trade_store::sqlite_trade_repository::SqliteTradeRepository;

use tradegrader_api::build_router;
use tradegrader_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

/// A migrated in-memory `SQLite` pool. One connection, so every clone of the
/// pool sees the same database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    SqliteTradeRepository::new(pool.clone())
        .migrate()
        .await
        .unwrap();
    pool
}

/// Build the full app router with a real `SqliteTradeRepository` and a
/// zero-jitter heuristic grader.
pub fn build_test_app(pool: SqlitePool) -> Router {
    build_test_app_with_rng(pool, MockRng)
}

/// Build the full app router with a custom RNG for tests that need a
/// specific heuristic jitter.
pub fn build_test_app_with_rng(pool: SqlitePool, rng: impl DeterministicRng + 'static) -> Router {
    let app_state = AppState::new(
        Arc::new(PlayerCatalog::fallback()),
        Arc::new(HeuristicGrader::new(rng)),
        fixed_clock(),
        Arc::new(SqliteTradeRepository::new(pool)),
    );
    build_router(app_state)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}
