//! Trade Grader API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tradegrader_api::config::ServerConfig;
use tradegrader_api::error::AppError;
use tradegrader_api::state::AppState;
use tradegrader_core::clock::SystemClock;
use tradegrader_core::rng::OsSeededRng;
use tradegrader_grading::application::gemini::GeminiGrader;
use tradegrader_grading::application::grader::{FallbackGrader, HeuristicGrader, TradeGrader};
use tradegrader_grading::application::catalog_cache::CatalogCache;
use tradegrader_grading::application::catalog_loader::load_catalog;
use tradegrader_grading::application::player_feed::RankingsFeed;
use tradegrader_trade_store::sqlite_trade_repository::SqliteTradeRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Trade Grader API server");

    let config = ServerConfig::from_env()?;

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(AppError::from)?;
    let trade_repository = SqliteTradeRepository::new(pool);
    trade_repository.migrate().await?;

    let heuristic: Arc<dyn TradeGrader> = Arc::new(HeuristicGrader::new(OsSeededRng::new()));
    let grader: Arc<dyn TradeGrader> = match &config.gemini_api_key {
        Some(key) => {
            let gemini = GeminiGrader::new(key.clone(), config.gemini_model.clone())
                .map_err(AppError::from)?;
            tracing::info!(model = %config.gemini_model, "Gemini grading enabled");
            Arc::new(FallbackGrader::new(Arc::new(gemini), heuristic))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set, using heuristic grading only");
            heuristic
        }
    };

    let cache = CatalogCache::new(config.player_cache_path.clone(), config.player_cache_ttl);
    let feed = RankingsFeed::new(config.player_feed_url.clone()).map_err(AppError::from)?;
    let catalog = load_catalog(
        config.player_catalog_path.as_deref(),
        &cache,
        &feed,
        &SystemClock,
    )
    .await;

    let app_state = AppState::new(
        Arc::new(catalog),
        grader,
        Arc::new(SystemClock),
        Arc::new(trade_repository),
    );

    let origin = HeaderValue::from_str(&config.cors_allowed_origin).map_err(|e| {
        AppError::Config(format!("CORS_ALLOWED_ORIGIN is not a valid header value: {e}"))
    })?;
    let app = tradegrader_api::build_router(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::from)?;

    axum::serve(listener, app).await.map_err(AppError::from)?;

    Ok(())
}
