//! Server configuration, read from the environment.

use std::path::PathBuf;

use chrono::TimeDelta;
use tradegrader_grading::application::player_feed::FANTASYPROS_RANKINGS_URL;

use crate::error::AppError;

const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Settings for the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// `SQLite` connection string for trade history.
    pub database_url: String,
    /// Gemini API key; without it only the heuristic grader is used.
    pub gemini_api_key: Option<String>,
    /// Gemini model name.
    pub gemini_model: String,
    /// Optional JSON file that takes precedence over the cache and the feed.
    pub player_catalog_path: Option<PathBuf>,
    /// Rankings page scraped for the live player list.
    pub player_feed_url: String,
    /// Where the scraped player list is cached.
    pub player_cache_path: PathBuf,
    /// How long the cached player list is served.
    pub player_cache_ttl: TimeDelta,
    /// Origin allowed by CORS.
    pub cors_allowed_origin: String,
}

impl ServerConfig {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `PLAYER_CACHE_TTL_HOURS` is
    /// invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number or
    /// `PLAYER_CACHE_TTL_HOURS` is not a positive whole number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 8000,
        };

        let ttl_hours = match get("PLAYER_CACHE_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=24 * 365).contains(hours))
                .ok_or_else(|| {
                    AppError::Config(format!(
                        "PLAYER_CACHE_TTL_HOURS must be a positive number of hours, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_CACHE_TTL_HOURS,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port,
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://trades.db?mode=rwc".to_owned()),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-pro".to_owned()),
            player_catalog_path: get("PLAYER_CATALOG_PATH").map(PathBuf::from),
            player_feed_url: get("PLAYER_FEED_URL")
                .unwrap_or_else(|| FANTASYPROS_RANKINGS_URL.to_owned()),
            player_cache_path: get("PLAYER_CACHE_PATH")
                .map_or_else(|| PathBuf::from("player_cache.json"), PathBuf::from),
            player_cache_ttl: TimeDelta::hours(ttl_hours),
            cors_allowed_origin: get("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_owned()),
        })
    }
}
