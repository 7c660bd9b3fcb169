//! Engine configuration, read from the environment.

use std::time::Duration;

use crate::error::ConfigError;

/// Quiet interval before a search fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Client-side bound on a player search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Client-side bound on a grading call.
pub const DEFAULT_GRADING_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the composition engine and its HTTP client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Base URL of the grading service, e.g. `http://localhost:8000`.
    pub api_base_url: String,
    /// Quiet interval used by every slot's debounce scheduler.
    pub debounce: Duration,
    /// Per-request timeout for `GET /api/players/search`.
    pub search_timeout: Duration,
    /// Per-request timeout for `POST /api/analyze-trade`.
    pub grading_timeout: Duration,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_owned(),
            debounce: DEFAULT_DEBOUNCE,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            grading_timeout: DEFAULT_GRADING_TIMEOUT,
        }
    }
}

impl ComposerConfig {
    /// Reads `TRADEGRADER_API_URL`, `TRADEGRADER_DEBOUNCE_MS`,
    /// `TRADEGRADER_SEARCH_TIMEOUT_MS` and `TRADEGRADER_GRADING_TIMEOUT_MS`,
    /// falling back to the defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a set variable is not a valid number of
    /// milliseconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a present value is not a valid number of
    /// milliseconds.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            api_base_url: lookup("TRADEGRADER_API_URL").unwrap_or(defaults.api_base_url),
            debounce: millis(&lookup, "TRADEGRADER_DEBOUNCE_MS")?.unwrap_or(defaults.debounce),
            search_timeout: millis(&lookup, "TRADEGRADER_SEARCH_TIMEOUT_MS")?
                .unwrap_or(defaults.search_timeout),
            grading_timeout: millis(&lookup, "TRADEGRADER_GRADING_TIMEOUT_MS")?
                .unwrap_or(defaults.grading_timeout),
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|e| ConfigError(format!("{key} must be a number of milliseconds: {e}")))
        })
        .transpose()
}
