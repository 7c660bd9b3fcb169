//! HTTP client for the grading service.
//!
//! Implements both engine ports against `GET /api/players/search` and
//! `POST /api/analyze-trade`. Each call carries its own timeout.

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use tradegrader_core::error::{SearchError, ServiceError, ServiceErrorKind};
use tradegrader_core::model::{AnalysisResult, Suggestion, TradeRequest};
use tradegrader_core::ports::{GradingClient, SearchClient};

use crate::config::ComposerConfig;
use crate::error::ConfigError;

const SEARCH_PATH: &str = "/api/players/search";
const ANALYZE_PATH: &str = "/api/analyze-trade";
const GRADING_FALLBACK_MESSAGE: &str = "Failed to analyze trade. Please try again.";

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn format_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }
    message
}

/// Pulls the human-readable `detail` string out of an error body.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .filter(|detail| !detail.trim().is_empty())
        .map(str::to_owned)
}

fn transport_error(err: &reqwest::Error) -> ServiceError {
    let kind = if err.is_timeout() {
        ServiceErrorKind::Timeout
    } else {
        ServiceErrorKind::Network
    };
    ServiceError::new(kind, format_reqwest_error(err))
}

/// `reqwest`-backed implementation of [`SearchClient`] and [`GradingClient`].
#[derive(Debug, Clone)]
pub struct HttpTradeApi {
    client: reqwest::Client,
    base_url: String,
    search_timeout: Duration,
    grading_timeout: Duration,
}

impl HttpTradeApi {
    /// Builds a client for the service at `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is empty or not an absolute
    /// `http(s)` URL, or if the HTTP client cannot be constructed.
    pub fn new(config: &ComposerConfig) -> Result<Self, ConfigError> {
        let base_url = normalize_base_url(&config.api_base_url);
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ConfigError(format!("invalid grading service URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError(format!(
                "grading service URL must be http or https, got {base_url:?}"
            )));
        }

        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            search_timeout: config.search_timeout,
            grading_timeout: config.grading_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SearchClient for HttpTradeApi {
    #[instrument(skip(self), fields(query = %query))]
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .get(self.url(SEARCH_PATH))
            .query(&[("q", query)])
            .timeout(self.search_timeout)
            .send()
            .await
            .map_err(|e| SearchError::new(format!("Error: {}", format_reqwest_error(&e))))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::new(format!("Error: {}", format_reqwest_error(&e))))?;

        if !status.is_success() {
            let message = extract_detail(&body)
                .unwrap_or_else(|| format!("search failed with status {status}"));
            warn!(%status, %message, "player search rejected");
            return Err(SearchError::new(format!("Error: {message}")));
        }

        let suggestions: Vec<Suggestion> = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "malformed player search response");
            SearchError::new("Error: malformed search response")
        })?;
        debug!(count = suggestions.len(), "player search succeeded");
        Ok(suggestions)
    }
}

#[async_trait]
impl GradingClient for HttpTradeApi {
    #[instrument(
        skip(self, request),
        fields(
            incoming = request.incoming_players.len(),
            outgoing = request.outgoing_players.len()
        )
    )]
    async fn analyze(&self, request: &TradeRequest) -> Result<AnalysisResult, ServiceError> {
        let response = self
            .client
            .post(self.url(ANALYZE_PATH))
            .json(request)
            .timeout(self.grading_timeout)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| transport_error(&e))?;

        if !status.is_success() {
            let message =
                extract_detail(&body).unwrap_or_else(|| GRADING_FALLBACK_MESSAGE.to_owned());
            warn!(%status, %message, "grading request rejected");
            return Err(ServiceError::new(
                ServiceErrorKind::Status(status.as_u16()),
                message,
            ));
        }

        let analysis: AnalysisResult = serde_json::from_slice(&body).map_err(|e| {
            ServiceError::new(
                ServiceErrorKind::Malformed,
                format!("unexpected grading response: {e}"),
            )
        })?;
        if !analysis.is_well_formed() {
            return Err(ServiceError::new(
                ServiceErrorKind::Malformed,
                format!("score {} is outside 0-100", analysis.score),
            ));
        }
        debug!(score = analysis.score, trade_id = analysis.trade_id, "trade graded");
        Ok(analysis)
    }
}
