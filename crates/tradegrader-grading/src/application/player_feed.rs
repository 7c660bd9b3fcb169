//! Live player list scraped from the FantasyPros consensus rankings.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use tracing::{debug, info, instrument};
use tradegrader_core::error::DomainError;
use tradegrader_core::model::Player;

use super::gemini::format_reqwest_error;
use crate::domain::rankings::parse_rankings_html;

/// Consensus cheat-sheet page.
pub const FANTASYPROS_RANKINGS_URL: &str =
    "https://www.fantasypros.com/nfl/rankings/consensus-cheatsheets.php";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetches and parses the rankings page.
#[derive(Debug, Clone)]
pub struct RankingsFeed {
    client: reqwest::Client,
    url: String,
}

impl RankingsFeed {
    /// Creates a feed reading `url`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(url: impl Into<String>) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .map_err(|e| DomainError::Infrastructure(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The page this feed reads.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Downloads the page and returns its players in ranking order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Upstream` on a transport failure or timeout, a
    /// non-success status, an empty page, or a page without players.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Vec<Player>, DomainError> {
        let response = self
            .client
            .get(&self.url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DomainError::Upstream("timed out fetching player rankings".to_owned())
                } else {
                    DomainError::Upstream(format_reqwest_error(&e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::Upstream(format!(
                "player rankings returned {status}"
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| DomainError::Upstream(format!("unreadable rankings page: {e}")))?;
        debug!(bytes = html.len(), "rankings page received");
        if html.trim().is_empty() {
            return Err(DomainError::Upstream("empty rankings page".to_owned()));
        }

        let players = parse_rankings_html(&html)?;
        info!(players = players.len(), "player rankings fetched");
        Ok(players)
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::Html;
    use axum::routing::get;

    use super::*;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_parses_served_rankings_with_browser_agent() {
        // Arrange
        let router = Router::new().route(
            "/rankings",
            get(|headers: HeaderMap| async move {
                assert!(headers["user-agent"].to_str().unwrap().starts_with("Mozilla/5.0"));
                Html(
                    r#"<table id="ranking-table">
                        <tr><th>RK</th><th>Player</th></tr>
                        <tr><td>1</td><td><a>Bijan Robinson</a> <small>(ATL - RB)</small></td></tr>
                    </table>"#,
                )
            }),
        );
        let base = serve(router).await;
        let feed = RankingsFeed::new(format!("{base}/rankings")).unwrap();

        // Act
        let players = feed.fetch().await.unwrap();

        // Assert
        assert_eq!(players, vec![Player::new("Bijan Robinson", "ATL", "RB")]);
    }

    #[tokio::test]
    async fn test_fetch_reports_error_status() {
        let router = Router::new().route(
            "/rankings",
            get(|| async { (StatusCode::FORBIDDEN, "blocked") }),
        );
        let base = serve(router).await;
        let feed = RankingsFeed::new(format!("{base}/rankings")).unwrap();

        let err = feed.fetch().await.unwrap_err();

        assert!(matches!(err, DomainError::Upstream(_)));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_page() {
        let router = Router::new().route("/rankings", get(|| async { Html("   ") }));
        let base = serve(router).await;
        let feed = RankingsFeed::new(format!("{base}/rankings")).unwrap();

        let err = feed.fetch().await.unwrap_err();

        assert!(err.to_string().contains("empty rankings page"));
    }
}
