//! Scripted `SearchClient` for driving autocomplete races in tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tradegrader_core::error::SearchError;
use tradegrader_core::model::Suggestion;
use tradegrader_core::ports::SearchClient;

#[derive(Debug, Clone)]
struct ScriptedResponse {
    delay: Duration,
    result: Result<Vec<Suggestion>, SearchError>,
}

/// A search client that answers each query from a script, optionally after a
/// per-query delay, and records every query that reached it.
///
/// Delays are measured with `tokio::time`, so under a paused test clock they
/// decide the order in which concurrent responses arrive. Unscripted queries
/// answer immediately with no suggestions.
#[derive(Debug, Default)]
pub struct ScriptedSearchClient {
    script: HashMap<String, ScriptedResponse>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearchClient {
    /// Create a client with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` immediately with `suggestions`.
    #[must_use]
    pub fn respond(self, query: &str, suggestions: Vec<Suggestion>) -> Self {
        self.respond_after(query, Duration::ZERO, suggestions)
    }

    /// Answer `query` with `suggestions` after `delay`.
    #[must_use]
    pub fn respond_after(
        mut self,
        query: &str,
        delay: Duration,
        suggestions: Vec<Suggestion>,
    ) -> Self {
        self.script.insert(
            query.to_owned(),
            ScriptedResponse {
                delay,
                result: Ok(suggestions),
            },
        );
        self
    }

    /// Fail `query` with `message` after `delay`.
    #[must_use]
    pub fn fail_after(mut self, query: &str, delay: Duration, message: &str) -> Self {
        self.script.insert(
            query.to_owned(),
            ScriptedResponse {
                delay,
                result: Err(SearchError::new(message)),
            },
        );
        self
    }

    /// Returns every non-empty query received, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for ScriptedSearchClient {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.queries.lock().unwrap().push(query.to_owned());

        let Some(response) = self.script.get(query).cloned() else {
            return Ok(Vec::new());
        };
        if !response.delay.is_zero() {
            tokio::time::sleep(response.delay).await;
        }
        response.result
    }
}
