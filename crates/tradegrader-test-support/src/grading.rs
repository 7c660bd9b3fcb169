//! Recording `GradingClient` for submission tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tradegrader_core::error::ServiceError;
use tradegrader_core::model::{AnalysisResult, TradeRequest};
use tradegrader_core::ports::GradingClient;

/// A grading client that records every request and answers from a queue of
/// responses. The last queued response is repeated once the queue is down to
/// one entry.
#[derive(Debug)]
pub struct RecordingGradingClient {
    responses: Mutex<VecDeque<Result<AnalysisResult, ServiceError>>>,
    delay: Duration,
    requests: Mutex<Vec<TradeRequest>>,
}

impl RecordingGradingClient {
    /// Create a client that always answers with `response`.
    #[must_use]
    pub fn new(response: Result<AnalysisResult, ServiceError>) -> Self {
        Self::with_responses(vec![response])
    }

    /// Create a client that answers with `responses` in order.
    ///
    /// # Panics
    ///
    /// Panics if `responses` is empty.
    #[must_use]
    pub fn with_responses(responses: Vec<Result<AnalysisResult, ServiceError>>) -> Self {
        assert!(!responses.is_empty(), "at least one response is required");
        Self {
            responses: Mutex::new(responses.into()),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delay every answer by `delay` (measured with `tokio::time`).
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns every request received, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn requests(&self) -> Vec<TradeRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<AnalysisResult, ServiceError> {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl GradingClient for RecordingGradingClient {
    async fn analyze(&self, request: &TradeRequest) -> Result<AnalysisResult, ServiceError> {
        self.requests.lock().unwrap().push(request.clone());
        let response = self.next_response();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        response
    }
}
