//! Ports to the two remote collaborators the composition engine talks to.
//!
//! Implementations are stateless with respect to ordering: they neither
//! deduplicate nor reorder requests. Race resolution belongs to the caller.

use async_trait::async_trait;

use crate::error::{SearchError, ServiceError};
use crate::model::{AnalysisResult, Suggestion, TradeRequest};

/// Player search endpoint.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Returns the suggestions matching `query`.
    ///
    /// An empty `query` yields an empty list without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] on network failure, non-2xx status, or a
    /// malformed payload.
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>, SearchError>;
}

/// Trade grading endpoint.
#[async_trait]
pub trait GradingClient: Send + Sync {
    /// Submits a trade for grading.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on network failure, timeout, non-2xx status,
    /// or a malformed payload.
    async fn analyze(&self, request: &TradeRequest) -> Result<AnalysisResult, ServiceError>;
}
