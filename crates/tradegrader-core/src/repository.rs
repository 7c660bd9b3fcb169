//! Trade history repository abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DomainError;
use crate::model::Grade;

/// A graded trade that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTradeRecord {
    /// Players received.
    pub incoming_players: Vec<String>,
    /// Players given up.
    pub outgoing_players: Vec<String>,
    /// Score in `0..=100`.
    pub score: u8,
    /// Categorical grade.
    pub grade: Grade,
    /// Narrative analysis.
    pub analysis: String,
    /// When the trade was graded.
    pub created_at: DateTime<Utc>,
}

/// A persisted graded trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeRecord {
    /// Storage-assigned identifier, returned to clients as `trade_id`.
    pub id: i64,
    /// Players received.
    pub incoming_players: Vec<String>,
    /// Players given up.
    pub outgoing_players: Vec<String>,
    /// Score in `0..=100`.
    pub score: u8,
    /// Categorical grade.
    pub grade: Grade,
    /// Narrative analysis.
    pub analysis: String,
    /// When the trade was graded.
    pub created_at: DateTime<Utc>,
}

impl TradeRecord {
    /// Attaches a storage identifier to a new record.
    #[must_use]
    pub fn from_new(id: i64, record: NewTradeRecord) -> Self {
        Self {
            id,
            incoming_players: record.incoming_players,
            outgoing_players: record.outgoing_players,
            score: record.score,
            grade: record.grade,
            analysis: record.analysis,
            created_at: record.created_at,
        }
    }
}

/// Repository for graded trades.
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// Persists a graded trade and returns it with its assigned id.
    async fn insert(&self, record: NewTradeRecord) -> Result<TradeRecord, DomainError>;

    /// Returns up to `limit` trades, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<TradeRecord>, DomainError>;
}
