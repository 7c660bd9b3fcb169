//! Test repositories — in-memory `TradeRepository` implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use tradegrader_core::error::DomainError;
use tradegrader_core::repository::{NewTradeRecord, TradeRecord, TradeRepository};

/// A trade repository that keeps records in memory and assigns ids from 1.
#[derive(Debug, Default)]
pub struct InMemoryTradeRepository {
    records: Mutex<Vec<TradeRecord>>,
}

impl InMemoryTradeRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every stored record, in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn records(&self) -> Vec<TradeRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl TradeRepository for InMemoryTradeRepository {
    async fn insert(&self, record: NewTradeRecord) -> Result<TradeRecord, DomainError> {
        let mut records = self.records.lock().unwrap();
        let id = i64::try_from(records.len()).unwrap_or(i64::MAX) + 1;
        let stored = TradeRecord::from_new(id, record);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<TradeRecord>, DomainError> {
        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit as usize);
        Ok(records)
    }
}

/// A trade repository that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingTradeRepository;

#[async_trait]
impl TradeRepository for FailingTradeRepository {
    async fn insert(&self, _record: NewTradeRecord) -> Result<TradeRecord, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn recent(&self, _limit: u32) -> Result<Vec<TradeRecord>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
