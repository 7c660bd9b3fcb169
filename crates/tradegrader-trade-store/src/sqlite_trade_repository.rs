//! `SQLite` implementation of the `TradeRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::types::Json;
use tracing::debug;

use tradegrader_core::error::DomainError;
use tradegrader_core::model::Grade;
use tradegrader_core::repository::{NewTradeRecord, TradeRecord, TradeRepository};

fn infrastructure(context: &str, err: &impl std::fmt::Display) -> DomainError {
    DomainError::Infrastructure(format!("{context}: {err}"))
}

#[derive(Debug, sqlx::FromRow)]
struct TradeRow {
    id: i64,
    incoming_players: Json<Vec<String>>,
    outgoing_players: Json<Vec<String>>,
    score: i64,
    grade: String,
    analysis: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<TradeRow> for TradeRecord {
    type Error = DomainError;

    fn try_from(row: TradeRow) -> Result<Self, Self::Error> {
        let score = u8::try_from(row.score)
            .map_err(|e| infrastructure(&format!("trade {} has invalid score", row.id), &e))?;
        Ok(Self {
            id: row.id,
            incoming_players: row.incoming_players.0,
            outgoing_players: row.outgoing_players.0,
            score,
            grade: Grade::from_label(&row.grade),
            analysis: row.analysis,
            created_at: row.created_at,
        })
    }
}

/// SQLite-backed trade repository.
#[derive(Debug, Clone)]
pub struct SqliteTradeRepository {
    pool: SqlitePool,
}

impl SqliteTradeRepository {
    /// Creates a new `SqliteTradeRepository`.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Applies the schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if a migration fails.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| infrastructure("migration failed", &e))
    }
}

#[async_trait]
impl TradeRepository for SqliteTradeRepository {
    async fn insert(&self, record: NewTradeRecord) -> Result<TradeRecord, DomainError> {
        let result = sqlx::query(
            "INSERT INTO trades \
             (incoming_players, outgoing_players, score, grade, analysis, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Json(&record.incoming_players))
        .bind(Json(&record.outgoing_players))
        .bind(i64::from(record.score))
        .bind(record.grade.label())
        .bind(&record.analysis)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| infrastructure("trade insert failed", &e))?;

        let id = result.last_insert_rowid();
        debug!(trade_id = id, "trade stored");
        Ok(TradeRecord::from_new(id, record))
    }

    async fn recent(&self, limit: u32) -> Result<Vec<TradeRecord>, DomainError> {
        let rows: Vec<TradeRow> = sqlx::query_as(
            "SELECT id, incoming_players, outgoing_players, score, grade, analysis, created_at \
             FROM trades ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| infrastructure("trade history query failed", &e))?;

        rows.into_iter().map(TradeRecord::try_from).collect()
    }
}
