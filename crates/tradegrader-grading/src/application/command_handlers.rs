//! Command handlers for the grading context.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: validate the trade, grade it, persist the record.

use tracing::info;
use tradegrader_core::clock::Clock;
use tradegrader_core::command::Command;
use tradegrader_core::error::DomainError;
use tradegrader_core::model::AnalysisResult;
use tradegrader_core::repository::{NewTradeRecord, TradeRepository};

use super::grader::TradeGrader;
use crate::domain::commands::AnalyzeTrade;

fn non_blank(players: &[String]) -> Vec<String> {
    players
        .iter()
        .filter(|p| !p.trim().is_empty())
        .cloned()
        .collect()
}

/// Handles the `AnalyzeTrade` command: grades the trade and records it.
///
/// Blank entries are dropped before grading.
///
/// # Errors
///
/// Returns `DomainError::Validation` if either side has no non-blank entry,
/// and propagates grader and repository failures.
pub async fn handle_analyze_trade(
    command: &AnalyzeTrade,
    grader: &dyn TradeGrader,
    clock: &dyn Clock,
    repo: &dyn TradeRepository,
) -> Result<AnalysisResult, DomainError> {
    let incoming_players = non_blank(&command.incoming_players);
    let outgoing_players = non_blank(&command.outgoing_players);
    if incoming_players.is_empty() || outgoing_players.is_empty() {
        return Err(DomainError::Validation(
            "Must specify both incoming and outgoing players".to_owned(),
        ));
    }

    let report = grader.grade(&incoming_players, &outgoing_players).await?;

    let record = repo
        .insert(NewTradeRecord {
            incoming_players,
            outgoing_players,
            score: report.score,
            grade: report.grade.clone(),
            analysis: report.analysis.clone(),
            created_at: clock.now(),
        })
        .await?;

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        grader = grader.name(),
        trade_id = record.id,
        score = record.score,
        "trade graded and recorded"
    );

    Ok(AnalysisResult {
        score: report.score,
        grade: report.grade,
        analysis: report.analysis,
        trade_id: record.id,
    })
}
