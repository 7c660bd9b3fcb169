//! Commands for the grading context.

use tradegrader_core::command::Command;
use uuid::Uuid;

/// Command to grade a proposed trade and record it.
#[derive(Debug, Clone)]
pub struct AnalyzeTrade {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Players the user would receive.
    pub incoming_players: Vec<String>,
    /// Players the user would give up.
    pub outgoing_players: Vec<String>,
}

impl Command for AnalyzeTrade {
    fn command_type(&self) -> &'static str {
        "trades.analyze"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
