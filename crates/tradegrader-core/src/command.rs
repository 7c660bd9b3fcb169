//! Command abstraction for server-side write operations.

use uuid::Uuid;

/// A request to change server state, e.g. grading and recording a trade.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted type name used in log fields, e.g. `trades.analyze`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID carried through every log line the command produces.
    fn correlation_id(&self) -> Uuid;
}
