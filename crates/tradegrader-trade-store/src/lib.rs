//! Trade Grader — SQLite persistence for graded trades.

pub mod sqlite_trade_repository;
