//! Trade Grader — grading context.
//!
//! Owns the player catalog served to the search endpoint, the graders that
//! score a proposed trade, and the handlers that record graded trades.

pub mod application;
pub mod domain;
