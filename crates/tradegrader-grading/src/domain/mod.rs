//! Domain types for the grading context.

pub mod catalog;
pub mod commands;
pub mod rankings;
pub mod scoring;
