//! Application services for the grading context.

pub mod catalog_cache;
pub mod catalog_loader;
pub mod command_handlers;
pub mod gemini;
pub mod grader;
pub mod player_feed;
pub mod query_handlers;
