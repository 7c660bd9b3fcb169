//! Trade Grader Compose — the interactive composition engine.
//!
//! Turns keystrokes into debounced player searches, discards responses that
//! were overtaken by newer ones, keeps an always-non-empty list of slots per
//! side of the trade, and drives submission to the grading service.
//!
//! All state lives in a single [`Composer`](composer::Composer) driven from
//! one task. Timers and HTTP calls run as spawned tasks that only report
//! back through the composer's event channel.

pub mod autocomplete;
pub mod composer;
pub mod config;
pub mod debounce;
pub mod draft;
pub mod error;
pub mod events;
pub mod http;
pub mod slots;
pub mod submission;
pub mod view;
