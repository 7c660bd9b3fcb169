//! Trade Grader Core — shared model, ports and error taxonomy.
//!
//! Both sides of the system depend on this crate: the composition engine
//! that talks to the grading service, and the service itself. It contains
//! no transport or persistence code.

pub mod clock;
pub mod command;
pub mod error;
pub mod model;
pub mod ports;
pub mod repository;
pub mod rng;
