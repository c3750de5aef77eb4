//! Structured logging for Poseidon.
//!
//! Console output (human or JSON) plus optional daily-rolling NDJSON files.

pub mod logger;

pub use logger::{init_logger, ConsoleTarget, LogSettings};
