//! Logging infrastructure: structured attempt logging.
//!
//! Provides [`JsonlAttemptLogger`], a JSONL file writer that implements
//! the [`AttemptLogger`](enroll_application::AttemptLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlAttemptLogger;
