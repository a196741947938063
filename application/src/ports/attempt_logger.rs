//! Port for structured attempt logging.
//!
//! Defines the [`AttemptLogger`] trait for recording every registration
//! attempt and handshake to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures one record
//! per attempt for later analysis (JSONL).

use crate::use_cases::submit_course::AttemptReport;
use enroll_domain::CourseCode;
use serde_json::{Value, json};

/// A structured attempt event for logging.
pub struct AttemptEvent {
    /// Event type identifier (e.g., "attempt", "attempt_failed", "authenticated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AttemptEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    /// A classified registration attempt
    pub fn attempt(report: &AttemptReport) -> Self {
        let mut payload = json!({
            "code": report.code.as_str(),
            "attempt": report.attempt,
            "outcome": report.outcome.as_str(),
            "verdict": report.outcome.verdict(),
            "attempted_at": report.timestamp.to_rfc3339(),
            "reauthentication": report.reauthentication.as_str(),
        });
        if let Some(body) = &report.raw_body {
            payload["body"] = Value::String(body.clone());
        }
        Self::new("attempt", payload)
    }

    /// An attempt that ended in an error before a verdict
    pub fn failure(code: &CourseCode, attempt: u64, error: &str) -> Self {
        Self::new(
            "attempt_failed",
            json!({
                "code": code.as_str(),
                "attempt": attempt,
                "error": error,
            }),
        )
    }

    /// A course loop stopped after a terminal verdict
    pub fn finished(code: &CourseCode, attempts: u64, outcome: &str) -> Self {
        Self::new(
            "course_finished",
            json!({
                "code": code.as_str(),
                "attempts": attempts,
                "outcome": outcome,
            }),
        )
    }
}

/// Port for logging attempt events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored so they never interrupt a retry loop.
pub trait AttemptLogger: Send + Sync {
    /// Record an attempt event.
    fn log(&self, event: AttemptEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoAttemptLogger;

impl AttemptLogger for NoAttemptLogger {
    fn log(&self, _event: AttemptEvent) {}
}
