//! Application layer for course-enroll
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ScheduleConfig, TerminalPolicy};
pub use ports::{
    attempt_logger::{AttemptEvent, AttemptLogger, NoAttemptLogger},
    attempt_notifier::{AttemptNotifier, NoNotifier},
    portal_client::{PortalClient, PortalRequest, PortalResponse, TransportError},
};
pub use use_cases::authenticate::{AuthenticationError, SessionManager};
pub use use_cases::run_enrollment::{EnrollmentSummary, RetryScheduler};
pub use use_cases::submit_course::{AttemptReport, Reauthentication, SubmissionGate, SubmitError};
