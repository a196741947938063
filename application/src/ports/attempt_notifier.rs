//! Attempt notification port
//!
//! Defines the interface for reporting progress of the retry loops.

use crate::use_cases::submit_course::AttemptReport;
use enroll_domain::{CourseCode, CourseTask};

/// Callback for attempt updates while enrollment is running
///
/// Implementations live in the presentation layer and can display
/// attempts in various ways (log lines, spinners, etc.)
pub trait AttemptNotifier: Send + Sync {
    /// Called when the course loops are about to start
    fn on_start(&self, _codes: &[CourseCode]) {}

    /// Called after every classified registration attempt
    fn on_attempt(&self, report: &AttemptReport);

    /// Called when an attempt ended in an error instead of a verdict
    fn on_attempt_failed(&self, code: &CourseCode, attempt: u64, error: &str);

    /// Called when a session was (re-)established outside a registration attempt
    fn on_authenticated(&self, _generation: u64) {}

    /// Called when establishing a session failed outside a registration attempt
    fn on_authentication_failed(&self, _error: &str) {}

    /// Called when a course loop stops after a terminal verdict
    fn on_course_finished(&self, _task: &CourseTask) {}
}

/// No-op notifier for when progress reporting is not needed
pub struct NoNotifier;

impl AttemptNotifier for NoNotifier {
    fn on_attempt(&self, _report: &AttemptReport) {}
    fn on_attempt_failed(&self, _code: &CourseCode, _attempt: u64, _error: &str) {}
}
