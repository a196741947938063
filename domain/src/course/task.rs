//! Per-course retry state

use super::course_code::CourseCode;
use crate::registration::outcome::Outcome;

/// Retry state for one requested course (Entity)
///
/// The attempt counter starts at 1 and only advances after non-terminal
/// results. The first terminal verdict is kept for good: later replies still
/// update `last_outcome`, but neither unfinish the task nor move the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseTask {
    code: CourseCode,
    attempt_count: u64,
    last_outcome: Option<Outcome>,
    terminal_outcome: Option<Outcome>,
    failures: u64,
}

impl CourseTask {
    pub fn new(code: CourseCode) -> Self {
        Self {
            code,
            attempt_count: 1,
            last_outcome: None,
            terminal_outcome: None,
            failures: 0,
        }
    }

    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    /// Attempt number to report for the next submission
    pub fn attempt_count(&self) -> u64 {
        self.attempt_count
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// First terminal verdict, if any
    pub fn terminal_outcome(&self) -> Option<Outcome> {
        self.terminal_outcome
    }

    /// Terminal verdict if reached, otherwise the latest one
    pub fn final_outcome(&self) -> Option<Outcome> {
        self.terminal_outcome.or(self.last_outcome)
    }

    /// Number of attempts that ended in an error instead of a verdict
    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Whether a terminal verdict has been reached
    pub fn is_finished(&self) -> bool {
        self.terminal_outcome.is_some()
    }

    /// Record a classified verdict
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.last_outcome = Some(outcome);
        if self.is_finished() {
            return;
        }
        if outcome.is_terminal() {
            self.terminal_outcome = Some(outcome);
        } else if outcome.counts_as_attempt() {
            self.attempt_count += 1;
        }
    }

    /// Record an attempt that failed before producing a verdict
    pub fn record_failure(&mut self) {
        if !self.is_finished() {
            self.attempt_count += 1;
        }
        self.failures += 1;
    }
}
