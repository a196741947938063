//! Retry schedule parameters.
//!
//! [`ScheduleConfig`] controls the per-course retry loop in
//! [`RetryScheduler`](crate::use_cases::run_enrollment::RetryScheduler).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What a course loop does after a terminal verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalPolicy {
    /// Stop submitting once the course is registered or conflicts
    #[default]
    Halt,
    /// Keep submitting forever with a frozen attempt counter
    KeepRetrying,
}

impl std::str::FromStr for TerminalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "halt" => Ok(TerminalPolicy::Halt),
            "keep_retrying" | "keep-retrying" => Ok(TerminalPolicy::KeepRetrying),
            other => Err(format!("unknown terminal policy: {}", other)),
        }
    }
}

/// Retry loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Fixed delay between two attempts of the same course.
    pub interval: Duration,
    /// Behaviour after `Success` or `ScheduleConflict`.
    pub terminal_policy: TerminalPolicy,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            terminal_policy: TerminalPolicy::Halt,
        }
    }
}

impl ScheduleConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_terminal_policy(mut self, policy: TerminalPolicy) -> Self {
        self.terminal_policy = policy;
        self
    }
}
