//! Registration outcome and response classification

use serde::{Deserialize, Serialize};

/// Body marker for a successful registration
pub const MARKER_SUCCESS: &str = "选课成功";
/// Body marker asking the student to log in again
pub const MARKER_SESSION_EXPIRED: &str = "重新登录";
/// Body marker for a course whose quota is exhausted
pub const MARKER_CAPACITY_FULL: &str = "超过限选人数";
/// Body marker for a request outside the registration window
pub const MARKER_TIME_WINDOW_CLOSED: &str = "当前时间不在选课有效时间内";
/// Body marker for a student without registration permission
pub const MARKER_NOT_AUTHORIZED: &str = "未开通选课权限";
/// Body marker for a class-time conflict with an already registered course
pub const MARKER_SCHEDULE_CONFLICT: &str = "上课时间冲突";

/// Classified result of one registration attempt (Value Object)
///
/// Variants are declared in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    SessionExpired,
    CapacityFull,
    TimeWindowClosed,
    NotAuthorized,
    ScheduleConflict,
    Unknown,
}

/// Marker table checked top to bottom; first hit wins.
const MARKERS: [(&str, Outcome); 6] = [
    (MARKER_SUCCESS, Outcome::Success),
    (MARKER_SESSION_EXPIRED, Outcome::SessionExpired),
    (MARKER_CAPACITY_FULL, Outcome::CapacityFull),
    (MARKER_TIME_WINDOW_CLOSED, Outcome::TimeWindowClosed),
    (MARKER_NOT_AUTHORIZED, Outcome::NotAuthorized),
    (MARKER_SCHEDULE_CONFLICT, Outcome::ScheduleConflict),
];

/// Map a registration response body to exactly one [`Outcome`].
pub fn classify(body: &str) -> Outcome {
    MARKERS
        .iter()
        .find(|(marker, _)| body.contains(marker))
        .map(|(_, outcome)| *outcome)
        .unwrap_or(Outcome::Unknown)
}

impl Outcome {
    /// All outcomes in priority order
    pub const ALL: [Outcome; 7] = [
        Outcome::Success,
        Outcome::SessionExpired,
        Outcome::CapacityFull,
        Outcome::TimeWindowClosed,
        Outcome::NotAuthorized,
        Outcome::ScheduleConflict,
        Outcome::Unknown,
    ];

    /// Terminal verdicts end the retry loop for a course
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::ScheduleConflict)
    }

    /// The session is stale and must be rebuilt before the next request
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, Outcome::SessionExpired)
    }

    /// Whether the attempt counter advances after this outcome
    pub fn counts_as_attempt(&self) -> bool {
        !self.is_terminal()
    }

    /// Stable identifier used in structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::SessionExpired => "session_expired",
            Outcome::CapacityFull => "capacity_full",
            Outcome::TimeWindowClosed => "time_window_closed",
            Outcome::NotAuthorized => "not_authorized",
            Outcome::ScheduleConflict => "schedule_conflict",
            Outcome::Unknown => "unknown",
        }
    }

    /// Human-readable verdict for console output
    pub fn verdict(&self) -> &'static str {
        match self {
            Outcome::Success => "registered",
            Outcome::SessionExpired => "session expired, logging in again",
            Outcome::CapacityFull => "course full, waiting for a seat",
            Outcome::TimeWindowClosed => "outside the registration window",
            Outcome::NotAuthorized => "registration not enabled for this student",
            Outcome::ScheduleConflict => "class-time conflict",
            Outcome::Unknown => "unrecognised response",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
