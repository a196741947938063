//! Application-level configuration.
//!
//! - [`ScheduleConfig`]: retry interval and terminal-verdict policy

pub mod schedule;

pub use schedule::{ScheduleConfig, TerminalPolicy};
