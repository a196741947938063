//! Presentation layer for course-enroll
//!
//! This crate contains the CLI definition, per-attempt reporters,
//! and the end-of-run summary.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::SummaryFormatter;
pub use progress::reporter::{ConsoleReporter, SpinnerReporter, format_attempt_line};
