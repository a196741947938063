//! Final output formatting

pub mod console;
