//! Live attempt reporting

pub mod reporter;
