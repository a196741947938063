//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod attempt_logger;
pub mod attempt_notifier;
pub mod portal_client;
