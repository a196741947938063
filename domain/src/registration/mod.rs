//! Registration verdicts.
//!
//! - [`outcome::Outcome`]: the seven classified results of a registration attempt
//! - [`outcome::classify`]: ordered substring matching over a response body

pub mod outcome;
