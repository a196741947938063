//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod authenticate;
pub mod run_enrollment;
pub mod submit_course;

#[cfg(test)]
pub(crate) mod test_support;
