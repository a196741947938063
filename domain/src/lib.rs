//! Domain layer for course-enroll
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Session
//!
//! The portal hands out access in two hops: a central login yields cookies
//! and an identity token, and the course system then yields a management
//! token that every registration request must carry. A [`Session`] holds all
//! of it and is either authenticated or stale.
//!
//! ## Outcome
//!
//! The registration endpoint answers with an HTML page. [`classify`] turns
//! it into one of seven [`Outcome`]s; only `Success` and `ScheduleConflict`
//! are terminal.

pub mod core;
pub mod course;
pub mod portal;
pub mod registration;
pub mod session;

// Re-export commonly used types
pub use crate::core::error::DomainError;
pub use course::{
    course_code::{CourseCode, parse_course_list},
    task::CourseTask,
};
pub use portal::endpoint::{Method, PortalEndpoint, PortalHost};
pub use registration::outcome::{Outcome, classify};
pub use session::{
    credentials::Credentials,
    entities::{CookieJar, Session},
    extract::{extract_identity_token, extract_management_token, has_student_role},
};
