//! Requested courses.
//!
//! - [`course_code::CourseCode`]: validated six-digit course code
//! - [`task::CourseTask`]: attempt counter and last verdict for one course

pub mod course_code;
pub mod task;
