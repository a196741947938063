//! Infrastructure layer for course-enroll
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus settings and input file loading.

pub mod config;
pub mod logging;
pub mod portal;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, ConfigValidationError, CourseListLoader, CredentialsLoader,
    FileConfig, FileFilesConfig, FilePortalConfig, FileScheduleConfig,
};
pub use logging::JsonlAttemptLogger;
pub use portal::ReqwestPortalClient;
