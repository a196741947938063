//! Errors raised while loading settings and input files

use super::file_config::ConfigValidationError;
use enroll_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration errors, reported before any portal request is sent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential '{0}' is missing or blank")]
    MissingCredential(&'static str),

    #[error("No valid course code found in {0}")]
    NoCourses(String),

    #[error("Invalid portal URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Could not build HTTP client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Validation(#[from] ConfigValidationError),

    #[error(transparent)]
    Domain(DomainError),
}

impl From<DomainError> for ConfigError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::MissingCredential(field) => ConfigError::MissingCredential(field),
            other => ConfigError::Domain(other),
        }
    }
}
