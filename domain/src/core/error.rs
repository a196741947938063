//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid course code: {0:?} (expected 6 digits)")]
    InvalidCourseCode(String),

    #[error("Credential field '{0}' is missing or blank")]
    MissingCredential(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_course_code_display() {
        let error = DomainError::InvalidCourseCode("12345".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid course code: \"12345\" (expected 6 digits)"
        );
    }

    #[test]
    fn test_missing_credential_display() {
        let error = DomainError::MissingCredential("pwd");
        assert_eq!(error.to_string(), "Credential field 'pwd' is missing or blank");
    }
}
