//! Portal login credentials

use crate::core::error::DomainError;

/// Username and password for the central portal login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user_name: String,
    password: String,
}

impl Credentials {
    /// Build credentials, rejecting blank fields.
    ///
    /// Field names in errors follow the credentials file keys.
    pub fn new(
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let user_name = user_name.into();
        let password = password.into();
        if user_name.trim().is_empty() {
            return Err(DomainError::MissingCredential("userName"));
        }
        if password.trim().is_empty() {
            return Err(DomainError::MissingCredential("pwd"));
        }
        Ok(Self {
            user_name,
            password,
        })
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .finish()
    }
}
