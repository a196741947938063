//! Portal client port
//!
//! Defines the interface for the raw HTTP round-trip to the enrollment portal.

use async_trait::async_trait;
use enroll_domain::{CookieJar, PortalEndpoint};
use thiserror::Error;

/// Errors raised by the transport itself, before any body is classified
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request to {endpoint} timed out")]
    Timeout { endpoint: PortalEndpoint },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: PortalEndpoint, status: u16 },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// One request to the portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRequest {
    pub endpoint: PortalEndpoint,
    /// Query string parameters
    pub query: Vec<(String, String)>,
    /// Form fields (only sent for POST endpoints)
    pub form: Vec<(String, String)>,
    /// Cookies to send with the request
    pub cookies: CookieJar,
}

impl PortalRequest {
    pub fn new(endpoint: PortalEndpoint) -> Self {
        Self {
            endpoint,
            query: Vec::new(),
            form: Vec::new(),
            cookies: CookieJar::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_form(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    pub fn with_cookies(mut self, cookies: &CookieJar) -> Self {
        self.cookies = cookies.clone();
        self
    }

    /// Look up a form field by name
    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// What came back from the portal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortalResponse {
    pub body: String,
    /// Cookies set by this response, in arrival order
    pub cookies: Vec<(String, String)>,
}

impl PortalResponse {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            cookies: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }
}

/// HTTP collaborator for the enrollment portal
///
/// Implementations own connection pooling and per-request timeouts. They do
/// not keep cookies between calls; the caller passes the session's cookies
/// on every request and merges what comes back.
#[async_trait]
pub trait PortalClient: Send + Sync {
    /// Perform one request
    async fn send(&self, request: PortalRequest) -> Result<PortalResponse, TransportError>;
}
