//! Submit Course use case
//!
//! One registration attempt under exclusive access to the shared session.

use crate::ports::portal_client::{PortalClient, PortalRequest, TransportError};
use crate::use_cases::authenticate::{AuthenticationError, SessionManager};
use chrono::{DateTime, Local};
use enroll_domain::{CourseCode, Outcome, PortalEndpoint, Session, classify};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Errors that end an attempt before the portal's verdict is known
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Registration request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Session could not be established: {0}")]
    Authentication(#[from] AuthenticationError),
}

/// What happened to the session after a `SessionExpired` verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reauthentication {
    /// The verdict did not require a new session
    NotNeeded,
    /// A fresh session was established before the attempt returned
    Succeeded,
    /// The handshake failed; the session stays stale until the next attempt
    Failed(String),
}

impl Reauthentication {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reauthentication::NotNeeded => "not_needed",
            Reauthentication::Succeeded => "succeeded",
            Reauthentication::Failed(_) => "failed",
        }
    }
}

/// Result of one classified registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReport {
    pub code: CourseCode,
    /// Attempt number this submission was made under
    pub attempt: u64,
    pub outcome: Outcome,
    /// When exclusive session access was obtained
    pub timestamp: DateTime<Local>,
    pub reauthentication: Reauthentication,
    /// Raw body, kept only for unrecognised responses
    pub raw_body: Option<String>,
}

/// The single serialization point for all portal traffic after startup
///
/// Every registration request, and any handshake it triggers, runs while the
/// session mutex is held. Other course loops wait on the lock, so at most one
/// request is ever in flight and nobody submits with a session that is being
/// rebuilt.
pub struct SubmissionGate<C: PortalClient + 'static> {
    session: Arc<Mutex<Session>>,
    manager: SessionManager<C>,
    client: Arc<C>,
}

impl<C: PortalClient + 'static> SubmissionGate<C> {
    pub fn new(session: Arc<Mutex<Session>>, manager: SessionManager<C>, client: Arc<C>) -> Self {
        Self {
            session,
            manager,
            client,
        }
    }

    /// Shared session handle
    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// Establish a session under the lock, e.g. at startup.
    ///
    /// Returns the session generation on success.
    pub async fn authenticate(&self) -> Result<u64, AuthenticationError> {
        let mut session = self.session.lock().await;
        self.manager.refresh(&mut session).await?;
        Ok(session.generation())
    }

    /// Perform exactly one registration attempt for `code`.
    ///
    /// A stale session is rebuilt first; if that fails no registration
    /// request is sent. A `SessionExpired` verdict triggers a full refresh
    /// before the lock is released.
    pub async fn submit(
        &self,
        code: &CourseCode,
        attempt: u64,
    ) -> Result<AttemptReport, SubmitError> {
        let mut session = self.session.lock().await;
        let timestamp = Local::now();

        if !session.is_authenticated() {
            debug!("Session is stale, authenticating before submitting {}", code);
            self.manager.refresh(&mut session).await?;
        }

        let token = session
            .management_token()
            .ok_or(AuthenticationError::ManagementIdNotFound)?
            .to_string();

        let request = PortalRequest::new(PortalEndpoint::SaveCourse)
            .with_form("sids", code.as_str())
            .with_form("s", token)
            .with_cookies(session.cookies());

        let response = self.client.send(request).await?;
        session.merge_cookies(response.cookies);

        let outcome = classify(&response.body);
        let raw_body = match outcome {
            Outcome::Unknown => {
                warn!("sid:[{}] count:[{}] unrecognised response: {}", code, attempt, response.body);
                Some(response.body)
            }
            _ => {
                info!(
                    "sid:[{}] count:[{}] time:[{}]: {}",
                    code,
                    attempt,
                    timestamp.format("%Y-%m-%d %H:%M:%S"),
                    outcome.verdict()
                );
                None
            }
        };

        let reauthentication = if outcome.requires_reauthentication() {
            session.mark_stale();
            match self.manager.refresh(&mut session).await {
                Ok(()) => Reauthentication::Succeeded,
                Err(e) => {
                    warn!("Re-authentication after expired session failed: {}", e);
                    Reauthentication::Failed(e.to_string())
                }
            }
        } else {
            Reauthentication::NotNeeded
        };

        Ok(AttemptReport {
            code: code.clone(),
            attempt,
            outcome,
            timestamp,
            reauthentication,
            raw_body,
        })
    }
}
