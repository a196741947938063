//! Session authentication use case
//!
//! Runs the four-step portal handshake that turns credentials into an
//! authenticated [`Session`].

use crate::ports::portal_client::{PortalClient, PortalRequest, PortalResponse, TransportError};
use enroll_domain::{
    Credentials, PortalEndpoint, Session, extract_identity_token, extract_management_token,
    has_student_role,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during the handshake
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Handshake step {step} failed: {source}")]
    Transport {
        step: PortalEndpoint,
        #[source]
        source: TransportError,
    },

    #[error("Identity token not found on the portal page")]
    IdentityNotFound,

    #[error("Course system did not grant the student role")]
    RoleVerification,

    #[error("Management token not found on the course landing page")]
    ManagementIdNotFound,
}

/// Owns the credentials and performs the handshake
///
/// The manager never locks the session itself: callers hand it a `&mut
/// Session` borrowed from the guard they already hold, so a refresh runs
/// inside the caller's critical section.
pub struct SessionManager<C: PortalClient + 'static> {
    client: Arc<C>,
    credentials: Credentials,
}

impl<C: PortalClient + 'static> SessionManager<C> {
    pub fn new(client: Arc<C>, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Rebuild the session from scratch.
    ///
    /// The session is stale from the first step until the last one succeeds.
    /// On failure it stays stale: cookies gathered by the completed steps are
    /// kept and no token from this attempt is committed.
    pub async fn refresh(&self, session: &mut Session) -> Result<(), AuthenticationError> {
        session.mark_stale();
        info!("Authenticating as {}", self.credentials.user_name());

        // Step 1: Primary login
        self.primary_login(session).await?;

        // Step 2: Identity discovery
        let identity = self.identity_discovery(session).await?;

        // Step 3: Course-system login
        self.course_login(session, &identity).await?;

        // Step 4: Management-id discovery
        let management = self.management_discovery(session).await?;

        session.authenticate(identity, management);
        info!(
            "Session established (generation {})",
            session.generation()
        );
        Ok(())
    }

    async fn primary_login(&self, session: &mut Session) -> Result<(), AuthenticationError> {
        let request = PortalRequest::new(PortalEndpoint::PrimaryLogin)
            .with_form("userName", self.credentials.user_name())
            .with_form("pwd", self.credentials.password())
            .with_form("sb", "sb");

        let response = self.send(request).await?;
        debug!("Primary login returned {} cookies", response.cookies.len());
        session.replace_cookies(response.cookies);
        Ok(())
    }

    async fn identity_discovery(
        &self,
        session: &mut Session,
    ) -> Result<String, AuthenticationError> {
        let request =
            PortalRequest::new(PortalEndpoint::IdentityPage).with_cookies(session.cookies());
        let response = self.send(request).await?;
        session.merge_cookies(response.cookies);

        match extract_identity_token(&response.body) {
            Some(token) => {
                debug!("Identity token: {}", token);
                Ok(token.to_string())
            }
            None => {
                warn!("Identity token not found");
                debug!("Portal page body: {}", response.body);
                Err(AuthenticationError::IdentityNotFound)
            }
        }
    }

    async fn course_login(
        &self,
        session: &mut Session,
        identity: &str,
    ) -> Result<(), AuthenticationError> {
        let request = PortalRequest::new(PortalEndpoint::CourseLogin)
            .with_query("Identity", identity)
            .with_cookies(session.cookies());
        let response = self.send(request).await?;
        session.merge_cookies(response.cookies);

        if has_student_role(&response.body) {
            Ok(())
        } else {
            warn!("Course-system login did not grant the student role");
            debug!("Course login body: {}", response.body);
            Err(AuthenticationError::RoleVerification)
        }
    }

    async fn management_discovery(
        &self,
        session: &mut Session,
    ) -> Result<String, AuthenticationError> {
        let request =
            PortalRequest::new(PortalEndpoint::CourseMain).with_cookies(session.cookies());
        let response = self.send(request).await?;
        session.merge_cookies(response.cookies);

        match extract_management_token(&response.body) {
            Some(token) => {
                debug!("Management token: {}", token);
                Ok(token.to_string())
            }
            None => {
                warn!("Management token not found");
                debug!("Course landing body: {}", response.body);
                Err(AuthenticationError::ManagementIdNotFound)
            }
        }
    }

    async fn send(&self, request: PortalRequest) -> Result<PortalResponse, AuthenticationError> {
        let step = request.endpoint;
        self.client
            .send(request)
            .await
            .map_err(|source| AuthenticationError::Transport { step, source })
    }
}
