//! Authenticated portal session

use std::collections::BTreeMap;

/// Cookie name → value, kept ordered so the `Cookie` header is stable
pub type CookieJar = BTreeMap<String, String>;

/// Accumulated authentication state shared by every course task (Entity)
///
/// A session is either authenticated (both tokens committed by a complete
/// handshake) or stale. Tokens are only ever written together through
/// [`Session::authenticate`]; a failed handshake leaves the previous tokens
/// in place but the session stays stale, so they are never used.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cookies: CookieJar,
    identity_token: Option<String>,
    management_token: Option<String>,
    authenticated: bool,
    generation: u64,
}

impl Session {
    /// Empty, stale session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Union-merge cookies; incoming values overwrite existing ones
    pub fn merge_cookies<I>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.cookies.extend(cookies);
    }

    /// Start a fresh cookie base, discarding whatever was held
    pub fn replace_cookies<I>(&mut self, cookies: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.cookies = cookies.into_iter().collect();
    }

    pub fn identity_token(&self) -> Option<&str> {
        self.identity_token.as_deref()
    }

    /// Token sent as `s` on every registration request.
    ///
    /// `None` while the session is stale.
    pub fn management_token(&self) -> Option<&str> {
        if self.authenticated {
            self.management_token.as_deref()
        } else {
            None
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Number of completed handshakes over the lifetime of this session
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The portal rejected this session; it must be rebuilt before reuse
    pub fn mark_stale(&mut self) {
        self.authenticated = false;
    }

    /// Commit both tokens from a completed handshake
    pub fn authenticate(
        &mut self,
        identity_token: impl Into<String>,
        management_token: impl Into<String>,
    ) {
        self.identity_token = Some(identity_token.into());
        self.management_token = Some(management_token.into());
        self.authenticated = true;
        self.generation += 1;
    }
}
