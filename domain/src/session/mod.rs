//! Portal session domain.
//!
//! - [`entities::Session`]: cookies plus the two handshake tokens
//! - [`credentials::Credentials`]: central login username/password
//! - [`extract`]: pulling tokens and role markers out of handshake pages

pub mod credentials;
pub mod entities;
pub mod extract;
