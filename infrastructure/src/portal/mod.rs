//! Portal transport adapters

mod http_client;

pub use http_client::ReqwestPortalClient;
