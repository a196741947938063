//! Portal layout: hosts, paths and methods of the endpoints we call.

pub mod endpoint;
