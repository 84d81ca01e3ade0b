#![forbid(unsafe_code)]

//! Shared test utilities for the fairkey workspace.

pub mod http_server;
pub mod key_request;

pub use http_server::TestHttpServer;
pub use key_request::{RecordingKeyRequest, Resolution};
