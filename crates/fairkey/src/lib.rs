#![forbid(unsafe_code)]

//! Client-side license acquisition for FairPlay-style content protection.
//!
//! During encrypted playback the platform media framework blocks a decode
//! thread and asks the application for a decryption key. This crate
//! implements that request/response bridge: it intercepts key-request
//! events for the reserved `skd` scheme, resolves the application
//! certificate, asks the framework's opaque generator for a key-request
//! blob, exchanges it with a remote license server over HTTP, and feeds
//! the decoded content-key payload back to the framework — resolving every
//! accepted event exactly once, success or failure, within a bounded wait.
//!
//! The framework side is abstracted behind the [`KeyRequest`] trait; the
//! host player layer wraps its native loading-request object and forwards
//! the framework's callbacks:
//!
//! ```ignore
//! use fairkey::{DrmConfig, LicenseBridge};
//! use url::Url;
//!
//! let config = DrmConfig::new(certificate_url)
//!     .with_license_url(license_url)
//!     .with_license_header("X-License-Token", token);
//! let bridge = LicenseBridge::new(config)?;
//!
//! // Framework callback, on a thread the framework owns:
//! let handled = bridge.handle_key_request(&mut request);
//! ```

pub mod bridge;
pub mod certificate;
pub mod config;
pub mod request;
pub mod spc;

mod exchange;

pub use crate::{
    bridge::{KEY_REQUEST_SCHEME, LicenseBridge},
    certificate::{CertResult, CertificateError, CertificateProvider},
    config::{DEFAULT_LICENSE_SERVER, DrmConfig, EXCHANGE_TIMEOUT},
    request::{FailureCode, GenerationError, KeyRequest, KeyRequestOptions},
};

// Net-layer types callers need for configuration.
pub use fairkey_net::{Headers, HttpClient, Net, NetError, NetOptions, NetResult};
