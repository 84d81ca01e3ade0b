#![forbid(unsafe_code)]

//! Framework-facing key-request surface.
//!
//! The media framework owns key-request events; the bridge consumes them
//! through [`KeyRequest`]. An event is terminal: once fulfilled or rejected
//! it must not be touched again, and the bridge resolves every event it
//! accepts exactly once.

use bytes::Bytes;
use thiserror::Error;
use url::Url;

/// Options forwarded to the framework's key-request generator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyRequestOptions {
    /// Request a persistable content key (offline playback).
    pub persistent: bool,
}

/// The framework declined to produce a key-request blob.
///
/// Carries the host framework's own message; the bridge does not interpret
/// it beyond logging.
#[derive(Debug, Error)]
#[error("key request generation failed: {0}")]
pub struct GenerationError(pub String);

/// Terminal failure reported through [`KeyRequest::reject`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureCode {
    /// The application certificate could not be resolved.
    ClientCertificateRejected,
    /// The license server produced no usable response.
    BadServerResponse,
}

/// One pending key request from the media framework.
///
/// Implementations wrap the platform's native loading-request object. The
/// bridge calls [`fulfill`](KeyRequest::fulfill) or
/// [`reject`](KeyRequest::reject) exactly once per accepted event;
/// `reject(None)` is the inert completion the framework defines for
/// failures that carry no error code.
pub trait KeyRequest {
    /// URL of the requested resource, if the event carries one.
    fn resource_url(&self) -> Option<&Url>;

    /// Ask the framework to produce an application-specific key-request
    /// blob bound to `certificate` and `content_identifier`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the framework rejects the
    /// combination (unsupported options, invalid identifier).
    fn key_request_blob(
        &self,
        certificate: &[u8],
        content_identifier: &[u8],
        options: &KeyRequestOptions,
    ) -> Result<Bytes, GenerationError>;

    /// Resolve the event with the decrypted key payload.
    fn fulfill(&mut self, key_data: Bytes);

    /// Resolve the event with a failure, or inertly when `failure` is
    /// `None`.
    fn reject(&mut self, failure: Option<FailureCode>);
}
