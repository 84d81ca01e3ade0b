//! Recording fake for the framework's key-request event.

use std::cell::{Cell, RefCell};

use bytes::Bytes;
use fairkey::{FailureCode, GenerationError, KeyRequest, KeyRequestOptions};
use url::Url;

/// Terminal state of a [`RecordingKeyRequest`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// `fulfill` was called with this key payload.
    Fulfilled(Bytes),
    /// `reject` was called; `None` is the inert completion.
    Rejected(Option<FailureCode>),
}

/// [`KeyRequest`] fake that records how the bridge resolved it.
///
/// Panics on double resolution, turning the exactly-once contract into a
/// test assertion.
pub struct RecordingKeyRequest {
    url: Option<Url>,
    blob: Result<Bytes, String>,
    generation_calls: Cell<usize>,
    generated_with: RefCell<Option<(Bytes, Bytes, KeyRequestOptions)>>,
    resolution: Option<Resolution>,
}

impl RecordingKeyRequest {
    /// Event for the given resource URL, with a small default blob.
    pub fn new(url: &str) -> Self {
        Self {
            url: Some(Url::parse(url).expect("parse resource URL")),
            blob: Ok(Bytes::from_static(&[0x01, 0x02, 0x03, 0x04])),
            generation_calls: Cell::new(0),
            generated_with: RefCell::new(None),
            resolution: None,
        }
    }

    /// Event that carries no resource URL at all.
    #[must_use]
    pub fn without_url() -> Self {
        Self {
            url: None,
            blob: Ok(Bytes::new()),
            generation_calls: Cell::new(0),
            generated_with: RefCell::new(None),
            resolution: None,
        }
    }

    /// Set the blob the generator will return.
    #[must_use]
    pub fn with_blob(mut self, blob: Bytes) -> Self {
        self.blob = Ok(blob);
        self
    }

    /// Make the generator refuse with the given message.
    #[must_use]
    pub fn with_generation_error(mut self, message: &str) -> Self {
        self.blob = Err(message.to_string());
        self
    }

    /// How the bridge resolved this event, if it did.
    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    /// Number of times the generator was consulted.
    #[must_use]
    pub fn generation_calls(&self) -> usize {
        self.generation_calls.get()
    }

    /// Arguments the generator was last called with.
    #[must_use]
    pub fn generated_with(&self) -> Option<(Bytes, Bytes, KeyRequestOptions)> {
        self.generated_with.borrow().clone()
    }

    fn resolve(&mut self, resolution: Resolution) {
        assert!(
            self.resolution.is_none(),
            "key request resolved twice: {:?} then {resolution:?}",
            self.resolution
        );
        self.resolution = Some(resolution);
    }
}

impl KeyRequest for RecordingKeyRequest {
    fn resource_url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    fn key_request_blob(
        &self,
        certificate: &[u8],
        content_identifier: &[u8],
        options: &KeyRequestOptions,
    ) -> Result<Bytes, GenerationError> {
        self.generation_calls.set(self.generation_calls.get() + 1);
        *self.generated_with.borrow_mut() = Some((
            Bytes::copy_from_slice(certificate),
            Bytes::copy_from_slice(content_identifier),
            *options,
        ));
        self.blob.clone().map_err(GenerationError)
    }

    fn fulfill(&mut self, key_data: Bytes) {
        self.resolve(Resolution::Fulfilled(key_data));
    }

    fn reject(&mut self, failure: Option<FailureCode>) {
        self.resolve(Resolution::Rejected(failure));
    }
}
