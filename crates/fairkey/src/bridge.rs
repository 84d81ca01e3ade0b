#![forbid(unsafe_code)]

//! Key-request interception and the license exchange it drives.

use bytes::Bytes;
use fairkey_net::{Headers, HttpClient, Net};
use tokio::runtime::{Handle, Runtime};
use tracing::{debug, warn};

use crate::{
    certificate::CertificateProvider,
    config::DrmConfig,
    exchange::{post_license_request, wait_for},
    request::{FailureCode, KeyRequest, KeyRequestOptions},
    spc,
};

/// URI scheme reserved for key-request resources.
///
/// Events whose resource URL uses any other scheme are declined untouched.
pub const KEY_REQUEST_SCHEME: &str = "skd";

enum RuntimeHolder {
    Owned(Runtime),
    Shared(Handle),
}

impl RuntimeHolder {
    fn handle(&self) -> &Handle {
        match self {
            Self::Owned(rt) => rt.handle(),
            Self::Shared(handle) => handle,
        }
    }
}

/// Synchronous bridge between the media framework's key-request callback
/// and the license server.
///
/// The framework invokes [`handle_key_request`](Self::handle_key_request)
/// on a thread it owns and blocks that thread until the call returns; the
/// bridge honors the contract by resolving the event before returning on
/// every accepted branch. Network work runs on the bridge's Tokio runtime
/// and is joined with a bounded single-slot wait.
///
/// Concurrent events are safe: the bridge holds only read-only state, so
/// one instance may serve several framework threads at once.
///
/// # Example
///
/// ```ignore
/// let bridge = LicenseBridge::new(config)?;
///
/// // From the framework's resource-loading callback:
/// if !bridge.handle_key_request(&mut request) {
///     // not a key request; let the framework route it elsewhere
/// }
/// ```
pub struct LicenseBridge<N = HttpClient> {
    config: DrmConfig,
    net: N,
    runtime: RuntimeHolder,
}

impl LicenseBridge<HttpClient> {
    /// Create a bridge with its own single-worker runtime.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from runtime construction.
    pub fn new(config: DrmConfig) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("fairkey-license")
            .enable_all()
            .build()?;
        let net = HttpClient::new(config.net.clone());
        Ok(Self {
            config,
            net,
            runtime: RuntimeHolder::Owned(runtime),
        })
    }

    /// Create a bridge that spawns onto an existing runtime.
    ///
    /// The framework threads calling into the bridge must not be worker
    /// threads of that runtime, or the bounded wait would starve itself.
    #[must_use]
    pub fn with_handle(config: DrmConfig, handle: Handle) -> Self {
        let net = HttpClient::new(config.net.clone());
        Self {
            config,
            net,
            runtime: RuntimeHolder::Shared(handle),
        }
    }
}

impl<N: Net + Clone + Send + Sync + 'static> LicenseBridge<N> {
    /// Create a bridge over a custom transport, with its own runtime.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from runtime construction.
    pub fn with_net(config: DrmConfig, net: N) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("fairkey-license")
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            net,
            runtime: RuntimeHolder::Owned(runtime),
        })
    }

    /// Handle one key-request event.
    ///
    /// Returns `false` without touching the event when its resource URL is
    /// absent or does not use the [`KEY_REQUEST_SCHEME`]; the framework
    /// keeps ownership and may delegate elsewhere. Otherwise takes
    /// ownership, resolves the event exactly once (success or failure),
    /// and returns `true`.
    ///
    /// Blocks the calling thread for up to the configured exchange bound
    /// per network step.
    pub fn handle_key_request(&self, event: &mut dyn KeyRequest) -> bool {
        let url = match event.resource_url() {
            Some(url) if url.scheme() == KEY_REQUEST_SCHEME => url.clone(),
            _ => return false,
        };
        debug!(%url, "handling key request");

        let Some(certificate) = self.resolve_certificate() else {
            event.reject(Some(FailureCode::ClientCertificateRejected));
            return true;
        };

        // The content identifier is the full resource URL as UTF-8 bytes.
        let content_identifier = url.as_str().as_bytes();

        let blob = match event.key_request_blob(
            &certificate,
            content_identifier,
            &KeyRequestOptions::default(),
        ) {
            Ok(blob) => blob,
            Err(err) => {
                debug!(%url, error = %err, "framework declined to generate a key request");
                event.reject(None);
                return true;
            }
        };

        let payload = spc::spc_body(&blob);
        match self.exchange(payload) {
            Some(response) if !response.is_empty() => {
                match spc::decode_key_response(&response) {
                    Ok(key_data) => {
                        debug!(%url, bytes = key_data.len(), "key request fulfilled");
                        event.fulfill(key_data);
                    }
                    Err(err) => {
                        warn!(%url, error = %err, "license response is not valid base64");
                        event.reject(Some(FailureCode::BadServerResponse));
                    }
                }
            }
            _ => {
                warn!(%url, "license server returned no usable response");
                event.reject(Some(FailureCode::BadServerResponse));
            }
        }
        true
    }

    /// Handle a renewal event.
    ///
    /// Renewal is not a distinct workflow; it forwards to
    /// [`handle_key_request`](Self::handle_key_request).
    pub fn handle_renewal(&self, event: &mut dyn KeyRequest) -> bool {
        self.handle_key_request(event)
    }

    fn resolve_certificate(&self) -> Option<Bytes> {
        let provider = CertificateProvider::new(
            self.net.clone(),
            self.config.certificate_url.clone(),
        );
        let fetched = wait_for(
            self.runtime.handle(),
            self.config.exchange_timeout,
            async move { provider.fetch().await },
        );
        match fetched {
            Some(Ok(cert)) => Some(cert),
            Some(Err(err)) => {
                warn!(error = %err, "certificate unavailable");
                None
            }
            None => {
                warn!("certificate fetch timed out");
                None
            }
        }
    }

    fn exchange(&self, payload: Bytes) -> Option<Bytes> {
        let url = self.config.effective_license_url();
        let headers = (!self.config.license_headers.is_empty())
            .then(|| Headers::from(self.config.license_headers.clone()));
        let net = self.net.clone();
        wait_for(
            self.runtime.handle(),
            self.config.exchange_timeout,
            async move { post_license_request(&net, url, headers, payload).await },
        )
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use fairkey_net::{NetError, NetResult};
    use fairkey_test_utils::{RecordingKeyRequest, Resolution};
    use url::Url;

    use super::*;

    /// In-memory transport: serves the certificate on GET and a canned
    /// license response on POST.
    #[derive(Clone)]
    struct StubNet {
        certificate: NetResult<Bytes>,
        license: NetResult<Bytes>,
    }

    impl StubNet {
        fn new(certificate: &[u8], license: NetResult<Bytes>) -> Self {
            Self {
                certificate: Ok(Bytes::copy_from_slice(certificate)),
                license,
            }
        }

        fn broken_certificate() -> Self {
            Self {
                certificate: Err(NetError::http("connection refused")),
                license: Ok(Bytes::new()),
            }
        }
    }

    #[async_trait]
    impl Net for StubNet {
        async fn get_bytes(&self, _url: Url, _headers: Option<Headers>) -> NetResult<Bytes> {
            self.certificate.clone()
        }

        async fn post_bytes(
            &self,
            _url: Url,
            _headers: Option<Headers>,
            _body: Bytes,
        ) -> NetResult<Bytes> {
            self.license.clone()
        }
    }

    fn config() -> DrmConfig {
        DrmConfig::new(Url::parse("https://cdn.example.com/app.cer").unwrap())
            .with_license_url(Url::parse("https://license.example.com/ckc").unwrap())
    }

    fn bridge(net: StubNet) -> LicenseBridge<StubNet> {
        LicenseBridge::with_net(config(), net).unwrap()
    }

    #[test]
    fn non_skd_scheme_is_declined_untouched() {
        let net = StubNet::new(b"CERT", Ok(Bytes::new()));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("https://cdn.example.com/seg1.ts");

        assert!(!bridge.handle_key_request(&mut event));
        assert!(event.resolution().is_none());
        assert_eq!(event.generation_calls(), 0);
    }

    #[test]
    fn event_without_url_is_declined() {
        let net = StubNet::new(b"CERT", Ok(Bytes::new()));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::without_url();

        assert!(!bridge.handle_key_request(&mut event));
        assert!(event.resolution().is_none());
    }

    #[test]
    fn happy_path_fulfills_with_decoded_key() {
        let key = b"the content key";
        let net = StubNet::new(b"CERT", Ok(Bytes::from(STANDARD.encode(key))));
        let bridge = bridge(net);
        let mut event =
            RecordingKeyRequest::new("skd://asset-1").with_blob(Bytes::from_static(&[1, 2]));

        assert!(bridge.handle_key_request(&mut event));
        match event.resolution() {
            Some(Resolution::Fulfilled(data)) => assert_eq!(data.as_ref(), key),
            other => panic!("expected fulfillment, got {other:?}"),
        }
        // The generator saw the certificate and the full URL as identifier.
        let (cert, content_id, options) = event.generated_with().unwrap();
        assert_eq!(cert.as_ref(), b"CERT");
        assert_eq!(content_id.as_ref(), b"skd://asset-1");
        assert!(!options.persistent);
    }

    #[test]
    fn unreadable_certificate_rejects_as_client_rejected() {
        let bridge = bridge(StubNet::broken_certificate());
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_key_request(&mut event));
        assert_eq!(
            event.resolution(),
            Some(&Resolution::Rejected(Some(
                FailureCode::ClientCertificateRejected
            )))
        );
        // The generator is never consulted without a certificate.
        assert_eq!(event.generation_calls(), 0);
    }

    #[test]
    fn generation_refusal_resolves_inertly() {
        let net = StubNet::new(b"CERT", Ok(Bytes::new()));
        let bridge = bridge(net);
        let mut event =
            RecordingKeyRequest::new("skd://asset-1").with_generation_error("no persistence");

        assert!(bridge.handle_key_request(&mut event));
        assert_eq!(event.resolution(), Some(&Resolution::Rejected(None)));
    }

    #[test]
    fn server_error_rejects_with_bad_server_response() {
        let net = StubNet::new(b"CERT", Err(NetError::Timeout));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_key_request(&mut event));
        assert_eq!(
            event.resolution(),
            Some(&Resolution::Rejected(Some(FailureCode::BadServerResponse)))
        );
    }

    #[test]
    fn empty_body_rejects_with_bad_server_response() {
        let net = StubNet::new(b"CERT", Ok(Bytes::new()));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_key_request(&mut event));
        assert_eq!(
            event.resolution(),
            Some(&Resolution::Rejected(Some(FailureCode::BadServerResponse)))
        );
    }

    #[test]
    fn non_base64_body_rejects_with_bad_server_response() {
        let net = StubNet::new(b"CERT", Ok(Bytes::from_static(b"<html>oops</html>")));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_key_request(&mut event));
        assert_eq!(
            event.resolution(),
            Some(&Resolution::Rejected(Some(FailureCode::BadServerResponse)))
        );
    }

    #[test]
    fn renewal_delegates_to_key_request_handling() {
        let key = b"renewed key";
        let net = StubNet::new(b"CERT", Ok(Bytes::from(STANDARD.encode(key))));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_renewal(&mut event));
        match event.resolution() {
            Some(Resolution::Fulfilled(data)) => assert_eq!(data.as_ref(), key),
            other => panic!("expected fulfillment, got {other:?}"),
        }
    }

    #[test]
    fn base64_armored_certificate_reaches_generator_decoded() {
        let der = [0x30u8, 0x82, 0x00, 0x01];
        let net = StubNet::new(STANDARD.encode(der).as_bytes(), Ok(Bytes::new()));
        let bridge = bridge(net);
        let mut event = RecordingKeyRequest::new("skd://asset-1");

        assert!(bridge.handle_key_request(&mut event));
        let (cert, _, _) = event.generated_with().unwrap();
        assert_eq!(cert.as_ref(), der);
    }
}
