#![forbid(unsafe_code)]

//! Configuration for [`LicenseBridge`](crate::LicenseBridge).

use std::{collections::HashMap, time::Duration};

use fairkey_net::NetOptions;
use url::Url;

/// License server used when [`DrmConfig::license_url`] is not set.
pub const DEFAULT_LICENSE_SERVER: &str =
    "https://drm-license.doverunner.com/ri/licenseManager.do";

/// Upper bound on one license-server exchange.
///
/// The media framework blocks a decode thread while a key request is in
/// flight, so the exchange must resolve within this bound.
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-playback-session DRM configuration.
///
/// Created once at session setup and owned by the bridge; never mutated
/// while requests are in flight.
///
/// # Example
///
/// ```ignore
/// use fairkey::DrmConfig;
/// use url::Url;
///
/// let config = DrmConfig::new(Url::parse("https://cdn.example.com/fairplay.cer")?)
///     .with_license_url(Url::parse("https://license.example.com/ckc")?)
///     .with_license_header("X-License-Token", token);
/// ```
#[derive(Clone, Debug)]
pub struct DrmConfig {
    /// Where the application certificate lives (`file://` or HTTP(S)).
    pub certificate_url: Url,
    /// License server endpoint. Falls back to [`DEFAULT_LICENSE_SERVER`].
    pub license_url: Option<Url>,
    /// Extra headers attached to every license request.
    pub license_headers: HashMap<String, String>,
    /// Network configuration (timeouts, pooling).
    pub net: NetOptions,
    /// Bound on one blocking exchange. Defaults to [`EXCHANGE_TIMEOUT`].
    pub exchange_timeout: Duration,
}

impl DrmConfig {
    /// Create a config with the given certificate location.
    pub fn new(certificate_url: Url) -> Self {
        Self {
            certificate_url,
            license_url: None,
            license_headers: HashMap::new(),
            net: NetOptions::default(),
            exchange_timeout: EXCHANGE_TIMEOUT,
        }
    }

    /// Set the license server endpoint.
    pub fn with_license_url(mut self, url: Url) -> Self {
        self.license_url = Some(url);
        self
    }

    /// Replace the extra license-request headers.
    pub fn with_license_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.license_headers = headers;
        self
    }

    /// Add one extra license-request header.
    pub fn with_license_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.license_headers.insert(name.into(), value.into());
        self
    }

    /// Set network options.
    pub fn with_net(mut self, net: NetOptions) -> Self {
        self.net = net;
        self
    }

    /// Set the exchange bound.
    pub fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// The license endpoint requests are sent to.
    ///
    /// # Panics
    ///
    /// Panics if the built-in default endpoint fails to parse, which is a
    /// compile-time constant and cannot happen for a released build.
    #[must_use]
    pub fn effective_license_url(&self) -> Url {
        self.license_url.clone().unwrap_or_else(|| {
            Url::parse(DEFAULT_LICENSE_SERVER).expect("valid default license URL")
        })
    }
}
