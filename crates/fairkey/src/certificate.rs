#![forbid(unsafe_code)]

//! Application certificate loading.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use fairkey_net::{Net, NetError};
use thiserror::Error;
use tracing::trace;
use url::Url;

/// Certificate loading errors.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("certificate read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("certificate fetch failed: {0}")]
    Net(#[from] NetError),

    #[error("certificate URL has unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("certificate URL is not a valid file location: {0}")]
    InvalidFileUrl(Url),
}

pub type CertResult<T> = Result<T, CertificateError>;

/// Loads the application DRM certificate from its configured location.
///
/// Certificates are distributed either as base64-armored text or as raw
/// DER bytes; [`fetch`](CertificateProvider::fetch) transparently supports
/// both. The certificate is re-read per request and never cached.
pub struct CertificateProvider<N> {
    net: N,
    url: Url,
}

impl<N: Net> CertificateProvider<N> {
    pub fn new(net: N, url: Url) -> Self {
        Self { net, url }
    }

    /// Read and normalize the certificate bytes.
    ///
    /// # Errors
    ///
    /// Any read or transport error is fatal for the current request; the
    /// caller maps it to a client-rejection failure.
    pub async fn fetch(&self) -> CertResult<Bytes> {
        let raw = match self.url.scheme() {
            "file" => {
                let path = self
                    .url
                    .to_file_path()
                    .map_err(|()| CertificateError::InvalidFileUrl(self.url.clone()))?;
                Bytes::from(tokio::fs::read(path).await?)
            }
            "http" | "https" => self.net.get_bytes(self.url.clone(), None).await?,
            other => return Err(CertificateError::UnsupportedScheme(other.to_string())),
        };
        Ok(normalize(raw))
    }
}

/// Decode base64-armored certificate text, passing raw DER through.
///
/// A decode that succeeds but yields nothing falls back to the raw bytes.
fn normalize(raw: Bytes) -> Bytes {
    match STANDARD.decode(&raw) {
        Ok(decoded) if !decoded.is_empty() => {
            trace!(
                armored = raw.len(),
                decoded = decoded.len(),
                "certificate was base64-armored"
            );
            Bytes::from(decoded)
        }
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_text_is_decoded() {
        let der = [0x30, 0x82, 0x01, 0x0A, 0xFF];
        let armored = STANDARD.encode(der);
        assert_eq!(normalize(Bytes::from(armored)).as_ref(), der);
    }

    #[test]
    fn raw_der_passes_through() {
        // 0xFF is not a base64 alphabet byte.
        let der = Bytes::from_static(&[0x30, 0x82, 0xFF, 0x00]);
        assert_eq!(normalize(der.clone()), der);
    }

    #[test]
    fn empty_decode_falls_back_to_raw() {
        // Valid base64 that decodes to nothing.
        let raw = Bytes::from_static(b"");
        assert_eq!(normalize(raw.clone()), raw);
    }

    #[test]
    fn armored_with_trailing_newline_is_left_raw() {
        // Strict decoding: a trailing newline makes the input non-base64,
        // so the bytes are passed through untouched.
        let mut armored = STANDARD.encode([1u8, 2, 3]);
        armored.push('\n');
        let raw = Bytes::from(armored);
        assert_eq!(normalize(raw.clone()), raw);
    }
}
