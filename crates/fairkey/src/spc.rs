#![forbid(unsafe_code)]

//! Wire codec for the license exchange.
//!
//! The server speaks a form-encoded dialect: the request body is the ASCII
//! prefix `spc=` followed by the base64 of the key-request blob, and the
//! response body is base64 text wrapping the content-key payload.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;

/// Build the license-request body for a key-request blob.
#[must_use]
pub fn spc_body(blob: &[u8]) -> Bytes {
    let mut body = String::with_capacity(4 + blob.len().div_ceil(3) * 4);
    body.push_str("spc=");
    STANDARD.encode_string(blob, &mut body);
    Bytes::from(body)
}

/// Decode the base64 content-key payload returned by the license server.
///
/// # Errors
///
/// Returns the underlying decode error when `response` is not valid
/// standard base64.
pub fn decode_key_response(response: &[u8]) -> Result<Bytes, base64::DecodeError> {
    STANDARD.decode(response).map(Bytes::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_prefix_plus_base64() {
        assert_eq!(spc_body(&[0x01, 0x02]).as_ref(), b"spc=AQI=");
    }

    #[test]
    fn empty_blob_still_has_prefix() {
        assert_eq!(spc_body(&[]).as_ref(), b"spc=");
    }

    #[test]
    fn body_is_deterministic() {
        let blob: Vec<u8> = (0..=255).collect();
        assert_eq!(spc_body(&blob), spc_body(&blob));
    }

    #[test]
    fn response_roundtrip() {
        let payload = b"content key and lease";
        let encoded = STANDARD.encode(payload);
        let decoded = decode_key_response(encoded.as_bytes()).unwrap();
        assert_eq!(decoded.as_ref(), payload);
    }

    #[test]
    fn non_base64_response_is_rejected() {
        assert!(decode_key_response(b"not base64!!").is_err());
    }

    #[test]
    fn empty_response_decodes_to_empty() {
        assert_eq!(decode_key_response(b"").unwrap().len(), 0);
    }
}
