use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::{
    error::NetError,
    types::Headers,
};

/// Byte-oriented HTTP transport.
///
/// Implemented by [`HttpClient`](crate::HttpClient); test code substitutes
/// in-memory fakes at this seam.
#[async_trait]
pub trait Net: Send + Sync {
    /// GET the full response body.
    async fn get_bytes(&self, url: Url, headers: Option<Headers>) -> Result<Bytes, NetError>;

    /// POST `body` and return the full response body.
    async fn post_bytes(
        &self,
        url: Url,
        headers: Option<Headers>,
        body: Bytes,
    ) -> Result<Bytes, NetError>;
}
