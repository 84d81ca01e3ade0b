use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::trace;
use url::Url;

use crate::{
    error::{NetError, NetResult},
    traits::Net,
    types::{Headers, NetOptions},
};

/// Concrete HTTP transport over `reqwest`.
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    options: NetOptions,
}

impl HttpClient {
    /// # Panics
    ///
    /// Panics if the `reqwest::Client` builder fails to build.
    #[must_use]
    pub fn new(options: NetOptions) -> Self {
        let inner = Client::builder()
            .pool_max_idle_per_host(options.pool_max_idle_per_host)
            .build()
            .expect("failed to build reqwest client");
        Self { inner, options }
    }

    fn apply_headers(
        mut req: reqwest::RequestBuilder,
        headers: Option<Headers>,
    ) -> reqwest::RequestBuilder {
        if let Some(headers) = headers {
            for (k, v) in headers.iter() {
                req = req.header(k, v);
            }
        }
        req
    }

    async fn check_status(url: &Url, resp: reqwest::Response) -> NetResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.ok().filter(|b| !b.is_empty());
        Err(NetError::status(status.as_u16(), url.to_string(), body))
    }

    /// # Errors
    ///
    /// Returns [`NetError`] on HTTP failure, non-2xx status, or timeout.
    pub async fn get_bytes(&self, url: Url, headers: Option<Headers>) -> NetResult<Bytes> {
        <Self as Net>::get_bytes(self, url, headers).await
    }

    /// # Errors
    ///
    /// Returns [`NetError`] on HTTP failure, non-2xx status, or timeout.
    pub async fn post_bytes(
        &self,
        url: Url,
        headers: Option<Headers>,
        body: Bytes,
    ) -> NetResult<Bytes> {
        <Self as Net>::post_bytes(self, url, headers, body).await
    }
}

#[async_trait]
impl Net for HttpClient {
    async fn get_bytes(&self, url: Url, headers: Option<Headers>) -> Result<Bytes, NetError> {
        trace!(%url, "GET");
        let req = self.inner.get(url.clone());
        let req = Self::apply_headers(req, headers);
        let req = req.timeout(self.options.request_timeout);

        let resp = req.send().await.map_err(NetError::from)?;
        let resp = Self::check_status(&url, resp).await?;
        resp.bytes().await.map_err(NetError::from)
    }

    async fn post_bytes(
        &self,
        url: Url,
        headers: Option<Headers>,
        body: Bytes,
    ) -> Result<Bytes, NetError> {
        trace!(%url, bytes = body.len(), "POST");
        let req = self.inner.post(url.clone()).body(body);
        let req = Self::apply_headers(req, headers);
        let req = req.timeout(self.options.request_timeout);

        let resp = req.send().await.map_err(NetError::from)?;
        let resp = Self::check_status(&url, resp).await?;
        resp.bytes().await.map_err(NetError::from)
    }
}
