#![forbid(unsafe_code)]

//! Blocking bridge between the framework's synchronous callback and the
//! async network layer.

use std::{sync::mpsc, time::Duration};

use bytes::Bytes;
use fairkey_net::{Headers, Net};
use tokio::runtime::Handle;
use tracing::{trace, warn};
use url::Url;

/// Run `fut` on `handle` and block the calling thread until it completes
/// or `timeout` elapses.
///
/// The single-slot channel is the synchronization point: the spawned task
/// is the one producer, the calling thread the one consumer. On timeout
/// the receiver is dropped and a late result is discarded by the failed
/// send.
///
/// Must not be called from one of the runtime's own worker threads.
pub(crate) fn wait_for<T, F>(handle: &Handle, timeout: Duration, fut: F) -> Option<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    handle.spawn(async move {
        let value = fut.await;
        // Receiver is gone once the wait times out.
        let _ = tx.send(value);
    });
    rx.recv_timeout(timeout).ok()
}

/// POST the license-request payload, collapsing every failure to `None`.
///
/// Transport errors, non-2xx statuses, and timeouts are indistinguishable
/// to the caller: the contract with the bridge is "response or absent".
pub(crate) async fn post_license_request<N: Net>(
    net: &N,
    url: Url,
    headers: Option<Headers>,
    payload: Bytes,
) -> Option<Bytes> {
    trace!(%url, bytes = payload.len(), "sending license request");
    match net.post_bytes(url.clone(), headers, payload).await {
        Ok(response) => {
            trace!(%url, bytes = response.len(), "license server responded");
            Some(response)
        }
        Err(err) => {
            warn!(%url, error = %err, "license server exchange failed");
            None
        }
    }
}
