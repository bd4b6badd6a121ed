use std::error::Error as StdError;
use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::error::FetchError;
use crate::fetch::FetchConfig;

/// Opens a connection to a tile URL.
///
/// Implementations apply every setting of the [`FetchConfig`] (timeouts,
/// identity headers, redirect policy) before requesting any data, and must
/// be safe to share between concurrent fetches.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue the request and return once the response head is available.
    async fn open(
        &self,
        url: &Url,
        config: &FetchConfig,
    ) -> Result<Box<dyn TransportResponse>, FetchError>;
}

/// A response whose head has been received.
///
/// Dropping the response releases the underlying connection or file,
/// whether or not the body was consumed.
#[async_trait]
pub trait TransportResponse: Send {
    /// Status code, or `None` for transports without one (local files).
    fn status(&self) -> Option<u16>;

    /// Raw `Content-Encoding` value, if any.
    fn content_encoding(&self) -> Option<&str>;

    /// When the content stops being fresh, if the transport knows.
    fn expiration(&self) -> Option<SystemTime>;

    /// Read the whole body.
    ///
    /// A body cut short by the peer is reported as
    /// [`FetchError::Truncated`]; timeouts as [`FetchError::Timeout`].
    async fn into_body(self: Box<Self>) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn open(
        &self,
        url: &Url,
        config: &FetchConfig,
    ) -> Result<Box<dyn TransportResponse>, FetchError> {
        (**self).open(url, config).await
    }
}

/// Flatten an error and its sources into one diagnostic line.
///
/// Client libraries tend to put the useful detail ("connection refused",
/// "operation timed out") in the source chain rather than the top-level
/// message.
pub(crate) fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
