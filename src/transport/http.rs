use std::error::Error as StdError;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{CONTENT_ENCODING, REFERER, USER_AGENT};
use reqwest::redirect::Policy;
use tracing::debug;
use url::Url;

use super::expiration::expiration_from_headers;
use super::response::{error_chain, Transport, TransportResponse};
use crate::error::FetchError;
use crate::fetch::{FetchConfig, MAX_REDIRECTS};

/// HTTP(S) transport backed by reqwest.
///
/// Timeouts and redirect policy live on the reqwest client, so the transport
/// keeps the client built for the most recent settings and rebuilds it when a
/// fetch arrives with different ones. Identity headers are set per request.
///
/// reqwest's own decompression is compiled out: the `Content-Encoding`
/// header and the raw body reach the fetch pipeline untouched.
pub struct HttpTransport {
    use_system_proxy: bool,
    client: Mutex<Option<CachedClient>>,
}

struct CachedClient {
    key: ClientKey,
    client: reqwest::Client,
}

/// Client-level settings taken from a [`FetchConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClientKey {
    connect_timeout: Duration,
    read_timeout: Duration,
    follow_redirects: bool,
}

impl From<&FetchConfig> for ClientKey {
    fn from(config: &FetchConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            read_timeout: config.read_timeout,
            follow_redirects: config.follow_redirects,
        }
    }
}

impl HttpTransport {
    /// Create a transport that honours the system proxy settings.
    pub fn new() -> Self {
        Self {
            use_system_proxy: true,
            client: Mutex::new(None),
        }
    }

    /// Create a transport that always connects directly, ignoring
    /// `HTTP_PROXY` and friends.
    pub fn direct() -> Self {
        Self {
            use_system_proxy: false,
            client: Mutex::new(None),
        }
    }

    fn client_for(&self, config: &FetchConfig) -> Result<reqwest::Client, FetchError> {
        let key = ClientKey::from(config);
        let mut cached = self.client.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cached.as_ref().filter(|entry| entry.key == key) {
            return Ok(entry.client.clone());
        }

        debug!(
            connect_timeout_ms = key.connect_timeout.as_millis() as u64,
            read_timeout_ms = key.read_timeout.as_millis() as u64,
            follow_redirects = key.follow_redirects,
            "Building HTTP client"
        );
        let client = self.build_client(&key)?;
        *cached = Some(CachedClient {
            key,
            client: client.clone(),
        });
        Ok(client)
    }

    fn build_client(&self, key: &ClientKey) -> Result<reqwest::Client, FetchError> {
        let redirect = if key.follow_redirects {
            Policy::limited(MAX_REDIRECTS)
        } else {
            Policy::none()
        };

        let mut builder = reqwest::Client::builder()
            .connect_timeout(key.connect_timeout)
            .read_timeout(key.read_timeout)
            .redirect(redirect);

        if !self.use_system_proxy {
            builder = builder.no_proxy();
        }

        builder
            .build()
            .map_err(|e| FetchError::InvalidConfig(format!("failed to create HTTP client: {}", e)))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn open(
        &self,
        url: &Url,
        config: &FetchConfig,
    ) -> Result<Box<dyn TransportResponse>, FetchError> {
        let client = self.client_for(config)?;

        let mut request = client.get(url.clone());
        if let Some(user_agent) = config.user_agent_header() {
            request = request.header(USER_AGENT, user_agent);
        }
        if let Some(referer) = config.referer_header() {
            request = request.header(REFERER, referer);
        }

        let deadline = head_deadline(config);
        let response = match tokio::time::timeout(deadline, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(request_error(url, &e)),
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    message: format!("no response within {:?}", deadline),
                })
            }
        };

        Ok(Box::new(HttpResponse::new(url, response)))
    }
}

/// reqwest bounds connect and each read; this caps the wait for the response
/// head as a whole. Saturates for huge timeouts.
fn head_deadline(config: &FetchConfig) -> Duration {
    config.connect_timeout.saturating_add(config.read_timeout)
}

// =============================================================================
// Response
// =============================================================================

struct HttpResponse {
    url: String,
    status: u16,
    content_encoding: Option<String>,
    expiration: Option<SystemTime>,
    response: reqwest::Response,
}

impl HttpResponse {
    fn new(url: &Url, response: reqwest::Response) -> Self {
        let headers = response.headers();
        let content_encoding = headers
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let expiration = expiration_from_headers(headers, SystemTime::now());

        Self {
            url: url.to_string(),
            status: response.status().as_u16(),
            content_encoding,
            expiration,
            response,
        }
    }
}

#[async_trait]
impl TransportResponse for HttpResponse {
    fn status(&self) -> Option<u16> {
        Some(self.status)
    }

    fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    fn expiration(&self) -> Option<SystemTime> {
        self.expiration
    }

    async fn into_body(self: Box<Self>) -> Result<Bytes, FetchError> {
        let url = self.url;
        self.response.bytes().await.map_err(|e| body_error(&url, &e))
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

fn request_error(url: &Url, err: &reqwest::Error) -> FetchError {
    let url = url.to_string();
    let message = error_chain(err);

    if is_timeout(err) {
        FetchError::Timeout { url, message }
    } else {
        FetchError::Connection { url, message }
    }
}

fn body_error(url: &str, err: &reqwest::Error) -> FetchError {
    let url = url.to_string();
    let message = error_chain(err);

    if is_timeout(err) {
        FetchError::Timeout { url, message }
    } else {
        // Peer closed or reset the connection mid-body
        FetchError::Truncated { url, message }
    }
}

/// reqwest flags its own timers; socket-level timeouts only show up as an
/// `io::ErrorKind::TimedOut` somewhere in the source chain.
fn is_timeout(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        source = inner.source();
    }
    false
}
