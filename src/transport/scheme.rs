use async_trait::async_trait;
use url::Url;

use super::file::FileTransport;
use super::http::HttpTransport;
use super::response::{Transport, TransportResponse};
use crate::error::FetchError;
use crate::fetch::FetchConfig;

/// Routes a URL to the transport for its scheme.
///
/// `http` and `https` go to the [`HttpTransport`], `file` to the
/// [`FileTransport`]; any other scheme fails without touching the network.
#[derive(Default)]
pub struct SchemeTransport {
    http: HttpTransport,
    file: FileTransport,
}

impl SchemeTransport {
    pub fn new(http: HttpTransport, file: FileTransport) -> Self {
        Self { http, file }
    }

    pub fn http(&self) -> &HttpTransport {
        &self.http
    }
}

#[async_trait]
impl Transport for SchemeTransport {
    async fn open(
        &self,
        url: &Url,
        config: &FetchConfig,
    ) -> Result<Box<dyn TransportResponse>, FetchError> {
        match url.scheme() {
            "http" | "https" => self.http.open(url, config).await,
            "file" => self.file.open(url, config).await,
            other => Err(FetchError::UnsupportedScheme {
                scheme: other.to_string(),
                url: url.to_string(),
            }),
        }
    }
}
