use std::time::SystemTime;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use super::response::{Transport, TransportResponse};
use crate::error::FetchError;
use crate::fetch::FetchConfig;

/// Transport for `file://` URLs, mainly for offline tile sets and tests.
///
/// Local files have no status code, encoding or expiration. The read is
/// bounded by the read timeout so a stalled network mount cannot hang a
/// fetch.
#[derive(Debug, Clone, Default)]
pub struct FileTransport;

impl FileTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn open(
        &self,
        url: &Url,
        config: &FetchConfig,
    ) -> Result<Box<dyn TransportResponse>, FetchError> {
        let path = url.to_file_path().map_err(|_| FetchError::Io {
            url: url.to_string(),
            message: "URL is not a local file path".to_string(),
        })?;

        let data = match tokio::time::timeout(config.read_timeout, tokio::fs::read(&path)).await {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                return Err(FetchError::Io {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
            Err(_) => {
                return Err(FetchError::Timeout {
                    url: url.to_string(),
                    message: format!("file read exceeded {:?}", config.read_timeout),
                })
            }
        };

        Ok(Box::new(FileResponse {
            data: Bytes::from(data),
        }))
    }
}

struct FileResponse {
    data: Bytes,
}

#[async_trait]
impl TransportResponse for FileResponse {
    fn status(&self) -> Option<u16> {
        None
    }

    fn content_encoding(&self) -> Option<&str> {
        None
    }

    fn expiration(&self) -> Option<SystemTime> {
        None
    }

    async fn into_body(self: Box<Self>) -> Result<Bytes, FetchError> {
        Ok(self.data)
    }
}
