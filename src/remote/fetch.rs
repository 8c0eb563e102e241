//! HTTP image download.

use super::{FetchedImage, ImageFetcher};
use crate::constants::MAX_IMAGE_BYTES;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

/// Fetches images over HTTP(S).
///
/// Bodies larger than the submission image limit are rejected, either up
/// front from `Content-Length` or as soon as the streamed body passes it.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpImageFetcher {
    /// Create a fetcher using the given client.
    pub const fn new(client: Client) -> Self {
        Self {
            client,
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    /// Override the body size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let request_failed = |e: reqwest::Error| Error::RequestFailed {
            url: url.to_string(),
            source: Box::new(e),
        };

        let mut response = self.client.get(url).send().await.map_err(request_failed)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let max = u64::try_from(self.max_bytes).unwrap_or(u64::MAX);
        if let Some(length) = response.content_length()
            && length > max
        {
            return Err(Error::ImageTooLarge {
                size: usize::try_from(length).unwrap_or(usize::MAX),
                max: self.max_bytes,
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(request_failed)? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(Error::ImageTooLarge {
                    size: bytes.len() + chunk.len(),
                    max: self.max_bytes,
                });
            }
            bytes.extend_from_slice(&chunk);
        }

        if bytes.is_empty() {
            return Err(Error::MalformedResponse {
                url: url.to_string(),
                reason: "empty body".to_string(),
            });
        }

        tracing::debug!(url, size = bytes.len(), ?content_type, "Fetched image");

        Ok(FetchedImage {
            bytes,
            content_type,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0_u8; 1024];
            let _ = socket.read(&mut request).await;
            let _ = socket.write_all(&response).await;
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/image.jpg")
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn fetcher(max_bytes: usize) -> HttpImageFetcher {
        HttpImageFetcher::new(client()).with_max_bytes(max_bytes)
    }

    #[tokio::test]
    async fn test_fetch_small_image() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nContent-Length: 5\r\n\r\nhello".to_vec(),
        )
        .await;

        let image = fetcher(64).fetch(&url).await.unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_rejected() {
        let url = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Length: 20971520\r\nConnection: close\r\n\r\n".to_vec(),
        )
        .await;

        let err = HttpImageFetcher::new(client())
            .fetch(&url)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ImageTooLarge {
                size: 20_971_520,
                max: MAX_IMAGE_BYTES
            }
        ));
    }

    #[tokio::test]
    async fn test_streamed_body_over_limit_rejected() {
        let mut response = b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n".to_vec();
        response.extend_from_slice(&[b'x'; 64]);
        let url = serve_once(response).await;

        let err = fetcher(16).fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::ImageTooLarge { max: 16, .. }));
    }

    #[tokio::test]
    async fn test_error_status_reported() {
        let url = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec(),
        )
        .await;

        let err = fetcher(64).fetch(&url).await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }
}
