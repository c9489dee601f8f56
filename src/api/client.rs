use futures::Stream;
use futures::TryStreamExt;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use super::models::ClientConfig;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Server returned error: {0}")]
    HttpStatus(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone, Default)]
pub struct PageClient {
    config: ClientConfig,
}

impl PageClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Client for page fetches, bounded end to end by `timeout`
    fn page_http(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(self.config.timeout)
            .build()?)
    }

    /// Client for video bodies: no overall deadline, only connect and per-read stalls
    fn stream_http(&self) -> Result<Client> {
        Ok(Client::builder()
            .user_agent(&self.config.user_agent)
            .connect_timeout(self.config.connect_timeout)
            .read_timeout(self.config.read_timeout)
            .build()?)
    }

    /// Fetch a page and return its body as text. Non-2xx statuses are errors.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        debug!(url, "fetching page");
        let response = self
            .page_http()?
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::HttpStatus(format!("Page request failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Body decode error: {}", e)))
    }

    /// Download file as a byte stream
    /// Returns (total_size, stream)
    pub async fn download_file_stream(
        &self,
        download_url: &str,
    ) -> Result<(Option<u64>, impl Stream<Item = Result<bytes::Bytes>>)> {
        debug!(url = download_url, "requesting video");
        let response = self
            .stream_http()?
            .get(download_url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::HttpStatus(format!("Download request failed: {}", e)))?;

        let total_size = response.content_length();
        let stream = response.bytes_stream().map_err(ApiError::RequestError);

        Ok((total_size, stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/item")
            .with_status(200)
            .with_body("<html><title>Item</title></html>")
            .create_async()
            .await;

        let client = PageClient::default();
        let body = client
            .fetch_page(&format!("{}/item", server.url()))
            .await
            .unwrap();

        assert_eq!(body, "<html><title>Item</title></html>");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = PageClient::default();
        let err = client
            .fetch_page(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::HttpStatus(_)));
    }

    #[tokio::test]
    async fn test_sends_configured_user_agent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ua")
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let client = PageClient::new(ClientConfig::default().with_user_agent("test-agent/1.0"));
        client
            .fetch_page(&format!("{}/ua", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_download_stream_yields_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/v.mp4")
            .with_status(200)
            .with_body("ABC")
            .create_async()
            .await;

        let client = PageClient::default();
        let (_total, stream) = client
            .download_file_stream(&format!("{}/v.mp4", server.url()))
            .await
            .unwrap();

        let chunks: Vec<_> = stream.collect().await;
        let body: Vec<u8> = chunks
            .into_iter()
            .flat_map(|chunk| chunk.unwrap().to_vec())
            .collect();
        assert_eq!(body, b"ABC");
    }

    #[tokio::test]
    async fn test_download_stream_outlives_page_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/slow.mp4")
            .with_status(200)
            .with_chunked_body(|w| {
                for byte in b"ABCD" {
                    std::thread::sleep(Duration::from_millis(500));
                    w.write_all(&[*byte])?;
                    w.flush()?;
                }
                Ok(())
            })
            .create_async()
            .await;

        // Body takes ~2s, well past the 1s page timeout
        let client = PageClient::new(
            ClientConfig::default()
                .with_timeout(Duration::from_secs(1))
                .with_read_timeout(Duration::from_secs(5)),
        );
        let (_total, stream) = client
            .download_file_stream(&format!("{}/slow.mp4", server.url()))
            .await
            .unwrap();

        let mut body = Vec::new();
        let mut stream = stream.boxed();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(body, b"ABCD");
    }

    #[tokio::test]
    async fn test_page_fetch_keeps_total_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/slow")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1500));
                w.write_all(b"<html></html>")
            })
            .create_async()
            .await;

        let client =
            PageClient::new(ClientConfig::default().with_timeout(Duration::from_millis(500)));
        let result = client.fetch_page(&format!("{}/slow", server.url())).await;

        assert!(result.is_err());
    }
}
