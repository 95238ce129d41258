use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{DomainError, FetchOptions};
use crate::ports::AssetFetcher;

/// Downloads remote assets over HTTPS with reqwest.
///
/// The body is streamed into `<destination>.download` and moved into place
/// only once complete, so a failed transfer never clobbers the current file.
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("clash-resources/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        info!(timeout_secs = timeout.as_secs(), "HttpFetcher initialized");

        Ok(Self { client, timeout })
    }

    /// Only absolute http(s) URLs are fetched.
    fn validate_url(url: &str) -> Result<Url, DomainError> {
        let parsed = Url::parse(url).map_err(|e| DomainError::HttpRequest(e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(DomainError::HttpRequest(format!(
                "Unsupported URL scheme '{}'",
                other
            ))),
        }
    }

    /// Stream the body into `temp_path`, then move it over `destination`.
    ///
    /// The temp file is closed before this returns.
    async fn write_and_replace(
        response: Response,
        temp_path: &Path,
        destination: &Path,
        options: FetchOptions,
    ) -> Result<u64, DomainError> {
        let mut file = tokio::fs::File::create(temp_path).await?;
        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| DomainError::HttpRequest(e.to_string()))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        if options.remove_previous {
            match tokio::fs::remove_file(destination).await {
                Ok(()) => debug!(path = ?destination, "Removed previous file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        tokio::fs::rename(temp_path, destination).await?;
        Ok(downloaded)
    }
}

#[async_trait]
impl AssetFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        destination: &Path,
        options: FetchOptions,
    ) -> Result<(), DomainError> {
        let parsed = Self::validate_url(url)?;

        if !options.remove_previous && destination.exists() {
            return Err(DomainError::DestinationExists(destination.to_path_buf()));
        }

        let response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DomainError::HttpRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::HttpRequest(format!("HTTP {} for {}", status, url)));
        }

        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = destination.with_extension("download");
        match Self::write_and_replace(response, &temp_path, destination, options).await {
            Ok(size) => {
                info!(path = ?destination, size = size, "File downloaded successfully");
                Ok(())
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                    if cleanup.kind() != ErrorKind::NotFound {
                        warn!(
                            path = ?temp_path,
                            error = %cleanup,
                            "Failed to remove partial download"
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Serve exactly one raw HTTP response on a loopback port.
    ///
    /// `declared_len` overrides Content-Length so a short body can be sent.
    async fn serve_once(status: &'static str, body: &'static [u8], declared_len: usize) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let head = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status, declared_len
            );
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(body).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/Country.mmdb", addr)
    }

    fn local_fetcher() -> HttpFetcher {
        HttpFetcher {
            client: Client::builder().no_proxy().build().unwrap(),
            timeout: Duration::from_secs(5),
        }
    }

    const REPLACE: FetchOptions = FetchOptions {
        remove_previous: true,
    };

    #[test]
    fn test_https_url_accepted() {
        let url = "https://static.clash.to/GeoIP2/GeoIP2-Country.mmdb";
        assert!(HttpFetcher::validate_url(url).is_ok());
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let err = HttpFetcher::validate_url("file:///etc/passwd").unwrap_err();
        assert!(err.to_string().contains("Unsupported URL scheme"));
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(HttpFetcher::validate_url("GeoIP2-Country.mmdb").is_err());
    }

    #[tokio::test]
    async fn test_existing_destination_kept_without_remove_previous() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("Country.mmdb");
        std::fs::write(&dest, b"current").unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .fetch(
                "https://example.invalid/Country.mmdb",
                &dest,
                FetchOptions {
                    remove_previous: false,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::DestinationExists(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"current");
    }

    #[tokio::test]
    async fn test_successful_download_replaces_destination() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("Country.mmdb");
        std::fs::write(&dest, b"old-db").unwrap();

        let body: &[u8] = b"fresh-db-bytes";
        let url = serve_once("200 OK", body, body.len()).await;
        local_fetcher().fetch(&url, &dest, REPLACE).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert!(!dest.with_extension("download").exists());
    }

    #[tokio::test]
    async fn test_download_creates_missing_parent() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("clash").join("Country.mmdb");

        let body: &[u8] = b"first-db";
        let url = serve_once("200 OK", body, body.len()).await;
        local_fetcher().fetch(&url, &dest, REPLACE).await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), body);
    }

    #[tokio::test]
    async fn test_error_status_keeps_previous_file() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("Country.mmdb");
        std::fs::write(&dest, b"old-db").unwrap();

        let body: &[u8] = b"unavailable";
        let url = serve_once("503 Service Unavailable", body, body.len()).await;
        let err = local_fetcher().fetch(&url, &dest, REPLACE).await.unwrap_err();

        assert!(matches!(err, DomainError::HttpRequest(ref msg) if msg.contains("503")));
        assert_eq!(std::fs::read(&dest).unwrap(), b"old-db");
        assert!(!dest.with_extension("download").exists());
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial_download() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("Country.mmdb");
        std::fs::write(&dest, b"old-db").unwrap();

        let url = serve_once("200 OK", b"short", 4096).await;
        let err = local_fetcher().fetch(&url, &dest, REPLACE).await.unwrap_err();

        assert!(matches!(err, DomainError::HttpRequest(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"old-db");
        assert!(!dest.with_extension("download").exists());
    }
}
