// brewlet-net/src/http.rs
//! Artifact download over HTTPS.
//!
//! [`ArtifactFetcher`] is the seam between the install pipeline and the network: the
//! pipeline only asks for "the bytes at this URL, written to this file".
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use brewlet_common::config::Config;
use brewlet_common::error::{BrewletError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::validation::validate_url;

const USER_AGENT_STRING: &str = concat!("brewlet/", env!("CARGO_PKG_VERSION"), " (Rust)");

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait ArtifactFetcher: Send + Sync {
    /// Downloads `url` into `dest`, truncating it first. Returns the number of bytes
    /// written.
    ///
    /// Any transport failure, non-success status or timeout is reported as
    /// `DownloadFailed`.
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, Result<u64>>;
}

/// `reqwest`-backed implementation of [`ArtifactFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    require_https: bool,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        let client = Client::builder()
            .timeout(config.download_timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| BrewletError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            timeout: config.download_timeout,
            require_https: true,
        })
    }

    fn describe(&self, err: &reqwest::Error) -> String {
        if err.is_timeout() {
            format!("timed out after {}s", self.timeout.as_secs())
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        }
    }

    async fn fetch_into(&self, url: &str, dest: &Path) -> Result<u64> {
        if self.require_https {
            validate_url(url)?;
        }

        let mut response = self.client.get(url).send().await.map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            BrewletError::download_failed(url, self.describe(&e))
        })?;
        let status = response.status();
        debug!("Received HTTP status: {} for {}", status, url);

        if !status.is_success() {
            error!("HTTP error {} for URL {}", status, url);
            return Err(BrewletError::download_failed(
                url,
                format!("server responded with HTTP {status}"),
            ));
        }

        let mut file = TokioFile::create(dest).await.map_err(|e| {
            BrewletError::InstallError(format!(
                "Failed to create download file {}: {}",
                dest.display(),
                e
            ))
        })?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| BrewletError::download_failed(url, self.describe(&e)))?
        {
            file.write_all(&chunk).await.map_err(|e| {
                BrewletError::InstallError(format!(
                    "Failed to write download stream to {}: {}",
                    dest.display(),
                    e
                ))
            })?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn download<'a>(&'a self, url: &'a str, dest: &'a Path) -> BoxFuture<'a, Result<u64>> {
        Box::pin(self.fetch_into(url, dest))
    }
}

#[cfg(test)]
mod tests {
    use brewlet_common::config::Config;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    use super::*;

    /// Fetcher that talks plain HTTP to a listener on the loopback interface.
    fn loopback_fetcher(timeout: Duration) -> HttpFetcher {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .unwrap();
        HttpFetcher {
            client,
            timeout,
            require_https: false,
        }
    }

    #[tokio::test]
    async fn plain_http_is_refused_before_any_request() {
        let dir = TempDir::new().unwrap();
        let fetcher = HttpFetcher::new(&Config::with_prefix(dir.path())).unwrap();
        let dest = dir.path().join("a.tar.gz");

        let err = fetcher
            .download("http://example.com/a.tar.gz", &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, BrewletError::Config(_)));
        assert!(!err.is_retryable());
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn server_error_status_is_download_failed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                )
                .await
                .unwrap();
        });

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("a.tar.gz");
        let url = format!("http://{addr}/a.tar.gz");
        let err = loopback_fetcher(Duration::from_secs(5))
            .download(&url, &dest)
            .await
            .unwrap_err();
        match &err {
            BrewletError::DownloadFailed { reason, .. } => {
                assert!(reason.contains("HTTP 500"), "unexpected reason: {reason}")
            }
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
        assert!(!dest.exists());
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });

        let dir = TempDir::new().unwrap();
        let url = format!("http://{addr}/a.tar.gz");
        let err = loopback_fetcher(Duration::from_secs(1))
            .download(&url, &dir.path().join("a.tar.gz"))
            .await
            .unwrap_err();
        match &err {
            BrewletError::DownloadFailed { reason, .. } => {
                assert!(reason.contains("timed out"), "unexpected reason: {reason}")
            }
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
        assert!(err.is_retryable());
    }
}
