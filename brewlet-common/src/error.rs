use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum BrewletError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unsupported platform '{platform}': {reason}")]
    UnsupportedPlatform { platform: String, reason: String },

    #[error("Download failed for '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    #[error("Checksum mismatch for '{url}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Malformed archive: {0}")]
    MalformedArchive(String),

    #[error("Installation Error: {0}")]
    InstallError(String),

    #[error("Smoke test failed: {0}")]
    SmokeTestFailed(String),
}

impl BrewletError {
    pub fn unsupported_platform(platform: impl Into<String>, reason: impl Into<String>) -> Self {
        BrewletError::UnsupportedPlatform {
            platform: platform.into(),
            reason: reason.into(),
        }
    }

    pub fn download_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        BrewletError::DownloadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Only transport failures are worth re-running the install for; everything else
    /// fails the same way on the next attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BrewletError::DownloadFailed { .. } | BrewletError::Http(_))
    }
}

impl From<std::io::Error> for BrewletError {
    fn from(err: std::io::Error) -> Self {
        BrewletError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for BrewletError {
    fn from(err: reqwest::Error) -> Self {
        BrewletError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for BrewletError {
    fn from(err: serde_json::Error) -> Self {
        BrewletError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, BrewletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_download_failures_are_retryable() {
        assert!(BrewletError::download_failed("https://x", "timed out").is_retryable());
        assert!(!BrewletError::MalformedArchive("no binary".into()).is_retryable());
        assert!(!BrewletError::ChecksumMismatch {
            url: "https://x".into(),
            expected: "aa".into(),
            actual: "bb".into(),
        }
        .is_retryable());
    }

    #[test]
    fn checksum_mismatch_message_carries_both_digests() {
        let err = BrewletError::ChecksumMismatch {
            url: "https://example.com/a.tar.gz".into(),
            expected: "abc".into(),
            actual: "def".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("expected abc"));
        assert!(msg.contains("got def"));
        assert!(msg.contains("https://example.com/a.tar.gz"));
    }
}
