// brewlet-net/src/validation.rs
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use brewlet_common::error::{BrewletError, Result};
use sha2::{Digest, Sha256};
use url::Url;

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Hashes the file at `path` and compares it against `expected`. `url` is only used to
/// give the error context.
pub fn verify_checksum(path: &Path, expected: &str, url: &str) -> Result<()> {
    tracing::debug!("Verifying checksum for: {}", path.display());
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let bytes_copied = io::copy(&mut reader, &mut hasher)?;
    let actual = hex::encode(hasher.finalize());
    tracing::debug!("Calculated SHA256: {} ({} bytes read)", actual, bytes_copied);
    tracing::debug!("Expected SHA256:   {}", expected);
    compare(url, expected, actual)
}

/// Same check as [`verify_checksum`] for data already in memory.
pub fn verify_digest(data: &[u8], expected: &str, url: &str) -> Result<()> {
    compare(url, expected, sha256_hex(data))
}

fn compare(url: &str, expected: &str, actual: String) -> Result<()> {
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(BrewletError::ChecksumMismatch {
            url: url.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

/// Validates a URL, ensuring it uses the HTTPS scheme. A bad URL is a table error, not a
/// transient one, so it is reported as `Config`.
pub fn validate_url(url_str: &str) -> Result<()> {
    let url = Url::parse(url_str)
        .map_err(|e| BrewletError::Config(format!("Failed to parse URL '{url_str}': {e}")))?;
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(BrewletError::Config(format!(
            "URL scheme must be https, got '{}' in '{url_str}'",
            url.scheme()
        )))
    }
}
