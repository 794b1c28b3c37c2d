// brewlet-core/src/fetch.rs
use std::env;
use std::path::Path;

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{ArtifactRecord, DigestAlgorithm};
use brewlet_net::http::ArtifactFetcher;
use brewlet_net::validation::verify_checksum;
use tracing::{debug, error};

/// Downloads the artifact into a temporary file in the system temp directory, verifies
/// it and returns the verified bytes.
pub async fn fetch_and_verify(
    fetcher: &dyn ArtifactFetcher,
    record: &ArtifactRecord,
) -> Result<Vec<u8>> {
    fetch_and_verify_in(fetcher, record, &env::temp_dir()).await
}

/// Like [`fetch_and_verify`], with the temporary file created in `temp_dir`.
///
/// The temporary file is owned by a `NamedTempFile` and removed when this function
/// returns, whether the download, the digest check or the read-back failed or not.
pub async fn fetch_and_verify_in(
    fetcher: &dyn ArtifactFetcher,
    record: &ArtifactRecord,
    temp_dir: &Path,
) -> Result<Vec<u8>> {
    let temp = tempfile::Builder::new()
        .prefix(".brewlet-")
        .suffix(&format!("-{}.download", record.file_name()))
        .tempfile_in(temp_dir)
        .map_err(|e| {
            BrewletError::InstallError(format!(
                "Failed to create temporary download file in {}: {}",
                temp_dir.display(),
                e
            ))
        })?;
    debug!(
        "Downloading {} for {} to temporary path {}",
        record.url,
        record.platform,
        temp.path().display()
    );

    let bytes = fetcher
        .download(&record.url, temp.path())
        .await
        .inspect_err(|e| error!("Download attempt failed from {}: {}", record.url, e))?;
    debug!("Fetched {} bytes from {}", bytes, record.url);

    let path = temp.path().to_path_buf();
    let algorithm = record.algorithm;
    let checksum = record.checksum.clone();
    let url = record.url.clone();
    let data = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        match algorithm {
            DigestAlgorithm::Sha256 => verify_checksum(&path, &checksum, &url)?,
        }
        debug!("Checksum verified for {}", url);
        Ok(std::fs::read(&path)?)
    })
    .await
    .map_err(|e| BrewletError::InstallError(format!("Checksum task failed: {e}")))??;

    Ok(data)
}
