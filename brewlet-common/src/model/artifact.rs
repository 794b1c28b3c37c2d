// brewlet-common/src/model/artifact.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use super::platform::Platform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
}

impl DigestAlgorithm {
    /// Length of the hex encoding of a digest produced by this algorithm.
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Sha256 => f.write_str("sha256"),
        }
    }
}

/// One release artifact: where to download the archive for a platform and the digest
/// it must hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactRecord {
    pub platform: Platform,
    pub url: String,
    pub checksum: String,
    pub algorithm: DigestAlgorithm,
}

impl ArtifactRecord {
    /// File name component of the URL, used for temp file naming and log output.
    pub fn file_name(&self) -> &str {
        self.url
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or(self.url.as_str())
    }
}
