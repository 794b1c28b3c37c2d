// brewlet-common/src/model/formula.rs
//! The artifact table for one released version of a tool.
//!
//! A formula is produced by the release process and consumed read-only. It is validated
//! completely when loaded so that a bad table fails before anything is downloaded.
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::artifact::{ArtifactRecord, DigestAlgorithm};
use super::platform::Platform;
use crate::error::{BrewletError, Result};

const BUILTIN_FORMULA: &str = include_str!("../../formula/limesctl.json");

#[derive(Debug, Deserialize)]
struct RawFormula {
    name: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    version: String,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    artifacts: Vec<RawArtifact>,
}

#[derive(Debug, Deserialize)]
struct RawArtifact {
    os: String,
    arch: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Formula {
    name: String,
    pub desc: Option<String>,
    pub homepage: Option<String>,
    pub version: String,
    pub license: Option<String>,
    artifacts: BTreeMap<Platform, ArtifactRecord>,
}

impl Formula {
    /// The table shipped with this build.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_FORMULA)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading formula from {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            BrewletError::Config(format!("Failed to read formula {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let parsed: RawFormula = serde_json::from_str(raw)
            .map_err(|e| BrewletError::Config(format!("Invalid formula JSON: {e}")))?;
        Self::validate(parsed)
    }

    fn validate(raw: RawFormula) -> Result<Self> {
        let name = raw.name.trim().to_string();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(BrewletError::Config(format!(
                "Formula name '{}' is not a valid file name",
                raw.name
            )));
        }
        if raw.version.trim().is_empty() {
            return Err(BrewletError::Config(format!(
                "Formula '{name}' has an empty version"
            )));
        }
        if raw.artifacts.is_empty() {
            return Err(BrewletError::Config(format!(
                "Formula '{name}' lists no artifacts"
            )));
        }

        let mut artifacts = BTreeMap::new();
        for (idx, artifact) in raw.artifacts.into_iter().enumerate() {
            let record = validate_artifact(&name, idx, artifact)?;
            match artifacts.entry(record.platform) {
                Entry::Occupied(_) => {
                    return Err(BrewletError::Config(format!(
                        "Formula '{}' has more than one artifact for {}",
                        name, record.platform
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(record);
                }
            }
        }

        debug!(
            "Loaded formula {} {} with {} artifact(s)",
            name,
            raw.version,
            artifacts.len()
        );
        Ok(Self {
            name,
            desc: raw.desc,
            homepage: raw.homepage,
            version: raw.version.trim().to_string(),
            license: raw.license,
            artifacts,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Records in platform order.
    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactRecord> {
        self.artifacts.values()
    }

    pub fn supported_platforms(&self) -> impl Iterator<Item = Platform> + '_ {
        self.artifacts.keys().copied()
    }

    pub fn artifact_for(&self, platform: &Platform) -> Option<&ArtifactRecord> {
        self.artifacts.get(platform)
    }
}

fn validate_artifact(formula: &str, idx: usize, raw: RawArtifact) -> Result<ArtifactRecord> {
    let platform = Platform::from_parts(&raw.os, &raw.arch).map_err(|e| {
        BrewletError::Config(format!("Formula '{formula}' artifact #{idx}: {e}"))
    })?;

    let (url, checksum) = match (raw.url, raw.sha256) {
        (Some(url), Some(sha)) if !url.trim().is_empty() && !sha.trim().is_empty() => {
            (url.trim().to_string(), sha.trim().to_string())
        }
        (url, sha) => {
            return Err(BrewletError::Config(format!(
                "Formula '{formula}' artifact for {platform}: url and sha256 must both be present (url: {}, sha256: {})",
                if url.is_some_and(|u| !u.trim().is_empty()) { "present" } else { "missing" },
                if sha.is_some_and(|s| !s.trim().is_empty()) { "present" } else { "missing" },
            )));
        }
    };

    let parsed = Url::parse(&url).map_err(|e| {
        BrewletError::Config(format!(
            "Formula '{formula}' artifact for {platform}: invalid url '{url}': {e}"
        ))
    })?;
    if parsed.scheme() != "https" {
        return Err(BrewletError::Config(format!(
            "Formula '{formula}' artifact for {platform}: url must use https, got '{url}'"
        )));
    }

    let algorithm = DigestAlgorithm::Sha256;
    if checksum.len() != algorithm.hex_len() || !checksum.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(BrewletError::Config(format!(
            "Formula '{formula}' artifact for {platform}: sha256 must be {} hex characters, got '{checksum}'",
            algorithm.hex_len()
        )));
    }

    Ok(ArtifactRecord {
        platform,
        url,
        checksum: checksum.to_ascii_lowercase(),
        algorithm,
    })
}
