// brewlet-core/src/resolve.rs
use std::env::consts;

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{ArtifactRecord, Formula, Platform};
use tracing::debug;

/// Classifies the running host. Fails with `UnsupportedPlatform` for any OS or CPU
/// architecture outside the known set.
pub fn resolve_platform() -> Result<Platform> {
    let platform = Platform::from_parts(consts::OS, consts::ARCH)?;
    debug!(
        "Detected host platform {} (os={}, arch={})",
        platform,
        consts::OS,
        consts::ARCH
    );
    Ok(platform)
}

/// Returns the single record for `platform`. A platform the release did not build for is
/// reported the same way as an unrecognised host.
pub fn lookup_artifact<'a>(formula: &'a Formula, platform: &Platform) -> Result<&'a ArtifactRecord> {
    formula.artifact_for(platform).ok_or_else(|| {
        let supported: Vec<String> = formula
            .supported_platforms()
            .map(|p| p.to_string())
            .collect();
        BrewletError::unsupported_platform(
            platform.to_string(),
            format!(
                "{} {} has no release artifact for this platform (available: {})",
                formula.name(),
                formula.version,
                supported.join(", ")
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_detection_matches_build_target() {
        let supported_target = cfg!(any(target_os = "macos", target_os = "linux"))
            && cfg!(any(target_arch = "x86_64", target_arch = "aarch64"));
        match resolve_platform() {
            Ok(platform) => {
                assert!(supported_target);
                assert_eq!(
                    platform.os == brewlet_common::model::Os::Linux,
                    cfg!(target_os = "linux")
                );
            }
            Err(BrewletError::UnsupportedPlatform { .. }) => assert!(!supported_target),
            Err(other) => panic!("unexpected error kind: {other:?}"),
        }
    }
}
