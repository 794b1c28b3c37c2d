// brewlet-common/src/model/platform.rs
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BrewletError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Os {
    #[serde(rename = "darwin", alias = "macos")]
    MacOs,
    #[serde(rename = "linux")]
    Linux,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "amd64", alias = "x86_64")]
    Amd64,
    #[serde(rename = "arm64", alias = "aarch64")]
    Arm64,
}

impl Os {
    pub const ALL: [Os; 2] = [Os::MacOs, Os::Linux];

    /// Classifies an OS name as reported by `std::env::consts::OS` or as written in
    /// release artifact names.
    pub fn classify(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Some(Os::MacOs),
            "linux" => Some(Os::Linux),
            _ => None,
        }
    }

    /// Name used in release artifact file names.
    pub fn release_name(&self) -> &'static str {
        match self {
            Os::MacOs => "darwin",
            Os::Linux => "linux",
        }
    }
}

impl Arch {
    pub const ALL: [Arch; 2] = [Arch::Amd64, Arch::Arm64];

    pub fn classify(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "amd64" | "x86_64" | "x64" => Some(Arch::Amd64),
            "arm64" | "aarch64" => Some(Arch::Arm64),
            _ => None,
        }
    }

    pub fn release_name(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// The (operating system, CPU architecture) pair identifying a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    pub fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Classifies raw OS and architecture names. Anything outside the known enum values
    /// is an `UnsupportedPlatform`.
    pub fn from_parts(os: &str, arch: &str) -> Result<Self> {
        let display = format!("{os}-{arch}");
        let os = Os::classify(os).ok_or_else(|| {
            BrewletError::unsupported_platform(&display, format!("unrecognized operating system '{os}'"))
        })?;
        let arch = Arch::classify(arch).ok_or_else(|| {
            BrewletError::unsupported_platform(
                &display,
                format!("unrecognized CPU architecture '{arch}'"),
            )
        })?;
        Ok(Self { os, arch })
    }

    /// Every platform the model can describe, in a stable order.
    pub fn all() -> impl Iterator<Item = Platform> {
        Os::ALL
            .into_iter()
            .flat_map(|os| Arch::ALL.into_iter().map(move |arch| Platform { os, arch }))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.release_name())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.release_name())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for Platform {
    type Err = BrewletError;

    /// Parses `<os>-<arch>` or `<os>/<arch>`, e.g. `linux-amd64` or `darwin/arm64`.
    fn from_str(s: &str) -> Result<Self> {
        let (os, arch) = s.split_once(['-', '/']).ok_or_else(|| {
            BrewletError::unsupported_platform(s, "expected <os>-<arch>, e.g. linux-amd64")
        })?;
        Platform::from_parts(os, arch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_host_style_and_release_style_names() {
        assert_eq!(
            Platform::from_parts("macos", "aarch64").unwrap(),
            Platform::new(Os::MacOs, Arch::Arm64)
        );
        assert_eq!(
            Platform::from_parts("linux", "x86_64").unwrap(),
            Platform::new(Os::Linux, Arch::Amd64)
        );
        assert_eq!(
            "darwin-amd64".parse::<Platform>().unwrap(),
            Platform::new(Os::MacOs, Arch::Amd64)
        );
        assert_eq!(
            "Linux/ARM64".parse::<Platform>().unwrap(),
            Platform::new(Os::Linux, Arch::Arm64)
        );
    }

    #[test]
    fn unknown_names_are_unsupported_platform() {
        for (os, arch) in [("windows", "x86_64"), ("linux", "riscv64"), ("freebsd", "arm64")] {
            match Platform::from_parts(os, arch) {
                Err(BrewletError::UnsupportedPlatform { platform, .. }) => {
                    assert_eq!(platform, format!("{os}-{arch}"));
                }
                other => panic!("expected UnsupportedPlatform for {os}-{arch}, got {other:?}"),
            }
        }
        assert!(matches!(
            "linux".parse::<Platform>(),
            Err(BrewletError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn display_uses_release_names() {
        assert_eq!(Platform::new(Os::MacOs, Arch::Arm64).to_string(), "darwin-arm64");
        assert_eq!(Platform::all().count(), 4);
    }
}
