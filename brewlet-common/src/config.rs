// brewlet-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::UserDirs;
use tracing::debug;

use super::error::{BrewletError, Result};
use super::model::plan::InstallLayout;

pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 60;
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub prefix: PathBuf,
    pub download_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading brewlet configuration");

        let prefix = env::var("BREWLET_PREFIX")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| env::var("HOMEBREW_PREFIX").ok().filter(|s| !s.is_empty()))
            .map(|raw| expand_home(Path::new(&raw)))
            .unwrap_or_else(|| {
                let fallback = default_prefix();
                debug!(
                    "BREWLET_PREFIX/HOMEBREW_PREFIX not set, falling back to default: {}",
                    fallback.display()
                );
                fallback
            });
        debug!("Effective prefix set to: {}", prefix.display());

        let download_timeout = match env::var("BREWLET_DOWNLOAD_TIMEOUT_SECS") {
            Ok(raw) if !raw.is_empty() => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    BrewletError::Config(format!(
                        "BREWLET_DOWNLOAD_TIMEOUT_SECS must be a whole number of seconds, got '{raw}': {e}"
                    ))
                })?;
                if secs == 0 {
                    return Err(BrewletError::Config(
                        "BREWLET_DOWNLOAD_TIMEOUT_SECS must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            _ => Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
        };

        Ok(Self::with_prefix(prefix).with_download_timeout(download_timeout))
    }

    /// Configuration rooted at `prefix` with default timeouts, independent of the
    /// environment.
    pub fn with_prefix(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_download_timeout(mut self, timeout: Duration) -> Self {
        self.download_timeout = timeout;
        self
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.prefix.join("bin")
    }

    pub fn bash_completion_dir(&self) -> PathBuf {
        self.prefix.join("etc").join("bash_completion.d")
    }

    pub fn zsh_completion_dir(&self) -> PathBuf {
        self.prefix.join("share").join("zsh").join("site-functions")
    }

    pub fn fish_completion_dir(&self) -> PathBuf {
        self.prefix
            .join("share")
            .join("fish")
            .join("vendor_completions.d")
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout {
            bin_dir: self.bin_dir(),
            bash_completion_dir: self.bash_completion_dir(),
            zsh_completion_dir: self.zsh_completion_dir(),
            fish_completion_dir: self.fish_completion_dir(),
        }
    }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => UserDirs::new()
            .map(|ud| ud.home_dir().join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Homebrew's conventional prefix for the host.
fn default_prefix() -> PathBuf {
    if cfg!(target_os = "macos") {
        if cfg!(target_arch = "aarch64") {
            PathBuf::from("/opt/homebrew")
        } else {
            PathBuf::from("/usr/local")
        }
    } else {
        PathBuf::from("/home/linuxbrew/.linuxbrew")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_prefix() {
        let config = Config::with_prefix("/tmp/prefix");
        let layout = config.layout();
        assert_eq!(layout.bin_dir, PathBuf::from("/tmp/prefix/bin"));
        assert_eq!(
            layout.bash_completion_dir,
            PathBuf::from("/tmp/prefix/etc/bash_completion.d")
        );
        assert_eq!(
            layout.zsh_completion_dir,
            PathBuf::from("/tmp/prefix/share/zsh/site-functions")
        );
        assert_eq!(
            layout.fish_completion_dir,
            PathBuf::from("/tmp/prefix/share/fish/vendor_completions.d")
        );
        assert_eq!(
            config.download_timeout,
            Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS)
        );
    }

    #[test]
    fn expand_home_leaves_plain_paths_alone() {
        assert_eq!(expand_home(Path::new("/opt/x")), PathBuf::from("/opt/x"));
        assert_eq!(expand_home(Path::new("rel/x")), PathBuf::from("rel/x"));
    }
}
