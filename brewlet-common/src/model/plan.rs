// brewlet-common/src/model/plan.rs
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    pub const ALL: [Shell; 3] = [Shell::Bash, Shell::Zsh, Shell::Fish];

    /// Name of the completion script inside the archive's `completions/` directory.
    pub fn archive_file_name(&self, tool: &str) -> String {
        match self {
            Shell::Bash => format!("{tool}.bash"),
            Shell::Zsh => format!("{tool}.zsh"),
            Shell::Fish => format!("{tool}.fish"),
        }
    }

    /// Name the script is installed under. zsh autoloads functions named `_<cmd>`.
    pub fn installed_file_name(&self, tool: &str) -> String {
        match self {
            Shell::Zsh => format!("_{tool}"),
            Shell::Bash | Shell::Fish => self.archive_file_name(tool),
        }
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shell::Bash => f.write_str("bash"),
            Shell::Zsh => f.write_str("zsh"),
            Shell::Fish => f.write_str("fish"),
        }
    }
}

/// Destination directories for each file role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub bin_dir: PathBuf,
    pub bash_completion_dir: PathBuf,
    pub zsh_completion_dir: PathBuf,
    pub fish_completion_dir: PathBuf,
}

impl InstallLayout {
    pub fn completion_dir(&self, shell: Shell) -> &PathBuf {
        match shell {
            Shell::Bash => &self.bash_completion_dir,
            Shell::Zsh => &self.zsh_completion_dir,
            Shell::Fish => &self.fish_completion_dir,
        }
    }
}

/// One file taken from the archive and the place it lands.
#[derive(Clone, PartialEq, Eq)]
pub struct PlannedFile {
    pub archive_path: PathBuf,
    pub payload: Vec<u8>,
    pub destination: PathBuf,
    pub mode: u32,
}

impl fmt::Debug for PlannedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedFile")
            .field("archive_path", &self.archive_path)
            .field("payload_len", &self.payload.len())
            .field("destination", &self.destination)
            .field("mode", &format_args!("{:o}", self.mode))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub tool: String,
    pub binary: PlannedFile,
    pub completions: BTreeMap<Shell, PlannedFile>,
    /// Shells whose completion script the archive does not contain.
    pub skipped: Vec<Shell>,
}

impl InstallPlan {
    pub fn binary_path(&self) -> &PathBuf {
        &self.binary.destination
    }

    pub fn completion_paths(&self) -> BTreeMap<Shell, &PathBuf> {
        self.completions
            .iter()
            .map(|(shell, file)| (*shell, &file.destination))
            .collect()
    }
}

/// What `install` actually did with a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    pub binary: PathBuf,
    pub completions: BTreeMap<Shell, PathBuf>,
    pub skipped: Vec<Shell>,
    pub failed: Vec<(Shell, String)>,
}

impl InstallReport {
    /// The binary is in place but at least one completion is not.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || !self.failed.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .skipped
            .iter()
            .map(|shell| format!("{shell} completion not found in archive; skipped"))
            .collect();
        out.extend(
            self.failed
                .iter()
                .map(|(shell, reason)| format!("{shell} completion could not be installed: {reason}")),
        );
        out
    }
}
