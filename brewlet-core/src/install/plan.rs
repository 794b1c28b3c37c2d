// brewlet-core/src/install/plan.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{InstallLayout, InstallPlan, PlannedFile, Shell};
use tracing::{debug, warn};

use super::extract::ArchiveContents;

pub const BINARY_MODE: u32 = 0o755;
pub const COMPLETION_MODE: u32 = 0o644;
const COMPLETIONS_DIR: &str = "completions";

/// Maps archive entries to their destinations under `layout`.
///
/// The binary `<tool>` must sit at the archive root (after stripping a single wrapping
/// directory, if any). Completion scripts are optional.
pub fn build_install_plan(
    contents: &ArchiveContents,
    tool: &str,
    layout: &InstallLayout,
) -> Result<InstallPlan> {
    let contents = if contents.get(tool).is_some() {
        std::borrow::Cow::Borrowed(contents)
    } else {
        contents.without_single_root()
    };

    let binary_entry = contents.get(tool).ok_or_else(|| {
        let listing: Vec<String> = contents
            .paths()
            .map(|p| p.display().to_string())
            .collect();
        BrewletError::MalformedArchive(format!(
            "expected executable '{}' at the archive root, found: [{}]",
            tool,
            listing.join(", ")
        ))
    })?;

    let binary = PlannedFile {
        archive_path: binary_entry.path.clone(),
        payload: binary_entry.data.clone(),
        destination: layout.bin_dir.join(tool),
        mode: BINARY_MODE,
    };
    debug!(
        "Planned binary {} -> {}",
        binary.archive_path.display(),
        binary.destination.display()
    );

    let mut completions = BTreeMap::new();
    let mut skipped = Vec::new();
    for shell in Shell::ALL {
        let archive_path: PathBuf = Path::new(COMPLETIONS_DIR).join(shell.archive_file_name(tool));
        match contents.get(&archive_path) {
            Some(entry) => {
                let destination = layout
                    .completion_dir(shell)
                    .join(shell.installed_file_name(tool));
                debug!(
                    "Planned {} completion {} -> {}",
                    shell,
                    archive_path.display(),
                    destination.display()
                );
                completions.insert(
                    shell,
                    PlannedFile {
                        archive_path,
                        payload: entry.data.clone(),
                        destination,
                        mode: COMPLETION_MODE,
                    },
                );
            }
            None => {
                warn!(
                    "Archive has no {} completion ({}); it will be skipped",
                    shell,
                    archive_path.display()
                );
                skipped.push(shell);
            }
        }
    }

    Ok(InstallPlan {
        tool: tool.to_string(),
        binary,
        completions,
        skipped,
    })
}
