// brewlet-core/src/install/place.rs
use std::fs;
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{InstallPlan, InstallReport, PlannedFile};
use tracing::{debug, error, warn};

/// Writes the plan to disk.
///
/// The binary goes first. If it cannot be placed, nothing written by this call remains
/// and the error is returned. Completion scripts are then placed one by one; their
/// failures are recorded in the report and never undo the binary.
pub fn install(plan: &InstallPlan) -> Result<InstallReport> {
    let created_dirs = match place_binary(&plan.binary) {
        Ok(created) => created,
        Err(e) => {
            error!(
                "Failed to install {} to {}: {}",
                plan.tool,
                plan.binary.destination.display(),
                e
            );
            return Err(e);
        }
    };
    debug!(
        "Installed binary {} ({} new directories)",
        plan.binary.destination.display(),
        created_dirs.len()
    );

    let mut report = InstallReport {
        binary: plan.binary.destination.clone(),
        skipped: plan.skipped.clone(),
        ..Default::default()
    };

    for (shell, file) in &plan.completions {
        match place_file(file) {
            Ok(_) => {
                debug!("Installed {} completion to {}", shell, file.destination.display());
                report.completions.insert(*shell, file.destination.clone());
            }
            Err(e) => {
                warn!(
                    "Could not install {} completion to {}: {}",
                    shell,
                    file.destination.display(),
                    e
                );
                report.failed.push((*shell, e.to_string()));
            }
        }
    }

    Ok(report)
}

fn place_binary(file: &PlannedFile) -> Result<Vec<PathBuf>> {
    let dir = parent_dir(file)?;
    let created = create_dir_tracked(dir).map_err(|e| {
        BrewletError::InstallError(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    if let Err(e) = write_atomically(file) {
        remove_created_dirs(&created);
        return Err(BrewletError::InstallError(format!(
            "Failed to write {}: {}",
            file.destination.display(),
            e
        )));
    }
    Ok(created)
}

fn place_file(file: &PlannedFile) -> Result<()> {
    let dir = parent_dir(file)?;
    fs::create_dir_all(dir).map_err(|e| {
        BrewletError::InstallError(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    write_atomically(file).map_err(|e| {
        BrewletError::InstallError(format!(
            "Failed to write {}: {}",
            file.destination.display(),
            e
        ))
    })
}

fn parent_dir(file: &PlannedFile) -> Result<&Path> {
    file.destination.parent().ok_or_else(|| {
        BrewletError::InstallError(format!(
            "Destination {} has no parent directory",
            file.destination.display()
        ))
    })
}

/// Writes into a temp file next to the destination and renames it over the
/// destination. Readers see either the old file or the complete new one.
fn write_atomically(file: &PlannedFile) -> io::Result<()> {
    let dir = file
        .destination
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let mut temp = tempfile::Builder::new().prefix(".brewlet-").tempfile_in(dir)?;
    temp.write_all(&file.payload)?;
    temp.flush()?;
    temp.as_file().sync_all()?;
    #[cfg(unix)]
    fs::set_permissions(temp.path(), fs::Permissions::from_mode(file.mode))?;
    temp.persist(&file.destination).map_err(|e| e.error)?;
    Ok(())
}

/// `create_dir_all` that reports which directories did not exist before, outermost first.
fn create_dir_tracked(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut missing: Vec<PathBuf> = dir
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .map(Path::to_path_buf)
        .collect();
    missing.reverse();
    fs::create_dir_all(dir)?;
    Ok(missing)
}

fn remove_created_dirs(created: &[PathBuf]) {
    for dir in created.iter().rev() {
        if let Err(e) = fs::remove_dir(dir) {
            warn!("Could not remove directory {}: {}", dir.display(), e);
        }
    }
}
