// brewlet-core/src/check/smoke.rs
use std::path::Path;
use std::process::Command as StdCommand;

use brewlet_common::error::{BrewletError, Result};
use tracing::{debug, warn};

/// Runs `<binary> --version` and returns the first line it printed.
///
/// The installed tool must exit 0 and print something. Output that does not mention
/// `expected_version` is accepted with a warning.
pub fn smoke_test(binary: &Path, expected_version: &str) -> Result<String> {
    debug!("Running {} --version", binary.display());
    let output = StdCommand::new(binary)
        .arg("--version")
        .output()
        .map_err(|e| {
            BrewletError::SmokeTestFailed(format!(
                "could not run {} --version: {}",
                binary.display(),
                e
            ))
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(BrewletError::SmokeTestFailed(format!(
            "{} --version exited with {}: {}",
            binary.display(),
            output.status,
            stderr.trim()
        )));
    }

    let text = if stdout.trim().is_empty() {
        &stderr
    } else {
        &stdout
    };
    let line = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| {
            BrewletError::SmokeTestFailed(format!(
                "{} --version printed no version string",
                binary.display()
            ))
        })?
        .to_string();

    if !expected_version.is_empty() && !text.contains(expected_version) {
        warn!(
            "{} reports '{}', which does not mention version {}",
            binary.display(),
            line,
            expected_version
        );
    }
    debug!("Smoke test output: {}", line);
    Ok(line)
}
