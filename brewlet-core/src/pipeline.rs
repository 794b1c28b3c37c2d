// brewlet-core/src/pipeline.rs
//! detect → look up → fetch → verify → extract → plan → place → smoke test.
use std::path::PathBuf;

use brewlet_common::config::Config;
use brewlet_common::error::{BrewletError, Result};
use brewlet_common::model::{ArtifactRecord, Formula, InstallReport, Platform};
use brewlet_net::http::ArtifactFetcher;
use tracing::{debug, info, instrument};

use crate::check::smoke_test;
use crate::fetch::fetch_and_verify_in;
use crate::install::{build_install_plan, extract_tar_gz, install};
use crate::resolve::{lookup_artifact, resolve_platform};

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub platform: Platform,
    pub url: String,
    pub report: InstallReport,
    /// First line of `<tool> --version`, when the smoke test ran.
    pub version_output: Option<String>,
}

pub struct Installer<'a> {
    formula: &'a Formula,
    config: &'a Config,
    fetcher: &'a dyn ArtifactFetcher,
    platform: Option<Platform>,
    temp_dir: Option<PathBuf>,
    run_smoke_test: bool,
}

impl<'a> Installer<'a> {
    pub fn new(formula: &'a Formula, config: &'a Config, fetcher: &'a dyn ArtifactFetcher) -> Self {
        Self {
            formula,
            config,
            fetcher,
            platform: None,
            temp_dir: None,
            run_smoke_test: true,
        }
    }

    /// Use `platform` instead of detecting the host.
    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    /// Directory for the temporary download file. Defaults to the system temp dir.
    pub fn with_temp_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.temp_dir = dir;
        self
    }

    pub fn with_smoke_test(mut self, enabled: bool) -> Self {
        self.run_smoke_test = enabled;
        self
    }

    /// Platform and artifact the install would use. No I/O besides host detection.
    pub fn resolve(&self) -> Result<(Platform, &'a ArtifactRecord)> {
        let platform = match self.platform {
            Some(platform) => {
                debug!("Using platform override {}", platform);
                platform
            }
            None => resolve_platform()?,
        };
        let record = lookup_artifact(self.formula, &platform)?;
        Ok((platform, record))
    }

    #[instrument(skip(self), fields(tool = %self.formula.name(), version = %self.formula.version))]
    pub async fn run(&self) -> Result<InstallOutcome> {
        let (platform, record) = self.resolve()?;
        info!("Resolved {} for {}", record.file_name(), platform);

        let temp_dir = self.temp_dir.clone().unwrap_or_else(std::env::temp_dir);
        let bytes = fetch_and_verify_in(self.fetcher, record, &temp_dir).await?;

        let contents = tokio::task::spawn_blocking(move || extract_tar_gz(&bytes))
            .await
            .map_err(|e| BrewletError::InstallError(format!("Extraction task failed: {e}")))??;
        debug!("Archive holds {} file(s)", contents.len());

        let plan = build_install_plan(&contents, self.formula.name(), &self.config.layout())?;
        let report = install(&plan)?;
        info!("Installed {} to {}", self.formula.name(), report.binary.display());

        let version_output = if self.run_smoke_test {
            Some(smoke_test(&report.binary, &self.formula.version)?)
        } else {
            debug!("Skipping smoke test");
            None
        };

        Ok(InstallOutcome {
            platform,
            url: record.url.clone(),
            report,
            version_output,
        })
    }
}
