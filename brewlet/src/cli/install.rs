// brewlet/src/cli/install.rs
use std::time::Duration;

use brewlet_common::error::{BrewletError, Result};
use brewlet_common::Config;
use brewlet_core::Installer;
use brewlet_net::HttpFetcher;
use clap::Args;
use colored::Colorize;
use tracing::instrument;

use super::Context;
use crate::ui;

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Give up on the download after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not run `<tool> --version` after installing
    #[arg(long)]
    skip_smoke_test: bool,
}

impl InstallArgs {
    fn effective_config(&self, base: &Config) -> Result<Config> {
        let mut config = base.clone();
        if let Some(secs) = self.timeout {
            if secs == 0 {
                return Err(BrewletError::Config(
                    "--timeout must be greater than zero".to_string(),
                ));
            }
            config = config.with_download_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    #[instrument(skip(self, ctx), fields(tool = %ctx.formula.name()))]
    pub async fn run(&self, ctx: &Context<'_>) -> Result<()> {
        let config = self.effective_config(ctx.config)?;
        let formula = ctx.formula;
        let fetcher = HttpFetcher::new(&config)?;
        let installer = Installer::new(formula, &config, &fetcher)
            .with_platform(ctx.platform)
            .with_smoke_test(!self.skip_smoke_test);

        let (platform, record) = installer.resolve()?;
        ui::header(&format!(
            "Installing {} {} for {}",
            formula.name(),
            formula.version,
            platform
        ));

        let spinner = ui::create_spinner(
            &format!("Downloading {}", record.file_name()),
            ctx.verbose > 0,
        );
        let result = installer.run().await;
        spinner.finish_and_clear();
        let outcome = result?;

        println!(
            "{} {} -> {}",
            "Installed".green().bold(),
            formula.name(),
            outcome.report.binary.display()
        );
        for (shell, path) in &outcome.report.completions {
            println!("  {shell} completion -> {}", path.display());
        }
        for warning in outcome.report.warnings() {
            ui::warning(&warning);
        }
        if let Some(version) = &outcome.version_output {
            println!("  {} {}", "version:".dimmed(), version);
        }
        Ok(())
    }
}
