//! Contains the logic for the `info` command.
use brewlet_common::error::Result;
use brewlet_core::{lookup_artifact, resolve_platform};
use colored::Colorize;

use super::Context;

#[derive(clap::Args, Debug)]
pub struct Info;

impl Info {
    pub fn run(&self, ctx: &Context<'_>) -> Result<()> {
        let formula = ctx.formula;
        println!(
            "{} {}",
            formula.name().bold().green(),
            formula.version.bold()
        );
        if let Some(desc) = &formula.desc {
            println!("{desc}");
        }
        if let Some(homepage) = &formula.homepage {
            println!("{}", homepage.blue().underline());
        }
        if let Some(license) = &formula.license {
            println!("License: {license}");
        }

        println!("\n{}", "Artifacts:".bold());
        for record in formula.artifacts() {
            println!("  {:<14} {}", record.platform.to_string(), record.url);
            println!("  {:<14} {}:{}", "", record.algorithm, record.checksum);
        }

        println!("\n{}", "Install layout:".bold());
        let layout = ctx.config.layout();
        println!("  binary        {}", layout.bin_dir.join(formula.name()).display());
        println!("  bash          {}", layout.bash_completion_dir.display());
        println!("  zsh           {}", layout.zsh_completion_dir.display());
        println!("  fish          {}", layout.fish_completion_dir.display());

        let platform = match ctx.platform {
            Some(platform) => platform,
            None => resolve_platform()?,
        };
        let record = lookup_artifact(formula, &platform)?;
        println!(
            "\nThis host ({}) would install {}",
            platform.to_string().cyan(),
            record.file_name()
        );
        Ok(())
    }
}
