// brewlet/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::path::PathBuf;

use brewlet_common::error::Result;
use brewlet_common::model::{Formula, Platform};
use brewlet_common::config::expand_home;
use brewlet_common::Config;
use clap::{ArgAction, Parser, Subcommand};

pub mod info;
pub mod install;

use crate::cli::info::Info;
use crate::cli::install::InstallArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "brewlet", bin_name = "brewlet")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Artifact table (JSON) to use instead of the built-in limesctl formula
    #[arg(long, value_name = "FILE", global = true)]
    pub formula: Option<PathBuf>,

    /// Install under this prefix instead of BREWLET_PREFIX / HOMEBREW_PREFIX
    #[arg(long, value_name = "DIR", global = true)]
    pub prefix: Option<PathBuf>,

    /// Act as if running on this platform, e.g. linux-amd64 or darwin-arm64
    #[arg(long, value_name = "OS-ARCH", global = true)]
    pub platform: Option<Platform>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the formula and the artifact that would be installed
    Info(Info),
    /// Download, verify and install the tool
    Install(InstallArgs),
}

impl CliArgs {
    /// Environment configuration with `--prefix` applied on top.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::load()?;
        if let Some(prefix) = &self.prefix {
            config.prefix = expand_home(prefix);
        }
        Ok(config)
    }
}

/// Everything a command needs, resolved once in `main`.
pub struct Context<'a> {
    pub config: &'a Config,
    pub formula: &'a Formula,
    pub platform: Option<Platform>,
    pub verbose: u8,
}

impl Command {
    pub async fn run(&self, ctx: &Context<'_>) -> Result<()> {
        match self {
            Self::Info(command) => command.run(ctx),
            Self::Install(command) => command.run(ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use brewlet_common::model::{Arch, Os};

    use super::*;

    #[test]
    fn global_flags_parse_after_the_subcommand() {
        let args = CliArgs::try_parse_from([
            "brewlet",
            "install",
            "--platform",
            "darwin-arm64",
            "--prefix",
            "/tmp/p",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.platform, Some(Platform::new(Os::MacOs, Arch::Arm64)));
        assert!(matches!(args.command, Command::Install(_)));
    }

    #[test]
    fn prefix_applies_to_info_as_well() {
        let args = CliArgs::try_parse_from(["brewlet", "info", "--prefix", "/opt/preview"]).unwrap();
        let config = args.config().unwrap();
        assert_eq!(config.bin_dir(), PathBuf::from("/opt/preview/bin"));
        assert_eq!(
            config.layout().zsh_completion_dir,
            PathBuf::from("/opt/preview/share/zsh/site-functions")
        );
    }

    #[test]
    fn unknown_platform_is_rejected_by_the_parser() {
        assert!(CliArgs::try_parse_from(["brewlet", "info", "--platform", "windows-amd64"]).is_err());
    }
}
