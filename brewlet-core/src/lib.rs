// brewlet-core/src/lib.rs
pub mod check;
pub mod fetch;
pub mod install;
pub mod pipeline;
pub mod resolve;

pub use fetch::{fetch_and_verify, fetch_and_verify_in};
pub use install::{build_install_plan, extract_tar_gz, install, ArchiveContents};
pub use pipeline::{InstallOutcome, Installer};
pub use resolve::{lookup_artifact, resolve_platform};
