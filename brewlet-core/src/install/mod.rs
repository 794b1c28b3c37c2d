// brewlet-core/src/install/mod.rs
pub mod extract;
pub mod place;
pub mod plan;

pub use extract::{extract_tar_gz, ArchiveContents, ArchiveEntry};
pub use place::install;
pub use plan::build_install_plan;
