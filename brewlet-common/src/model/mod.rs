// brewlet-common/src/model/mod.rs
pub mod artifact;
pub mod formula;
pub mod plan;
pub mod platform;

pub use artifact::{ArtifactRecord, DigestAlgorithm};
pub use formula::Formula;
pub use plan::{InstallLayout, InstallPlan, InstallReport, PlannedFile, Shell};
pub use platform::{Arch, Os, Platform};
