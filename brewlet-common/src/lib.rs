// brewlet-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;

pub use config::Config;
pub use error::{BrewletError, Result};
pub use model::{ArtifactRecord, Formula, InstallPlan, Platform};
