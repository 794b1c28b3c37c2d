// brewlet-core/src/check/mod.rs
pub mod smoke;

pub use smoke::smoke_test;
