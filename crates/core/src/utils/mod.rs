pub mod env;
pub mod fs;
pub mod serde_helpers;

pub use env::{EnvMap, merge_env};
