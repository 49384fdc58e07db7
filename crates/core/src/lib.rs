//! wand-core - Typed tasks and runners for build automation of Go projects
//!
//! This crate provides functionality to:
//! - Describe commands of Go tools as tasks with parameters and environment
//! - Locate, validate and run the executables of those tools
//! - Derive project metadata like the version from the Git history
pub mod app;
pub mod command;
pub mod config;
pub mod elder;
pub mod error;
pub mod project;
pub mod runners;
pub mod task;
pub mod utils;

// Re-export commonly used types and traits
pub use app::{AppConfig, AppStore};
pub use command::ToolCommand;
pub use config::WandConfig;
pub use error::{Error, ErrorKind, Result};
pub use project::{GoModuleId, Project, ProjectOptions, SemVer, VcsKind, VcsVersion};

// Re-export main API components
pub use elder::{Elder, ElderOptions, Wand};
pub use runners::{ExecRunner, ModuleRunner, ModuleRunnerKind, Runner};
pub use task::{ExecTask, GoModuleTask, Mixin, Task, TaskKind};
