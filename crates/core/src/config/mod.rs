//! Configuration file of a wand project

mod settings;

// Re-export main types
pub use settings::{
    AppEntry, CONFIG_FILE_NAMES, GoRunnerConfig, ModuleRunnerConfig, ProjectConfig,
    RunnersConfig, WandConfig,
};
