use crate::{
    error::{Error, Result},
    runners::ModuleRunnerKind,
    utils::env::EnvMap,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Names of the configuration file, searched in this order.
pub const CONFIG_FILE_NAMES: &[&str] = &["wand.json", ".wand.json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WandConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<AppEntry>,
    #[serde(default)]
    pub runners: RunnersConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Base output directory relative to the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,
    /// Go module import path, read from `go.mod` when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    /// Version control system kind, `none` or `git`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Path relative to the project root
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RunnersConfig {
    #[serde(default)]
    pub go: GoRunnerConfig,
    #[serde(default)]
    pub module: ModuleRunnerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GoRunnerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "EnvMap::is_empty")]
    pub env: EnvMap,
    #[serde(default)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModuleRunnerConfig {
    #[serde(default)]
    pub kind: ModuleRunnerKind,
    /// Executable of the `gobin` runner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec: Option<PathBuf>,
    /// Cache directory of the `gotool` runner, relative paths are resolved
    /// against the project root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_bin_dir: Option<PathBuf>,
    #[serde(default = "default_cache")]
    pub cache: bool,
    #[serde(default, skip_serializing_if = "EnvMap::is_empty")]
    pub env: EnvMap,
    #[serde(default)]
    pub quiet: bool,
}

fn default_cache() -> bool {
    true
}

impl Default for ModuleRunnerConfig {
    fn default() -> Self {
        Self {
            kind: ModuleRunnerKind::default(),
            exec: None,
            tools_bin_dir: None,
            cache: default_cache(),
            env: EnvMap::new(),
            quiet: false,
        }
    }
}

impl WandConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Find the nearest configuration file in `start_path` or its ancestors.
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            for name in CONFIG_FILE_NAMES {
                let config_path = current.join(name);
                if config_path.is_file() {
                    return Some(config_path);
                }
            }

            current = current.parent()?;
        }
    }
}
