use std::path::{Path, PathBuf};

use crate::app::AppConfig;
use crate::task::{ExecTask, Task, TaskKind};
use crate::utils::env::EnvMap;

use super::{GoOptions, build_go_options};

pub const TASK_NAME: &str = "go/build";

/// Name of the output directory for distribution artifacts.
pub const DEFAULT_DIST_OUTPUT_DIR_NAME: &str = "dist";

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Defaults to the application name
    pub binary_artifact_name: Option<String>,
    pub flags: Vec<String>,
    pub go_options: GoOptions,
    /// Defaults to the application output directory
    pub output_dir: Option<PathBuf>,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.binary_artifact_name = Some(name.into());
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_go_options(mut self, go_options: GoOptions) -> Self {
        self.go_options = go_options;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

/// Compile the main package of an application.
#[derive(Debug, Clone)]
pub struct BuildTask {
    binary_artifact_name: String,
    output_dir: PathBuf,
    pkg_import_path: String,
    options: BuildOptions,
}

impl BuildTask {
    pub fn new(app: &AppConfig, options: BuildOptions) -> Self {
        Self {
            binary_artifact_name: options
                .binary_artifact_name
                .clone()
                .unwrap_or_else(|| app.name.clone()),
            output_dir: options
                .output_dir
                .clone()
                .unwrap_or_else(|| app.base_output_dir.clone()),
            pkg_import_path: app.pkg_import_path.clone(),
            options,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the compiled executable.
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(&self.binary_artifact_name)
    }
}

impl Task for BuildTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Exec
    }
}

impl ExecTask for BuildTask {
    fn build_params(&self) -> Vec<String> {
        let mut params = vec!["build".to_string()];
        params.extend(build_go_options(&self.options.go_options));
        params.extend(self.options.flags.iter().cloned());
        params.push("-o".to_string());
        params.push(self.artifact_path().to_string_lossy().into_owned());
        params.push(self.pkg_import_path.clone());
        params
    }

    fn env(&self) -> EnvMap {
        self.options.go_options.resolve().env
    }
}
