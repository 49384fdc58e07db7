//! `golangci-lint`, a fast and parallel runner for many Go linters
//!
//! See <https://github.com/golangci/golangci-lint>.

use crate::error::Result;
use crate::project::GoModuleId;
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "golangcilint";

pub const DEFAULT_GO_MODULE_PATH: &str = "github.com/golangci/golangci-lint/cmd/golangci-lint";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v1.32.0";

/// Arguments used when none are configured.
pub const DEFAULT_ARGS: &[&str] = &["run"];

#[derive(Debug, Clone, Default)]
pub struct GolangciLintOptions {
    /// Defaults to [`DEFAULT_ARGS`]
    pub args: Vec<String>,
    pub env: EnvMap,
    /// Overrides the default module
    pub go_module: Option<GoModuleId>,
    pub verbose: bool,
}

impl GolangciLintOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_go_module(mut self, go_module: GoModuleId) -> Self {
        self.go_module = Some(go_module);
        self
    }

    pub fn with_verbose_output(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GolangciLintTask {
    go_module: GoModuleId,
    options: GolangciLintOptions,
}

impl GolangciLintTask {
    pub fn new(options: GolangciLintOptions) -> Result<Self> {
        let go_module = match options.go_module.clone() {
            Some(go_module) => go_module,
            None => GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
        };
        Ok(Self { go_module, options })
    }
}

impl Task for GolangciLintTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for GolangciLintTask {
    fn build_params(&self) -> Vec<String> {
        let mut params: Vec<String> = if self.options.args.is_empty() {
            DEFAULT_ARGS.iter().map(|a| a.to_string()).collect()
        } else {
            self.options.args.clone()
        };
        if self.options.verbose {
            params.push("-v".to_string());
        }
        params
    }

    fn env(&self) -> EnvMap {
        self.options.env.clone()
    }

    fn as_go_module(&self) -> Option<&dyn GoModuleTask> {
        Some(self)
    }
}

impl GoModuleTask for GolangciLintTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let task = GolangciLintTask::new(GolangciLintOptions::new()).unwrap();
        assert_eq!(task.kind(), TaskKind::GoModule);
        assert_eq!(task.build_params(), vec!["run"]);
        assert_eq!(
            task.id().to_string(),
            "github.com/golangci/golangci-lint/cmd/golangci-lint@v1.32.0"
        );
        assert_eq!(task.id().exec_name(), "golangci-lint");
        assert!(task.as_go_module().is_some());
    }

    #[test]
    fn test_custom_args_and_verbose() {
        let options = GolangciLintOptions::new()
            .with_args(["run", "--fix", "./..."])
            .with_verbose_output(true)
            .with_go_module(GoModuleId::latest(DEFAULT_GO_MODULE_PATH));
        let task = GolangciLintTask::new(options).unwrap();
        assert_eq!(task.build_params(), vec!["run", "--fix", "./...", "-v"]);
        assert!(task.id().is_latest);
    }
}
