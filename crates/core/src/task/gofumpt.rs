//! `gofumpt`, a stricter `gofmt`
//!
//! See <https://github.com/mvdan/gofumpt>.

use crate::error::Result;
use crate::project::GoModuleId;
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "gofumpt";

pub const DEFAULT_EXEC_NAME: &str = "gofumpt";

pub const DEFAULT_GO_MODULE_PATH: &str = "mvdan.cc/gofumpt";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v0.1.1";

#[derive(Debug, Clone, Default)]
pub struct GofumptOptions {
    pub env: EnvMap,
    pub extra_args: Vec<String>,
    /// Enable rules that are not enabled by default
    pub extra_rules: bool,
    pub go_module: Option<GoModuleId>,
    pub list_non_compliant_files: bool,
    /// Defaults to the current directory
    pub paths: Vec<String>,
    pub persist_changes: bool,
    pub report_all_errors: bool,
    pub simplify: bool,
}

impl GofumptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_rules(mut self, enable: bool) -> Self {
        self.extra_rules = enable;
        self
    }

    pub fn with_go_module(mut self, go_module: GoModuleId) -> Self {
        self.go_module = Some(go_module);
        self
    }

    pub fn with_list_non_compliant_files(mut self, enable: bool) -> Self {
        self.list_non_compliant_files = enable;
        self
    }

    pub fn with_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_persisted_changes(mut self, enable: bool) -> Self {
        self.persist_changes = enable;
        self
    }

    pub fn with_report_all_errors(mut self, enable: bool) -> Self {
        self.report_all_errors = enable;
        self
    }

    pub fn with_simplify(mut self, enable: bool) -> Self {
        self.simplify = enable;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GofumptTask {
    go_module: GoModuleId,
    options: GofumptOptions,
}

impl GofumptTask {
    pub fn new(options: GofumptOptions) -> Result<Self> {
        let go_module = match options.go_module.clone() {
            Some(go_module) => go_module,
            None => GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
        };
        Ok(Self { go_module, options })
    }
}

impl Task for GofumptTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for GofumptTask {
    fn build_params(&self) -> Vec<String> {
        let opts = &self.options;
        let mut params: Vec<String> = [
            (opts.extra_rules, "-extra"),
            (opts.list_non_compliant_files, "-l"),
            (opts.persist_changes, "-w"),
            (opts.report_all_errors, "-e"),
            (opts.simplify, "-s"),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .map(|(_, flag)| flag.to_string())
        .collect();

        params.extend(opts.extra_args.iter().cloned());

        if opts.paths.is_empty() {
            params.push(".".to_string());
        } else {
            params.extend(opts.paths.iter().cloned());
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

impl GoModuleTask for GofumptTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let task = GofumptTask::new(GofumptOptions::new()).unwrap();
        assert_eq!(task.build_params(), vec!["."]);
        assert_eq!(task.id().to_string(), "mvdan.cc/gofumpt@v0.1.1");
        assert_eq!(task.id().exec_name(), DEFAULT_EXEC_NAME);
    }

    #[test]
    fn test_flags_keep_order() {
        let options = GofumptOptions::new()
            .with_simplify(true)
            .with_extra_rules(true)
            .with_persisted_changes(true)
            .with_list_non_compliant_files(true)
            .with_report_all_errors(true)
            .with_paths(["pkg"]);
        let task = GofumptTask::new(options).unwrap();
        assert_eq!(
            task.build_params(),
            vec!["-extra", "-l", "-w", "-e", "-s", "pkg"]
        );
    }
}
