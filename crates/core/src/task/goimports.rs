//! `goimports`, formats Go code and adds missing or removes unreferenced imports
//!
//! See <https://pkg.go.dev/golang.org/x/tools/cmd/goimports>.

use crate::project::GoModuleId;
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "goimports";

pub const DEFAULT_GO_MODULE_PATH: &str = "golang.org/x/tools/cmd/goimports";

#[derive(Debug, Clone, Default)]
pub struct GoimportsOptions {
    pub env: EnvMap,
    pub extra_args: Vec<String>,
    /// Overrides the default module, the latest version of goimports
    pub go_module: Option<GoModuleId>,
    pub list_non_compliant_files: bool,
    /// Import path prefixes grouped after third-party packages
    pub local_pkgs: Vec<String>,
    /// Defaults to the current directory
    pub paths: Vec<String>,
    pub persist_changes: bool,
    pub report_all_errors: bool,
    pub verbose: bool,
}

impl GoimportsOptions {
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

    pub fn with_go_module(mut self, go_module: GoModuleId) -> Self {
        self.go_module = Some(go_module);
        self
    }

    pub fn with_list_non_compliant_files(mut self, enable: bool) -> Self {
        self.list_non_compliant_files = enable;
        self
    }

    pub fn with_local_pkgs<I, S>(mut self, pkgs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.local_pkgs.extend(pkgs.into_iter().map(Into::into));
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

    pub fn with_verbose_output(mut self, enable: bool) -> Self {
        self.verbose = enable;
        self
    }
}

#[derive(Debug, Clone)]
pub struct GoimportsTask {
    go_module: GoModuleId,
    options: GoimportsOptions,
}

impl GoimportsTask {
    pub fn new(options: GoimportsOptions) -> Self {
        let go_module = options
            .go_module
            .clone()
            .unwrap_or_else(|| GoModuleId::latest(DEFAULT_GO_MODULE_PATH));
        Self { go_module, options }
    }
}

impl Task for GoimportsTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for GoimportsTask {
    fn build_params(&self) -> Vec<String> {
        let opts = &self.options;
        let mut params = Vec::new();

        if opts.list_non_compliant_files {
            params.push("-l".to_string());
        }
        if !opts.local_pkgs.is_empty() {
            params.push("-local".to_string());
            params.push(opts.local_pkgs.join(","));
        }
        if opts.report_all_errors {
            params.push("-e".to_string());
        }
        if opts.persist_changes {
            params.push("-w".to_string());
        }
        if opts.verbose {
            params.push("-v".to_string());
        }

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

impl GoModuleTask for GoimportsTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}
