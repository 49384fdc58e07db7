//! `go-mod-upgrade`, interactive upgrades of outdated Go module dependencies
//!
//! See <https://github.com/oligot/go-mod-upgrade>.

use crate::error::Result;
use crate::project::GoModuleId;
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "go-mod-upgrade";

pub const DEFAULT_GO_MODULE_PATH: &str = "github.com/oligot/go-mod-upgrade";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v0.6.1";

#[derive(Debug, Clone, Default)]
pub struct GoModUpgradeOptions {
    pub env: EnvMap,
    pub extra_args: Vec<String>,
    pub go_module: Option<GoModuleId>,
}

impl GoModUpgradeOptions {
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
}

#[derive(Debug, Clone)]
pub struct GoModUpgradeTask {
    go_module: GoModuleId,
    options: GoModUpgradeOptions,
}

impl GoModUpgradeTask {
    pub fn new(options: GoModUpgradeOptions) -> Result<Self> {
        let go_module = match options.go_module.clone() {
            Some(go_module) => go_module,
            None => GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
        };
        Ok(Self { go_module, options })
    }
}

impl Task for GoModUpgradeTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for GoModUpgradeTask {
    fn build_params(&self) -> Vec<String> {
        self.options.extra_args.clone()
    }

    fn env(&self) -> EnvMap {
        self.options.env.clone()
    }

    fn as_go_module(&self) -> Option<&dyn GoModuleTask> {
        Some(self)
    }
}

impl GoModuleTask for GoModUpgradeTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}
