//! Runner for the `go` command

use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::error::Result;
use crate::task::{ExecTask, TaskKind};
use crate::utils::env::{EnvMap, merge_env};

use super::lookup::{SearchPaths, resolve_executable};
use super::traits::{ExecRunner, Runner, ensure_kind};

pub const RUNNER_NAME: &str = "golang";

pub const DEFAULT_EXEC: &str = "go";

/// Runs [`TaskKind::Exec`] tasks with the `go` executable.
#[derive(Debug, Clone)]
pub struct GoRunner {
    env: EnvMap,
    exec: PathBuf,
    quiet: bool,
    search_paths: SearchPaths,
    working_dir: Option<PathBuf>,
}

impl Default for GoRunner {
    fn default() -> Self {
        Self {
            env: EnvMap::new(),
            exec: PathBuf::from(DEFAULT_EXEC),
            quiet: false,
            search_paths: SearchPaths::from_env(),
            working_dir: None,
        }
    }
}

impl GoRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base environment of every run, task environments are applied on top.
    pub fn with_env(mut self, env: EnvMap) -> Self {
        self.env = env;
        self
    }

    pub fn with_exec(mut self, name_or_path: impl Into<PathBuf>) -> Self {
        let exec = name_or_path.into();
        if !exec.as_os_str().is_empty() {
            self.exec = exec;
        }
        self
    }

    /// Suppress the standard output of tasks.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_search_paths(mut self, search_paths: SearchPaths) -> Self {
        self.search_paths = search_paths;
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(&self) -> &EnvMap {
        &self.env
    }

    /// Command for the `go` executable with the runner environment applied.
    pub(crate) fn base_command(&self, task_env: &EnvMap) -> ToolCommand {
        let mut cmd = ToolCommand::new(&self.exec)
            .with_envs(&merge_env(&self.env, task_env))
            .with_quiet(self.quiet);
        if let Some(ref dir) = self.working_dir {
            cmd = cmd.with_working_dir(dir);
        }
        cmd
    }
}

impl Runner for GoRunner {
    fn name(&self) -> &str {
        RUNNER_NAME
    }

    fn handles(&self) -> TaskKind {
        TaskKind::Exec
    }

    fn validate(&mut self) -> Result<()> {
        self.exec = resolve_executable(RUNNER_NAME, &self.exec, &self.search_paths)?;
        Ok(())
    }

    fn command(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        ensure_kind(self, task)?;
        let cmd = self.base_command(&task.env()).with_args(task.build_params());
        tracing::debug!("Built {} command: {}", task.name(), cmd.to_shell_command());
        Ok(cmd)
    }
}

impl ExecRunner for GoRunner {
    fn exec(&self) -> &Path {
        &self.exec
    }
}
