//! Runner for Go module executables through `gobin`
//!
//! `gobin` installs and runs main packages at a specific module version
//! without touching the `go.mod` file of the current project.
//! See <https://github.com/myitcv/gobin>.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::ToolCommand;
use crate::error::Result;
use crate::project::GoModuleId;
use crate::task::golang::ENV_VAR_GO111MODULE;
use crate::task::{ExecTask, TaskKind};
use crate::utils::env::{EnvMap, merge_env};

use super::golang::GoRunner;
use super::lookup::{SearchPaths, resolve_executable};
use super::traits::{ExecRunner, Runner, go_module_task};

pub const RUNNER_NAME: &str = "gobin";

pub const DEFAULT_EXEC: &str = "gobin";

pub const DEFAULT_GO_MODULE_PATH: &str = "github.com/myitcv/gobin";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v0.0.14";

/// Task name used for the installation of `gobin` itself.
const INSTALL_TASK_NAME: &str = "gobin/install";

/// Runs [`TaskKind::GoModule`] tasks with `gobin -run`.
#[derive(Debug, Clone)]
pub struct GobinRunner {
    env: EnvMap,
    exec: PathBuf,
    go_module: GoModuleId,
    quiet: bool,
    search_paths: SearchPaths,
    working_dir: Option<PathBuf>,
}

impl GobinRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: EnvMap::new(),
            exec: PathBuf::from(DEFAULT_EXEC),
            go_module: GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
            quiet: false,
            search_paths: SearchPaths::from_env(),
            working_dir: None,
        })
    }

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

    /// Module `gobin` itself is installed from.
    pub fn with_go_module(mut self, go_module: GoModuleId) -> Self {
        self.go_module = go_module;
        self
    }

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

    pub fn go_module(&self) -> &GoModuleId {
        &self.go_module
    }

    /// Command installing `gobin` with `go get`.
    ///
    /// It runs in the system temporary directory so the module is not added
    /// to the project's `go.mod` file.
    pub fn install_command(&self, go_runner: &GoRunner) -> ToolCommand {
        let mut install_env = EnvMap::new();
        install_env.insert(ENV_VAR_GO111MODULE.to_string(), "on".to_string());

        go_runner
            .base_command(&merge_env(&self.env, &install_env))
            .with_args(["get".to_string(), "-v".to_string(), self.go_module.to_string()])
            .with_working_dir(std::env::temp_dir())
    }

    /// Install `gobin` with the `go` executable of `go_runner`.
    pub fn install(&self, go_runner: &GoRunner) -> Result<ToolCommand> {
        info!("Installing {}", self.go_module);
        let cmd = self.install_command(go_runner);
        cmd.run(INSTALL_TASK_NAME)?;
        Ok(cmd)
    }
}

impl Runner for GobinRunner {
    fn name(&self) -> &str {
        RUNNER_NAME
    }

    fn handles(&self) -> TaskKind {
        TaskKind::GoModule
    }

    fn validate(&mut self) -> Result<()> {
        self.exec = resolve_executable(RUNNER_NAME, &self.exec, &self.search_paths)?;
        Ok(())
    }

    fn command(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        let module_task = go_module_task(self, task)?;

        let mut cmd = ToolCommand::new(&self.exec)
            .with_args(["-run".to_string(), module_task.id().to_string()])
            .with_args(task.build_params())
            .with_envs(&merge_env(&self.env, &task.env()))
            .with_quiet(self.quiet);
        if let Some(ref dir) = self.working_dir {
            cmd = cmd.with_working_dir(dir);
        }

        tracing::debug!("Built {} command: {}", task.name(), cmd.to_shell_command());
        Ok(cmd)
    }
}

impl ExecRunner for GobinRunner {
    fn exec(&self) -> &Path {
        &self.exec
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorKind};
    use crate::runners::lookup::tests::fake_executable;
    use crate::task::golang::env::EnvTask;
    use crate::task::golangci_lint::{GolangciLintOptions, GolangciLintTask};
    use tempfile::TempDir;

    #[test]
    fn test_command() {
        let runner = GobinRunner::new().unwrap().with_quiet(true);
        let task = GolangciLintTask::new(GolangciLintOptions::new().with_env("GOGC", "50")).unwrap();

        let cmd = runner.command(&task).unwrap();
        assert_eq!(
            cmd.to_shell_command(),
            "gobin -run github.com/golangci/golangci-lint/cmd/golangci-lint@v1.32.0 run"
        );
        assert_eq!(cmd.env.get("GOGC").unwrap(), "50");
        assert!(cmd.quiet);
    }

    #[test]
    fn test_rejects_exec_tasks() {
        let runner = GobinRunner::new().unwrap();
        let err = runner.command(&EnvTask::new()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedTaskKind { .. }));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_install_command() {
        let runner = GobinRunner::new().unwrap();
        let go_runner = GoRunner::new().with_exec("/usr/local/go/bin/go");

        let cmd = runner.install_command(&go_runner);
        assert_eq!(
            cmd.to_shell_command(),
            "/usr/local/go/bin/go get -v github.com/myitcv/gobin@v0.0.14"
        );
        assert_eq!(cmd.env.get("GO111MODULE").unwrap(), "on");
        assert_eq!(cmd.working_dir(), Some(std::env::temp_dir().as_path()));
    }

    #[test]
    fn test_validate_falls_back_to_go_bin_dir() {
        let go_dir = TempDir::new().unwrap();
        let exec = fake_executable(go_dir.path(), "gobin");

        let mut runner = GobinRunner::new().unwrap().with_search_paths(SearchPaths {
            path_dirs: Vec::new(),
            go_bin_dir: Some(go_dir.path().to_path_buf()),
        });
        runner.validate().unwrap();
        assert_eq!(runner.exec(), exec);
    }
}
