//! Runner for Go module executables built with the `go` toolchain
//!
//! With caching enabled every module version is installed once into its own
//! directory below the tools binary directory:
//!
//! ```text
//! <tools bin dir>/<exec name>/<version|latest>/<exec name>
//! ```
//!
//! Multiple versions of the same tool can live side by side this way and
//! none of them pollutes the project's `go.mod` file. Without caching the
//! module is compiled and run on the fly with `go run`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::ToolCommand;
use crate::error::{Error, Result};
use crate::project::{GO_MODULE_VERSION_LATEST, GoModuleId};
use crate::task::golang::ENV_VAR_GOBIN;
use crate::task::golang::install::InstallTask;
use crate::task::{ExecTask, GoModuleTask, TaskKind};
use crate::utils::env::{EnvMap, merge_env};
use crate::utils::fs::regular_file_exists;

use super::golang::GoRunner;
use super::traits::{Runner, go_module_task};

pub const RUNNER_NAME: &str = "gotool";

/// Runs [`TaskKind::GoModule`] tasks with executables installed by the Go
/// toolchain.
#[derive(Debug, Clone)]
pub struct GotoolRunner {
    cache: bool,
    env: EnvMap,
    go_runner: GoRunner,
    quiet: bool,
    tools_bin_dir: PathBuf,
    working_dir: Option<PathBuf>,
}

impl GotoolRunner {
    pub fn new(go_runner: GoRunner) -> Self {
        Self {
            cache: false,
            env: EnvMap::new(),
            go_runner,
            quiet: false,
            tools_bin_dir: PathBuf::new(),
            working_dir: None,
        }
    }

    /// Install executables into the tools binary directory and reuse them.
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_env(mut self, env: EnvMap) -> Self {
        self.env = env;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Root of the executable cache, must be absolute when caching.
    pub fn with_tools_bin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tools_bin_dir = dir.into();
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn is_cached(&self) -> bool {
        self.cache
    }

    pub fn go_runner(&self) -> &GoRunner {
        &self.go_runner
    }

    fn tools_bin_dir(&self) -> Result<&Path> {
        if !self.tools_bin_dir.is_absolute() {
            return Err(Error::validation(
                RUNNER_NAME,
                format!(
                    "expected an absolute path for the tools binary directory, got {:?}",
                    self.tools_bin_dir
                ),
            ));
        }
        Ok(&self.tools_bin_dir)
    }

    /// Directory the executable of `go_module` is installed into.
    pub fn exec_dir(&self, go_module: &GoModuleId) -> Result<PathBuf> {
        let version_dir = match go_module.pinned_version() {
            Some(version) => version.to_string(),
            None => GO_MODULE_VERSION_LATEST.to_string(),
        };
        Ok(self
            .tools_bin_dir()?
            .join(go_module.exec_name())
            .join(version_dir))
    }

    /// Path of the cached executable of `go_module`.
    pub fn exec_path(&self, go_module: &GoModuleId) -> Result<PathBuf> {
        Ok(self.exec_dir(go_module)?.join(go_module.exec_name()))
    }

    fn install_task(&self, go_module: &GoModuleId, exec_dir: &Path) -> InstallTask {
        let mut task = InstallTask::new(go_module.clone());
        for (key, value) in &self.env {
            task = task.with_env(key, value);
        }
        task.with_env(ENV_VAR_GOBIN, exec_dir.to_string_lossy())
    }

    /// Install the executable of `go_module` into its cache directory.
    pub fn install(&self, go_module: &GoModuleId) -> Result<ToolCommand> {
        let exec_dir = self.exec_dir(go_module)?;
        std::fs::create_dir_all(&exec_dir)?;

        info!("Installing {} into {}", go_module, exec_dir.display());
        self.go_runner.run(&self.install_task(go_module, &exec_dir))
    }

    /// Install the executable of `go_module` unless it is already cached.
    ///
    /// Returns the install command when an installation was necessary.
    pub fn ensure_installed(&self, go_module: &GoModuleId) -> Result<Option<ToolCommand>> {
        let exec_path = self.exec_path(go_module)?;
        if regular_file_exists(&exec_path)? {
            debug!("Using cached executable {}", exec_path.display());
            return Ok(None);
        }
        self.install(go_module).map(Some)
    }

    fn prepare(&self, task: &dyn ExecTask) -> Result<()> {
        if self.cache {
            let module_task = go_module_task(self, task)?;
            self.ensure_installed(module_task.id())?;
        }
        Ok(())
    }

    fn cached_command(&self, module_task: &dyn GoModuleTask) -> Result<ToolCommand> {
        Ok(ToolCommand::new(self.exec_path(module_task.id())?)
            .with_args(module_task.build_params())
            .with_envs(&merge_env(&self.env, &module_task.env())))
    }

    fn go_run_command(&self, module_task: &dyn GoModuleTask) -> ToolCommand {
        self.go_runner
            .base_command(&merge_env(&self.env, &module_task.env()))
            .with_args(["run".to_string(), module_task.id().to_string()])
            .with_args(module_task.build_params())
    }
}

impl Runner for GotoolRunner {
    fn name(&self) -> &str {
        RUNNER_NAME
    }

    fn handles(&self) -> TaskKind {
        TaskKind::GoModule
    }

    fn validate(&mut self) -> Result<()> {
        if self.cache {
            self.tools_bin_dir()?;
        }
        self.go_runner.validate()
    }

    /// Compose the command without installing anything.
    fn command(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        let module_task = go_module_task(self, task)?;

        let mut cmd = if self.cache {
            self.cached_command(module_task)?
        } else {
            self.go_run_command(module_task)
        }
        .with_quiet(self.quiet);
        if let Some(ref dir) = self.working_dir {
            cmd = cmd.with_working_dir(dir);
        }

        debug!("Built {} command: {}", task.name(), cmd.to_shell_command());
        Ok(cmd)
    }

    fn run(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        self.prepare(task)?;
        let cmd = self.command(task)?;
        cmd.run(task.name())?;
        Ok(cmd)
    }

    fn run_output(&self, task: &dyn ExecTask) -> Result<String> {
        self.prepare(task)?;
        self.command(task)?.run_output(task.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runners::lookup::SearchPaths;
    use crate::task::gofumpt::{GofumptOptions, GofumptTask};
    use crate::task::golang::env::EnvTask;
    use tempfile::TempDir;

    fn gofumpt() -> GofumptTask {
        GofumptTask::new(GofumptOptions::new().with_list_non_compliant_files(true)).unwrap()
    }

    #[test]
    fn test_exec_path_layout() {
        let runner = GotoolRunner::new(GoRunner::new())
            .with_cache(true)
            .with_tools_bin_dir("/cache/tools/bin");

        let pinned = GoModuleId::pinned("mvdan.cc/gofumpt", "v0.1.1").unwrap();
        assert_eq!(
            runner.exec_path(&pinned).unwrap(),
            PathBuf::from("/cache/tools/bin/gofumpt/0.1.1/gofumpt")
        );

        let latest = GoModuleId::latest("golang.org/x/tools/cmd/goimports");
        assert_eq!(
            runner.exec_path(&latest).unwrap(),
            PathBuf::from("/cache/tools/bin/goimports/latest/goimports")
        );
    }

    #[test]
    fn test_relative_tools_dir_fails_validation() {
        let mut runner = GotoolRunner::new(GoRunner::new())
            .with_cache(true)
            .with_tools_bin_dir(".wand/tools/bin");
        assert_eq!(runner.validate().unwrap_err().kind(), ErrorKind::Validation);
        assert!(runner.command(&gofumpt()).is_err());
    }

    #[test]
    fn test_command_without_cache_uses_go_run() {
        let runner = GotoolRunner::new(GoRunner::new().with_exec("/usr/bin/go"))
            .with_working_dir("/src/project");

        let cmd = runner.command(&gofumpt()).unwrap();
        assert_eq!(
            cmd.to_shell_command(),
            "/usr/bin/go run mvdan.cc/gofumpt@v0.1.1 -l ."
        );
        assert_eq!(cmd.working_dir(), Some(Path::new("/src/project")));
    }

    #[test]
    fn test_command_has_no_side_effects() {
        let tools = TempDir::new().unwrap();
        let runner = GotoolRunner::new(GoRunner::new())
            .with_cache(true)
            .with_tools_bin_dir(tools.path());

        let cmd = runner.command(&gofumpt()).unwrap();
        assert_eq!(
            cmd.program,
            tools.path().join("gofumpt").join("0.1.1").join("gofumpt")
        );
        assert!(std::fs::read_dir(tools.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_rejects_exec_tasks() {
        let runner = GotoolRunner::new(GoRunner::new());
        assert_eq!(
            runner.command(&EnvTask::new()).unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_run_installs_missing_executable_once() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let tools = dir.path().join("tools");
        let log = dir.path().join("installs.log");

        // Fake `go install` writing a tool that echoes its arguments.
        let go = dir.path().join("go");
        std::fs::write(
            &go,
            format!(
                "#!/bin/sh\necho \"$2\" >> {log}\nprintf '#!/bin/sh\\necho tool \"$@\"\\n' > \"$GOBIN/gofumpt\"\nchmod +x \"$GOBIN/gofumpt\"\n",
                log = log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&go, std::fs::Permissions::from_mode(0o755)).unwrap();

        let go_runner = GoRunner::new()
            .with_exec(&go)
            .with_search_paths(SearchPaths::default());
        let runner = GotoolRunner::new(go_runner)
            .with_cache(true)
            .with_tools_bin_dir(&tools);

        assert_eq!(runner.run_output(&gofumpt()).unwrap(), "tool -l .");
        assert_eq!(runner.run_output(&gofumpt()).unwrap(), "tool -l .");

        let installs = std::fs::read_to_string(&log).unwrap();
        assert_eq!(installs.trim(), "mvdan.cc/gofumpt@v0.1.1");
        assert!(tools.join("gofumpt/0.1.1/gofumpt").is_file());
    }
}
