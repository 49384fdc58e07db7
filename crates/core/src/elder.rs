//! The orchestrator of a wand project
//!
//! [`Elder`] owns the project metadata, the registered applications and the
//! runners. Every operation creates a task for an application and hands it to
//! the runner handling the task's kind.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::app::{APP_REL_PATH, AppConfig, AppStore};
use crate::command::ToolCommand;
use crate::config::{AppEntry, GoRunnerConfig, ModuleRunnerConfig, WandConfig};
use crate::error::Result;
use crate::project::{GoModuleId, Project, ProjectOptions, VcsKind};
use crate::runners::{
    GoRunner, GobinRunner, GotoolRunner, ModuleRunner, ModuleRunnerKind, Runner, SearchPaths,
};
use crate::task::clean::{CleanOptions, CleanTask};
use crate::task::go_mod_upgrade::{GoModUpgradeOptions, GoModUpgradeTask};
use crate::task::gofumpt::{GofumptOptions, GofumptTask};
use crate::task::goimports::{GoimportsOptions, GoimportsTask};
use crate::task::golang::build::{BuildOptions, BuildTask};
use crate::task::golang::env::EnvTask;
use crate::task::golang::test::{TestOptions, TestTask};
use crate::task::golangci_lint::{GolangciLintOptions, GolangciLintTask};
use crate::task::gox::{GoxOptions, GoxTask};
use crate::task::pkger::{
    MONOREPO_WORKAROUND_DUMMY_FILE_CONTENT, PkgerOptions, PkgerTask,
    monorepo_workaround_dummy_file,
};
use crate::task::ExecTask;

/// Directory of cached tool executables, relative to the project cache dir.
pub const DEFAULT_TOOLS_BIN_DIR: &str = "tools/bin";

/// Access to the project metadata and applications.
pub trait Wand {
    fn app_config(&self, name: &str) -> Result<&AppConfig>;

    fn project_metadata(&self) -> &Project;

    /// Register an application located at `path_rel` within the project.
    fn register_app(&mut self, name: &str, display_name: Option<&str>, path_rel: &str)
    -> Result<()>;
}

#[derive(Debug, Default)]
pub struct ElderOptions {
    pub project: ProjectOptions,
    /// Applications registered in addition to the project itself
    pub apps: Vec<AppEntry>,
    pub go_runner: GoRunnerConfig,
    pub module_runner: ModuleRunnerConfig,
    /// Overrides the executable search paths of the process environment
    pub search_paths: Option<SearchPaths>,
    /// Compose commands without running them
    pub dry_run: bool,
}

impl ElderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for the project in `root_dir` described by `config`.
    pub fn from_config(config: &WandConfig, root_dir: &Path) -> Result<Self> {
        let section = &config.project;
        let mut project = ProjectOptions::new().with_root_dir(root_dir);

        if let Some(ref name) = section.name {
            project = project.with_name(name);
        }
        if let Some(ref display_name) = section.display_name {
            project = project.with_display_name(display_name);
        }
        if let Some(ref output_dir) = section.output_dir {
            project = project.with_base_output_dir(output_dir);
        }
        if let Some(ref version) = section.default_version {
            project = project.with_default_version(version);
        }
        if let Some(ref module) = section.module {
            project = project.with_go_module(GoModuleId::from_import_path(module)?);
        }
        if let Some(ref vcs) = section.vcs {
            project = project.with_vcs_kind(vcs.parse::<VcsKind>()?);
        }

        Ok(Self {
            project,
            apps: config.apps.clone(),
            go_runner: config.runners.go.clone(),
            module_runner: config.runners.module.clone(),
            search_paths: None,
            dry_run: false,
        })
    }

    pub fn with_project(mut self, project: ProjectOptions) -> Self {
        self.project = project;
        self
    }

    pub fn with_go_runner(mut self, config: GoRunnerConfig) -> Self {
        self.go_runner = config;
        self
    }

    pub fn with_module_runner(mut self, config: ModuleRunnerConfig) -> Self {
        self.module_runner = config;
        self
    }

    pub fn with_search_paths(mut self, search_paths: SearchPaths) -> Self {
        self.search_paths = Some(search_paths);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Orchestrates tasks of a project and its applications.
#[derive(Debug)]
pub struct Elder {
    apps: AppStore,
    dry_run: bool,
    go_runner: GoRunner,
    module_runner: ModuleRunner,
    project: Project,
}

impl Elder {
    pub fn new(options: ElderOptions) -> Result<Self> {
        let project = Project::new(options.project)?;
        let root_dir = project.root_dir().to_path_buf();

        let mut go_runner = GoRunner::new()
            .with_env(options.go_runner.env.clone())
            .with_quiet(options.go_runner.quiet)
            .with_working_dir(&root_dir);
        if let Some(ref exec) = options.go_runner.exec {
            go_runner = go_runner.with_exec(exec);
        }
        if let Some(ref search_paths) = options.search_paths {
            go_runner = go_runner.with_search_paths(search_paths.clone());
        }

        let module_runner = build_module_runner(
            &project,
            &go_runner,
            &options.module_runner,
            options.search_paths.as_ref(),
        )?;

        let mut elder = Self {
            apps: AppStore::new(),
            dry_run: options.dry_run,
            go_runner,
            module_runner,
            project,
        };

        let name = elder.project.name().to_string();
        let display_name = elder.project.display_name().to_string();
        elder.register_app(&name, Some(&display_name), APP_REL_PATH)?;

        for app in &options.apps {
            elder.register_app(
                &app.name,
                app.display_name.as_deref(),
                &app.path.to_string_lossy(),
            )?;
        }

        Ok(elder)
    }

    pub fn apps(&self) -> &AppStore {
        &self.apps
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn go_runner(&self) -> &GoRunner {
        &self.go_runner
    }

    pub fn module_runner(&self) -> &ModuleRunner {
        &self.module_runner
    }

    fn run_exec(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        if self.dry_run {
            return self.go_runner.command(task);
        }
        self.go_runner.run(task)
    }

    fn run_module(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        if self.dry_run {
            return self.module_runner.command(task);
        }
        self.module_runner.run(task)
    }

    /// Install the executables the runners depend on.
    ///
    /// Only the `gobin` module runner needs an installation, it is installed
    /// with the Go runner when it can not be found.
    pub fn bootstrap(&mut self) -> Result<Option<ToolCommand>> {
        let ModuleRunner::Gobin(ref mut gobin) = self.module_runner else {
            return Ok(None);
        };

        if gobin.validate().is_ok() {
            debug!("{} is already installed", gobin.go_module());
            return Ok(None);
        }

        if self.dry_run {
            return Ok(Some(gobin.install_command(&self.go_runner)));
        }

        let cmd = gobin.install(&self.go_runner)?;
        gobin.validate()?;
        Ok(Some(cmd))
    }

    /// Validate all runners.
    pub fn validate(&mut self) -> Result<()> {
        self.go_runner.validate()?;
        self.module_runner.validate()
    }

    /// Remove paths of an application, returns the removed paths.
    ///
    /// In dry-run mode nothing is removed and the paths that would be
    /// removed are returned.
    pub fn clean(&self, app_name: &str, options: CleanOptions) -> Result<Vec<PathBuf>> {
        let app = self.app_config(app_name)?;
        let task = CleanTask::new(&self.project, app, options);
        if self.dry_run {
            return task.existing_paths();
        }
        task.clean()
    }

    pub fn go_build(&self, app_name: &str, options: BuildOptions) -> Result<ToolCommand> {
        let app = self.app_config(app_name)?;
        self.run_exec(&BuildTask::new(app, options))
    }

    /// Run tests of an application, creating the output directory for
    /// profiles first.
    pub fn go_test(&self, app_name: &str, options: TestOptions) -> Result<ToolCommand> {
        let app = self.app_config(app_name)?;
        let task = TestTask::new(app, options);

        if !self.dry_run {
            let output_dir = self.project.root_dir().join(task.output_dir());
            std::fs::create_dir_all(&output_dir)?;
            debug!("Created test output directory {}", output_dir.display());
        }
        self.run_exec(&task)
    }

    pub fn go_env(&self, task: EnvTask) -> Result<ToolCommand> {
        self.run_exec(&task)
    }

    pub fn goimports(&self, options: GoimportsOptions) -> Result<ToolCommand> {
        self.run_module(&GoimportsTask::new(options))
    }

    pub fn gofumpt(&self, options: GofumptOptions) -> Result<ToolCommand> {
        self.run_module(&GofumptTask::new(options)?)
    }

    pub fn golangci_lint(&self, options: GolangciLintOptions) -> Result<ToolCommand> {
        self.run_module(&GolangciLintTask::new(options)?)
    }

    /// Cross compile an application for multiple platforms.
    pub fn gox(&self, app_name: &str, options: GoxOptions) -> Result<ToolCommand> {
        let app = self.app_config(app_name)?;
        self.run_module(&GoxTask::new(app, options)?)
    }

    pub fn go_mod_upgrade(&self, options: GoModUpgradeOptions) -> Result<ToolCommand> {
        self.run_module(&GoModUpgradeTask::new(options)?)
    }

    /// Embed static assets of an application with `pkger`.
    ///
    /// A dummy `main` package file exists in the project root while `pkger`
    /// runs, it is removed afterwards even when the run fails.
    pub fn pkger(&self, app_name: &str, options: PkgerOptions) -> Result<ToolCommand> {
        let app = self.app_config(app_name)?;
        let task = PkgerTask::new(&self.project, app, options)?;

        if self.dry_run {
            return self.module_runner.command(&task);
        }

        let _dummy = DummyFile::create(monorepo_workaround_dummy_file(self.project.root_dir()))?;
        self.module_runner.run(&task)
    }
}

impl Wand for Elder {
    fn app_config(&self, name: &str) -> Result<&AppConfig> {
        self.apps.get(name)
    }

    fn project_metadata(&self) -> &Project {
        &self.project
    }

    fn register_app(
        &mut self,
        name: &str,
        display_name: Option<&str>,
        path_rel: &str,
    ) -> Result<()> {
        let app = AppConfig::new(&self.project, name, display_name, path_rel)?;
        debug!(
            "Registered application {} at {}",
            app.name,
            app.path_rel.display()
        );
        self.apps.add(app);
        Ok(())
    }
}

fn build_module_runner(
    project: &Project,
    go_runner: &GoRunner,
    config: &ModuleRunnerConfig,
    search_paths: Option<&SearchPaths>,
) -> Result<ModuleRunner> {
    match config.kind {
        ModuleRunnerKind::Gotool => {
            let tools_bin_dir = match config.tools_bin_dir {
                Some(ref dir) => project.root_dir().join(dir),
                None => project.cache_dir().join(DEFAULT_TOOLS_BIN_DIR),
            };
            Ok(ModuleRunner::Gotool(
                GotoolRunner::new(go_runner.clone())
                    .with_cache(config.cache)
                    .with_tools_bin_dir(tools_bin_dir)
                    .with_env(config.env.clone())
                    .with_quiet(config.quiet)
                    .with_working_dir(project.root_dir()),
            ))
        }
        ModuleRunnerKind::Gobin => {
            let mut runner = GobinRunner::new()?
                .with_env(config.env.clone())
                .with_quiet(config.quiet)
                .with_working_dir(project.root_dir());
            if let Some(ref exec) = config.exec {
                runner = runner.with_exec(exec);
            }
            if let Some(search_paths) = search_paths {
                runner = runner.with_search_paths(search_paths.clone());
            }
            Ok(ModuleRunner::Gobin(runner))
        }
    }
}

/// Dummy Go file removed when dropped.
struct DummyFile {
    path: PathBuf,
}

impl DummyFile {
    fn create(path: PathBuf) -> Result<Self> {
        remove_dummy_file(&path);
        std::fs::write(&path, MONOREPO_WORKAROUND_DUMMY_FILE_CONTENT)?;
        info!("Wrote pkger dummy workaround file {}", path.display());
        Ok(Self { path })
    }
}

impl Drop for DummyFile {
    fn drop(&mut self) {
        remove_dummy_file(&self.path);
    }
}

fn remove_dummy_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed pkger dummy workaround file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            warn!(
                "Failed to delete pkger dummy workaround file {}: {e}",
                path.display()
            );
            warn!("Please remove {} manually", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::error::{AppErrorKind, Error, ErrorKind};
    use crate::runners::lookup::tests::fake_executable;
    use tempfile::TempDir;

    const MODULE: &str = "github.com/svengreb/fruit-mixer";

    fn project_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("go.mod"), format!("module {MODULE}\n")).unwrap();
        std::fs::create_dir_all(dir.path().join("apps/cli")).unwrap();
        dir
    }

    fn options(dir: &TempDir) -> ElderOptions {
        ElderOptions::new()
            .with_project(ProjectOptions::new().with_root_dir(dir.path()))
            .with_search_paths(SearchPaths::default())
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_project_registered_as_app() {
        let dir = project_dir();
        let elder = Elder::new(options(&dir)).unwrap();

        let name = elder.project_metadata().name().to_string();
        let app = elder.app_config(&name).unwrap();
        assert_eq!(app.path_rel, PathBuf::from("."));
        assert_eq!(app.pkg_import_path, MODULE);
        assert_eq!(app.base_output_dir, PathBuf::from("out"));
        assert_eq!(elder.apps().len(), 1);
    }

    #[test]
    fn test_register_app() {
        let dir = project_dir();
        let mut elder = Elder::new(options(&dir)).unwrap();

        elder.register_app("cli", None, "apps/cli").unwrap();
        let app = elder.app_config("cli").unwrap();
        assert_eq!(app.display_name, "cli");
        assert_eq!(app.base_output_dir, PathBuf::from("out/apps/cli"));
        assert_eq!(app.pkg_import_path, format!("{MODULE}/apps/cli"));

        let err = elder.register_app("", None, "apps/cli").unwrap_err();
        assert!(matches!(err, Error::App { kind: AppErrorKind::EmptyName, .. }));

        let err = elder.register_app("escape", None, "../other").unwrap_err();
        assert!(matches!(
            err,
            Error::App {
                kind: AppErrorKind::NotProjectSubDir,
                ..
            }
        ));

        let err = elder.app_config("daemon").unwrap_err();
        assert!(matches!(err, Error::AppNotFound(ref name) if name == "daemon"));
    }

    #[test]
    fn test_from_config() {
        let dir = project_dir();
        let config = WandConfig {
            project: ProjectConfig {
                name: Some("fruit-mixer".to_string()),
                output_dir: Some(PathBuf::from("build")),
                ..Default::default()
            },
            apps: vec![AppEntry {
                name: "cli".to_string(),
                display_name: Some("Fruit Mixer CLI".to_string()),
                path: PathBuf::from("apps/cli"),
            }],
            ..Default::default()
        };

        let options = ElderOptions::from_config(&config, dir.path())
            .unwrap()
            .with_search_paths(SearchPaths::default());
        let elder = Elder::new(options).unwrap();
        assert_eq!(elder.apps().names(), vec!["cli", "fruit-mixer"]);
        assert_eq!(
            elder.app_config("cli").unwrap().base_output_dir,
            PathBuf::from("build/apps/cli")
        );
        assert_eq!(elder.module_runner().kind(), ModuleRunnerKind::Gotool);

        let mut config = WandConfig::default();
        config.project.vcs = Some("svn".to_string());
        let err = ElderOptions::from_config(&config, dir.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_dry_run_composes_commands() {
        let dir = project_dir();
        let mut elder = Elder::new(
            options(&dir)
                .with_go_runner(GoRunnerConfig {
                    exec: Some(PathBuf::from("/usr/local/go/bin/go")),
                    ..Default::default()
                })
                .with_dry_run(true),
        )
        .unwrap();
        elder.register_app("cli", None, "apps/cli").unwrap();

        let cmd = elder.go_build("cli", BuildOptions::new()).unwrap();
        assert_eq!(
            cmd.to_shell_command(),
            format!("/usr/local/go/bin/go build -o out/apps/cli/cli {MODULE}/apps/cli")
        );
        assert_eq!(cmd.working_dir(), Some(elder.project_metadata().root_dir()));

        elder.go_test("cli", TestOptions::new()).unwrap();
        assert!(!dir.path().join("out").exists());

        let cache = elder.project_metadata().cache_dir();
        let cmd = elder.gofumpt(GofumptOptions::new()).unwrap();
        assert_eq!(
            cmd.program,
            cache.join("tools/bin/gofumpt/0.1.1/gofumpt")
        );
        assert!(!cache.exists());

        let pkger = elder.pkger("cli", PkgerOptions::new()).unwrap();
        assert!(pkger.args.contains(&"apps/cli".to_string()));
        assert!(!monorepo_workaround_dummy_file(elder.project_metadata().root_dir()).exists());
    }

    #[test]
    fn test_clean_dry_run_keeps_files() {
        let dir = project_dir();
        std::fs::create_dir_all(dir.path().join("out/apps/cli")).unwrap();
        let elder = Elder::new(options(&dir).with_dry_run(true)).unwrap();
        let name = elder.project_metadata().name().to_string();

        let cleaned = elder
            .clean(&name, CleanOptions::new().with_paths(["out", "missing"]))
            .unwrap();
        assert_eq!(cleaned, vec![PathBuf::from("out")]);
        assert!(dir.path().join("out").exists());
    }

    #[test]
    fn test_bootstrap() {
        let dir = project_dir();
        let mut elder = Elder::new(options(&dir)).unwrap();
        assert!(elder.bootstrap().unwrap().is_none());

        let mut elder = Elder::new(
            options(&dir)
                .with_module_runner(ModuleRunnerConfig {
                    kind: ModuleRunnerKind::Gobin,
                    ..Default::default()
                })
                .with_dry_run(true),
        )
        .unwrap();
        let cmd = elder.bootstrap().unwrap().unwrap();
        assert!(cmd.to_shell_command().ends_with("get -v github.com/myitcv/gobin@v0.0.14"));

        let bin = TempDir::new().unwrap();
        fake_executable(bin.path(), "gobin");
        let mut elder = Elder::new(
            options(&dir)
                .with_module_runner(ModuleRunnerConfig {
                    kind: ModuleRunnerKind::Gobin,
                    ..Default::default()
                })
                .with_search_paths(SearchPaths {
                    path_dirs: vec![bin.path().to_path_buf()],
                    go_bin_dir: None,
                }),
        )
        .unwrap();
        assert!(elder.bootstrap().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_go_test_creates_output_dir() {
        let dir = project_dir();
        let bin = TempDir::new().unwrap();
        let go = script(bin.path(), "go", "exit 0");

        let elder = Elder::new(options(&dir).with_go_runner(GoRunnerConfig {
            exec: Some(go),
            quiet: true,
            ..Default::default()
        }))
        .unwrap();
        let name = elder.project_metadata().name().to_string();

        elder.go_test(&name, TestOptions::new()).unwrap();
        assert!(dir.path().join("out/test").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_pkger_removes_dummy_file() {
        let dir = project_dir();
        let bin = TempDir::new().unwrap();
        let dummy = monorepo_workaround_dummy_file(&dir.path().canonicalize().unwrap());
        // `go run` of the uncached gotool runner fails unless the dummy file exists
        let go = script(
            bin.path(),
            "go",
            &format!("test -f {}", dummy.display()),
        );

        let elder = Elder::new(
            options(&dir)
                .with_go_runner(GoRunnerConfig {
                    exec: Some(go.clone()),
                    ..Default::default()
                })
                .with_module_runner(ModuleRunnerConfig {
                    cache: false,
                    ..Default::default()
                }),
        )
        .unwrap();
        let name = elder.project_metadata().name().to_string();

        let cmd = elder.pkger(&name, PkgerOptions::new()).unwrap();
        assert_eq!(cmd.args[0], "run");
        assert!(!dummy.exists());

        let failing = script(bin.path(), "go-fail", "exit 1");
        let elder = Elder::new(
            options(&dir)
                .with_go_runner(GoRunnerConfig {
                    exec: Some(failing),
                    ..Default::default()
                })
                .with_module_runner(ModuleRunnerConfig {
                    cache: false,
                    ..Default::default()
                }),
        )
        .unwrap();
        let err = elder.pkger(&name, PkgerOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(!dummy.exists());
    }
}
