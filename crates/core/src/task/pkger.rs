//! `pkger`, embeds static files into Go binaries
//!
//! See <https://github.com/markbates/pkger>.
//!
//! `pkger` only works from the directory of a `main` package. In monorepos the
//! project root usually has none, so a dummy file declaring `package main` is
//! placed there while the tool runs.

use std::path::{Path, PathBuf};

use crate::app::{APP_REL_PATH, AppConfig};
use crate::error::{Error, Result};
use crate::project::{GoModuleId, Project};
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::EnvMap;
use crate::utils::fs::is_sub_dir;

pub const TASK_NAME: &str = "pkger";

pub const DEFAULT_GO_MODULE_PATH: &str = "github.com/markbates/pkger/cmd/pkger";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v0.17.1";

/// Name of the dummy `main` package file without extension.
pub const MONOREPO_WORKAROUND_DUMMY_FILE_NAME: &str = "wand_task_pkger_dummy_workaround";

pub const MONOREPO_WORKAROUND_DUMMY_FILE_CONTENT: &str =
    "// Code generated by wand. DELETE THIS FILE IF NOT REMOVED AUTOMATICALLY.\npackage main";

/// Path of the dummy `main` package file in `root_dir`.
pub fn monorepo_workaround_dummy_file(root_dir: &Path) -> PathBuf {
    root_dir.join(format!("{MONOREPO_WORKAROUND_DUMMY_FILE_NAME}.go"))
}

#[derive(Debug, Clone, Default)]
pub struct PkgerOptions {
    pub env: EnvMap,
    pub extra_args: Vec<String>,
    pub go_module: Option<GoModuleId>,
    /// Paths to embed, relative to the project root
    pub include_paths_rel: Vec<String>,
}

impl PkgerOptions {
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

    pub fn with_includes<I, S>(mut self, includes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_paths_rel
            .extend(includes.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone)]
pub struct PkgerTask {
    go_module: GoModuleId,
    includes: Vec<String>,
    output_dir_rel: Option<String>,
    options: PkgerOptions,
}

impl PkgerTask {
    pub fn new(project: &Project, app: &AppConfig, options: PkgerOptions) -> Result<Self> {
        let go_module = match options.go_module.clone() {
            Some(go_module) => go_module,
            None => GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
        };

        // pkger resolves includes starting with a slash from the module root
        let includes = options
            .include_paths_rel
            .iter()
            .map(|include| {
                let path = Path::new(include);
                if path.is_absolute() {
                    return Err(Error::invalid_options(
                        TASK_NAME,
                        format!("\"include\" path is not relative: {include}"),
                    ));
                }
                if is_sub_dir(project.root_dir(), path) {
                    Ok(format!("/{}", include.trim_start_matches("./")))
                } else {
                    Ok(include.clone())
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let output_dir_rel = (app.path_rel != Path::new(APP_REL_PATH))
            .then(|| app.path_rel.to_string_lossy().into_owned());

        Ok(Self {
            go_module,
            includes,
            output_dir_rel,
            options,
        })
    }
}

impl Task for PkgerTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for PkgerTask {
    fn build_params(&self) -> Vec<String> {
        let mut params = Vec::new();
        for include in &self.includes {
            params.push("-include".to_string());
            params.push(include.clone());
        }
        if let Some(ref dir) = self.output_dir_rel {
            params.push("-o".to_string());
            params.push(dir.clone());
        }
        params.extend(self.options.extra_args.iter().cloned());
        params
    }

    fn env(&self) -> EnvMap {
        self.options.env.clone()
    }

    fn as_go_module(&self) -> Option<&dyn GoModuleTask> {
        Some(self)
    }
}

impl GoModuleTask for PkgerTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectOptions;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> Project {
        Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(GoModuleId::latest("github.com/svengreb/fruit-mixer")),
        )
        .unwrap()
    }

    #[test]
    fn test_includes_are_rooted() {
        let dir = TempDir::new().unwrap();
        let project = project(&dir);
        let app = AppConfig::new(&project, "api", None, "cmd/api").unwrap();

        let options = PkgerOptions::new().with_includes(["./web/static", "assets"]);
        let task = PkgerTask::new(&project, &app, options).unwrap();

        assert_eq!(
            task.build_params(),
            vec!["-include", "/web/static", "-include", "/assets", "-o", "cmd/api"]
        );
        assert_eq!(task.id().to_string(), "github.com/markbates/pkger/cmd/pkger@v0.17.1");
    }

    #[test]
    fn test_root_app_has_no_output_dir() {
        let dir = TempDir::new().unwrap();
        let project = project(&dir);
        let app = AppConfig::new(&project, "root", None, APP_REL_PATH).unwrap();

        let task = PkgerTask::new(&project, &app, PkgerOptions::new()).unwrap();
        assert!(task.build_params().is_empty());
    }

    #[test]
    fn test_absolute_include_is_rejected() {
        let dir = TempDir::new().unwrap();
        let project = project(&dir);
        let app = AppConfig::new(&project, "root", None, APP_REL_PATH).unwrap();

        let options = PkgerOptions::new().with_includes(["/etc"]);
        assert!(PkgerTask::new(&project, &app, options).is_err());
    }

    #[test]
    fn test_dummy_file_path() {
        assert_eq!(
            monorepo_workaround_dummy_file(Path::new("/src")),
            PathBuf::from("/src/wand_task_pkger_dummy_workaround.go")
        );
    }
}
