//! Removal of project paths like output directories

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::AppConfig;
use crate::error::{Error, Result};
use crate::project::Project;
use crate::task::{Task, TaskKind};
use crate::utils::fs::{is_sub_dir, node_exists, normalize_path};

pub const TASK_NAME: &str = "fs/clean";

#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Refuse paths outside the application output directory
    pub limit_to_app_output_dir: bool,
    /// Paths relative to the project root
    pub paths: Vec<PathBuf>,
}

impl CleanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit_to_app_output_dir(mut self, limit: bool) -> Self {
        self.limit_to_app_output_dir = limit;
        self
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }
}

/// Remove files and directories of a project.
#[derive(Debug, Clone)]
pub struct CleanTask {
    app_output_dir: PathBuf,
    root_dir: PathBuf,
    options: CleanOptions,
}

impl CleanTask {
    pub fn new(project: &Project, app: &AppConfig, options: CleanOptions) -> Self {
        Self {
            app_output_dir: project.root_dir().join(&app.base_output_dir),
            root_dir: project.root_dir().to_path_buf(),
            options,
        }
    }

    fn check(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Err(Error::invalid_options(
                TASK_NAME,
                format!("path {path:?} must be relative to the project root"),
            ));
        }
        if !is_sub_dir(&self.root_dir, path) {
            return Err(Error::invalid_options(
                TASK_NAME,
                format!("{path:?} is not a subdirectory of {:?}", self.root_dir),
            ));
        }

        let abs = self.root_dir.join(path);
        if normalize_path(&abs) == normalize_path(&self.root_dir) {
            return Err(Error::invalid_options(
                TASK_NAME,
                format!("{path:?} is the project root directory"),
            ));
        }
        if self.options.limit_to_app_output_dir && !is_sub_dir(&self.app_output_dir, &abs) {
            return Err(Error::invalid_options(
                TASK_NAME,
                format!("{abs:?} is not a subdirectory of {:?}", self.app_output_dir),
            ));
        }
        Ok(abs)
    }

    /// Configured paths that exist, after checking all of them.
    pub fn existing_paths(&self) -> Result<Vec<PathBuf>> {
        let mut existing = Vec::new();
        for path in &self.options.paths {
            let abs = self.check(path)?;
            if node_exists(&abs)? {
                existing.push(path.clone());
            } else {
                debug!("Skipping non-existent path {}", abs.display());
            }
        }
        Ok(existing)
    }

    /// Remove all configured paths and return the ones that existed.
    ///
    /// No path is removed when one of them is not allowed. Stops at the first
    /// path that can not be removed, paths removed until then stay removed.
    pub fn clean(&self) -> Result<Vec<PathBuf>> {
        let cleaned = self.existing_paths()?;

        for path in &cleaned {
            let abs = self.root_dir.join(path);
            let meta = std::fs::symlink_metadata(&abs)?;
            if meta.is_dir() {
                std::fs::remove_dir_all(&abs)?;
            } else {
                std::fs::remove_file(&abs)?;
            }
            info!("Removed {}", abs.display());
        }

        Ok(cleaned)
    }
}

impl Task for CleanTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{GoModuleId, ProjectOptions};
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Project, AppConfig) {
        let dir = TempDir::new().unwrap();
        let project = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(GoModuleId::latest("github.com/svengreb/fruit-mixer")),
        )
        .unwrap();
        let app = AppConfig::new(&project, "cli", None, "cmd/cli").unwrap();

        fs::create_dir_all(dir.path().join("out/cmd/cli/test")).unwrap();
        fs::write(dir.path().join("out/cmd/cli/cli"), "bin").unwrap();
        fs::write(dir.path().join("coverage.txt"), "cov").unwrap();
        (dir, project, app)
    }

    #[test]
    fn test_clean_removes_existing_paths() {
        let (dir, project, app) = setup();
        let options = CleanOptions::new().with_paths(["out", "coverage.txt", "missing"]);

        let cleaned = CleanTask::new(&project, &app, options).clean().unwrap();
        assert_eq!(cleaned, vec![PathBuf::from("out"), PathBuf::from("coverage.txt")]);
        assert!(!dir.path().join("out").exists());
        assert!(!dir.path().join("coverage.txt").exists());
    }

    #[test]
    fn test_clean_limited_to_app_output_dir() {
        let (dir, project, app) = setup();

        let options = CleanOptions::new()
            .with_limit_to_app_output_dir(true)
            .with_paths(["out/cmd/cli/test"]);
        let cleaned = CleanTask::new(&project, &app, options).clean().unwrap();
        assert_eq!(cleaned.len(), 1);
        assert!(dir.path().join("out/cmd/cli/cli").exists());

        let options = CleanOptions::new()
            .with_limit_to_app_output_dir(true)
            .with_paths(["coverage.txt"]);
        let err = CleanTask::new(&project, &app, options).clean().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        assert!(dir.path().join("coverage.txt").exists());
    }

    #[test]
    fn test_clean_refuses_project_root() {
        let (dir, project, app) = setup();

        for root in [".", "out/..", "cmd/cli/../.."] {
            let options = CleanOptions::new().with_paths(["coverage.txt", root]);
            let err = CleanTask::new(&project, &app, options).clean().unwrap_err();
            assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
        }
        assert!(dir.path().join("out/cmd/cli/cli").exists());
        assert!(dir.path().join("coverage.txt").exists());
    }

    #[test]
    fn test_clean_checks_all_paths_first() {
        let (dir, project, app) = setup();
        let options = CleanOptions::new().with_paths(["coverage.txt", "../elsewhere"]);
        let task = CleanTask::new(&project, &app, options);

        assert!(task.existing_paths().is_err());
        assert!(task.clean().is_err());
        assert!(dir.path().join("coverage.txt").exists());
    }

    #[test]
    fn test_clean_refuses_paths_outside_project() {
        let (_dir, project, app) = setup();
        for path in ["../elsewhere", "/tmp"] {
            let options = CleanOptions::new().with_paths([path]);
            assert!(CleanTask::new(&project, &app, options).clean().is_err(), "{path}");
        }
    }
}
