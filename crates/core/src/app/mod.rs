//! Applications of a project
//!
//! A project can contain multiple applications, e.g. a CLI and a server in a
//! monorepo. Each one is registered with a path relative to the project root
//! and tasks are run for a single application at a time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppErrorKind, Error, Result};
use crate::project::Project;
use crate::utils::fs::{clean_import_path, is_sub_dir, normalize_path};

/// Path of the application that is the project itself.
pub const APP_REL_PATH: &str = ".";

/// Configuration of a registered application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub display_name: String,
    /// Path relative to the project root
    pub path_rel: PathBuf,
    /// Output directory relative to the project root
    pub base_output_dir: PathBuf,
    /// Import path of the application's main package
    pub pkg_import_path: String,
}

impl AppConfig {
    /// Application configuration within `project`.
    ///
    /// The display name defaults to the name, the path must be relative and
    /// must not leave the project root.
    pub fn new(
        project: &Project,
        name: &str,
        display_name: Option<&str>,
        path_rel: impl AsRef<Path>,
    ) -> Result<Self> {
        let path_rel = path_rel.as_ref();

        if name.trim().is_empty() {
            return Err(Error::app(AppErrorKind::EmptyName, "register application"));
        }

        if path_rel.is_absolute() {
            return Err(Error::app(
                AppErrorKind::PathNotRelative,
                format!("check application path {path_rel:?}"),
            ));
        }

        if !is_sub_dir(project.root_dir(), path_rel) {
            return Err(Error::app(
                AppErrorKind::NotProjectSubDir,
                format!(
                    "{path_rel:?} is not a subdirectory of {:?}",
                    project.root_dir()
                ),
            ));
        }

        let path_rel = normalize_path(path_rel);
        let display_name = display_name
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(name);

        Ok(Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            base_output_dir: normalize_path(&project.base_output_dir().join(&path_rel)),
            pkg_import_path: clean_import_path(
                &project.go_module().path,
                &path_rel.to_string_lossy(),
            ),
            path_rel,
        })
    }
}

/// Registered applications keyed by name.
#[derive(Debug, Clone, Default)]
pub struct AppStore {
    data: BTreeMap<String, AppConfig>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an application, replacing one with the same name.
    pub fn add(&mut self, config: AppConfig) {
        self.data.insert(config.name.clone(), config);
    }

    pub fn get(&self, name: &str) -> Result<&AppConfig> {
        self.data
            .get(name)
            .ok_or_else(|| Error::AppNotFound(name.to_string()))
    }

    /// Names of all registered applications in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppConfig> {
        self.data.values()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
