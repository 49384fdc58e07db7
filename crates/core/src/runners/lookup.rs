//! Executable lookup
//!
//! An executable is resolved in this order:
//!
//! 1. the configured name or path, when it is an existing regular file
//! 2. the directories of the `PATH` environment variable
//! 3. the Go executable directory, `GOBIN` or else `$GOPATH/bin`

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::task::golang::{ENV_VAR_GOBIN, ENV_VAR_GOPATH, GOBIN_SUB_DIR_NAME};
use crate::utils::fs::regular_file_exists;

/// Directories searched for executables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    pub path_dirs: Vec<PathBuf>,
    /// Directory `go install` places executables in
    pub go_bin_dir: Option<PathBuf>,
}

impl SearchPaths {
    /// Search paths of the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var_os("PATH"),
            env::var_os(ENV_VAR_GOBIN),
            env::var_os(ENV_VAR_GOPATH),
        )
    }

    pub fn from_vars(
        path: Option<OsString>,
        gobin: Option<OsString>,
        gopath: Option<OsString>,
    ) -> Self {
        let path_dirs = path
            .map(|p| {
                env::split_paths(&p)
                    .filter(|d| !d.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let go_bin_dir = gobin
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .or_else(|| {
                gopath
                    .and_then(|p| env::split_paths(&p).find(|d| !d.as_os_str().is_empty()))
                    .map(|d| d.join(GOBIN_SUB_DIR_NAME))
            });

        Self {
            path_dirs,
            go_bin_dir,
        }
    }

    /// Find `name` in the `PATH` directories.
    pub fn find_in_path(&self, name: &str) -> Result<Option<PathBuf>> {
        for dir in &self.path_dirs {
            if let Some(found) = executable_in(dir, name)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    /// Find `name` in the Go executable directory.
    pub fn find_in_go_bin_dir(&self, name: &str) -> Result<Option<PathBuf>> {
        match self.go_bin_dir {
            Some(ref dir) => executable_in(dir, name),
            None => Ok(None),
        }
    }
}

fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut candidates = vec![dir.join(name)];
    if cfg!(windows) && Path::new(name).extension().is_none() {
        candidates.push(dir.join(format!("{name}.exe")));
    }
    candidates
}

fn executable_in(dir: &Path, name: &str) -> Result<Option<PathBuf>> {
    for candidate in candidates(dir, name) {
        if regular_file_exists(&candidate)? && is_executable(&candidate) {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve the executable of `runner`.
///
/// Bare names are searched in `PATH` and the Go executable directory, paths
/// must point to an existing regular file.
pub fn resolve_executable(runner: &str, exec: &Path, search: &SearchPaths) -> Result<PathBuf> {
    let fs_err = |e: std::io::Error| Error::validation(runner, format!("{}: {e}", exec.display()));

    if regular_file_exists(exec).map_err(fs_err)? {
        debug!("Runner {} uses executable {}", runner, exec.display());
        return Ok(exec.to_path_buf());
    }

    let is_bare_name = exec.components().count() == 1 && !exec.is_absolute();
    if let (true, Some(name)) = (is_bare_name, exec.to_str()) {
        let found = match search.find_in_path(name) {
            Ok(None) => search.find_in_go_bin_dir(name),
            other => other,
        }
        .map_err(|e| Error::validation(runner, e.to_string()))?;
        if let Some(found) = found {
            debug!("Runner {} resolved {} to {}", runner, name, found.display());
            return Ok(found);
        }
    }

    Err(Error::validation(
        runner,
        format!(
            "{:?} not found in PATH or Go executable directory {:?}",
            exec,
            search.go_bin_dir.as_deref().unwrap_or(Path::new(""))
        ),
    ))
}
