use std::fmt;
use std::path::Path;

use crate::error::{Error, ProjectErrorKind, Result};

use super::SemVer;

/// Version query for the latest available module version.
pub const GO_MODULE_VERSION_LATEST: &str = "latest";

/// Separator between a module path and its version query.
pub const GO_MODULE_VERSION_SEPARATOR: char = '@';

/// Identifier of a Go module, a path and an optional semantic version.
///
/// See <https://golang.org/ref/mod> for details about Go modules.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoModuleId {
    pub path: String,
    pub version: Option<SemVer>,
    /// Use the latest version regardless of `version`
    pub is_latest: bool,
}

impl GoModuleId {
    /// Module pinned to `version`.
    pub fn new(path: impl Into<String>, version: SemVer) -> Self {
        Self {
            path: path.into(),
            version: Some(version),
            is_latest: false,
        }
    }

    /// Module resolved to its latest version.
    pub fn latest(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: None,
            is_latest: true,
        }
    }

    /// Pinned module parsed from a version string like `v1.32.0`.
    pub fn pinned(path: impl Into<String>, version: &str) -> Result<Self> {
        Ok(Self::new(path, SemVer::parse(version)?))
    }

    /// Name of the executable built from the module's main package.
    pub fn exec_name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(&self.path)
    }

    /// The pinned version, `None` when the latest version is used.
    pub fn pinned_version(&self) -> Option<&SemVer> {
        if self.is_latest {
            None
        } else {
            self.version.as_ref()
        }
    }

    /// Parse an import path with an optional version query, e.g.
    /// `golang.org/x/tools/cmd/goimports@v0.1.0`.
    pub fn from_import_path(import_path: &str) -> Result<Self> {
        let (path, query) = match import_path.split_once(GO_MODULE_VERSION_SEPARATOR) {
            Some((path, query)) => (path, Some(query)),
            None => (import_path, None),
        };

        if path.is_empty() {
            return Err(Error::project(
                ProjectErrorKind::DetermineGoModule,
                format!("invalid import path: {import_path:?}"),
            ));
        }

        match query {
            None | Some(GO_MODULE_VERSION_LATEST) => Ok(Self::latest(path)),
            Some(version) => {
                let version = SemVer::parse(version).map_err(|e| {
                    Error::project(
                        ProjectErrorKind::DetermineGoModule,
                        format!("parse version from import path {import_path:?}: {e}"),
                    )
                })?;
                Ok(Self::new(path, version))
            }
        }
    }

    /// Read the module path from the `module` directive of a `go.mod` file.
    pub fn from_go_mod(go_mod: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(go_mod).map_err(|e| {
            Error::project(
                ProjectErrorKind::DetermineGoModule,
                format!("read {}: {e}", go_mod.display()),
            )
        })?;

        contents
            .lines()
            .map(|line| line.split("//").next().unwrap_or("").trim())
            .find_map(|line| line.strip_prefix("module"))
            .map(|rest| rest.trim().trim_matches('"'))
            .filter(|path| !path.is_empty())
            .map(Self::latest)
            .ok_or_else(|| {
                Error::project(
                    ProjectErrorKind::DetermineGoModule,
                    format!("no module directive in {}", go_mod.display()),
                )
            })
    }
}

impl fmt::Display for GoModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pinned_version() {
            Some(version) => write!(f, "{}@{}", self.path, version.original()),
            None => write!(f, "{}@{}", self.path, GO_MODULE_VERSION_LATEST),
        }
    }
}
