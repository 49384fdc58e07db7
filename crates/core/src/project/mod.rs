//! Project metadata
//!
//! A project is the Go module a wand configuration is written for. Its
//! metadata (names, root and output directories, module identifier and the
//! version derived from the version control system) parameterizes the tasks
//! that are run for it.

pub mod go_module;
pub mod vcs;
mod version;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, ProjectErrorKind, Result};

pub use go_module::{GO_MODULE_VERSION_LATEST, GO_MODULE_VERSION_SEPARATOR, GoModuleId};
pub use vcs::{Repository, VcsKind, VcsVersion};
pub use version::SemVer;

/// Default output directory for artifacts, relative to the project root.
pub const DEFAULT_BASE_OUTPUT_DIR: &str = "out";

/// Default project version used when no version can be derived.
pub const DEFAULT_VERSION: &str = "v0.0.0";

/// Directory for wand data like cached tools, relative to the project root.
pub const DEFAULT_CACHE_DIR: &str = ".wand";

/// Name of the Go module definition file.
pub const GO_MOD_FILE_NAME: &str = "go.mod";

/// Options to create [`Project`] metadata.
#[derive(Debug)]
pub struct ProjectOptions {
    pub name: Option<String>,
    pub display_name: Option<String>,
    /// Output directory relative to the root directory
    pub base_output_dir: PathBuf,
    pub default_version: String,
    /// Defaults to the module declared in `<root>/go.mod`
    pub go_module: Option<GoModuleId>,
    /// Defaults to the current working directory
    pub root_dir: Option<PathBuf>,
    pub vcs_kind: VcsKind,
    /// Overrides the repository constructed for `vcs_kind`
    pub repository: Option<Box<dyn Repository>>,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            name: None,
            display_name: None,
            base_output_dir: PathBuf::from(DEFAULT_BASE_OUTPUT_DIR),
            default_version: DEFAULT_VERSION.to_string(),
            go_module: None,
            root_dir: None,
            vcs_kind: VcsKind::default(),
            repository: None,
        }
    }
}

impl ProjectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_base_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_output_dir = dir.into();
        self
    }

    pub fn with_default_version(mut self, version: impl Into<String>) -> Self {
        self.default_version = version.into();
        self
    }

    pub fn with_go_module(mut self, module: GoModuleId) -> Self {
        self.go_module = Some(module);
        self
    }

    pub fn with_root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(dir.into());
        self
    }

    pub fn with_vcs_kind(mut self, kind: VcsKind) -> Self {
        self.vcs_kind = kind;
        self
    }

    pub fn with_repository(mut self, repository: Box<dyn Repository>) -> Self {
        self.vcs_kind = repository.kind();
        self.repository = Some(repository);
        self
    }
}

/// Metadata of a project.
#[derive(Debug)]
pub struct Project {
    name: String,
    display_name: String,
    base_output_dir: PathBuf,
    default_version: String,
    go_module: GoModuleId,
    root_dir: PathBuf,
    repository: Box<dyn Repository>,
}

impl Project {
    /// Create project metadata and derive the project version.
    pub fn new(options: ProjectOptions) -> Result<Self> {
        if options.base_output_dir.is_absolute() {
            return Err(Error::project(
                ProjectErrorKind::PathNotRelative,
                format!(
                    "base output directory {:?} must be relative to the project root",
                    options.base_output_dir
                ),
            ));
        }

        let root_dir = resolve_root_dir(options.root_dir.as_deref())?;

        let go_module = match options.go_module {
            Some(module) => module,
            None => GoModuleId::from_go_mod(&root_dir.join(GO_MOD_FILE_NAME))?,
        };

        let name = match options.name {
            Some(name) => name,
            None => root_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| go_module.exec_name().to_string()),
        };
        let display_name = options.display_name.unwrap_or_else(|| name.clone());

        let mut repository: Box<dyn Repository> = match options.repository {
            Some(repository) => repository,
            None => match options.vcs_kind {
                VcsKind::Git => Box::new(vcs::GitRepository::new(
                    &root_dir,
                    options.default_version.clone(),
                )),
                VcsKind::None => Box::new(vcs::NoneRepository::new(
                    options.default_version.clone(),
                )),
            },
        };

        repository
            .derive_version()
            .map_err(|e| Error::project(ProjectErrorKind::DeriveVcsInformation, e.to_string()))?;

        debug!(
            "Created project {} ({}) at {}",
            name,
            go_module,
            root_dir.display()
        );

        Ok(Self {
            name,
            display_name,
            base_output_dir: options.base_output_dir,
            default_version: options.default_version,
            go_module,
            root_dir,
            repository,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Output directory relative to the root directory.
    pub fn base_output_dir(&self) -> &Path {
        &self.base_output_dir
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.root_dir.join(&self.base_output_dir)
    }

    pub fn default_version(&self) -> &str {
        &self.default_version
    }

    pub fn go_module(&self) -> &GoModuleId {
        &self.go_module
    }

    /// Absolute root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn vcs_kind(&self) -> VcsKind {
        self.repository.kind()
    }

    pub fn repository(&self) -> &dyn Repository {
        self.repository.as_ref()
    }

    pub fn vcs_version(&self) -> Option<&VcsVersion> {
        self.repository.version()
    }

    /// The derived project version, falls back to the default version.
    pub fn version(&self) -> Result<SemVer> {
        match self.repository.version() {
            Some(derived) => Ok(derived.version.clone()),
            None => SemVer::parse(&self.default_version),
        }
    }

    /// Directory for wand data of this project.
    pub fn cache_dir(&self) -> PathBuf {
        self.root_dir.join(DEFAULT_CACHE_DIR)
    }
}

fn resolve_root_dir(root_dir: Option<&Path>) -> Result<PathBuf> {
    let dir = match root_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| Error::project(ProjectErrorKind::DetectRootDir, e.to_string()))?,
    };

    dir.canonicalize().map_err(|e| {
        Error::project(
            ProjectErrorKind::DetectRootDir,
            format!("{}: {e}", dir.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::vcs::GitRepository;
    use crate::project::vcs::describe::tests::FakeHistory;
    use tempfile::TempDir;

    fn module() -> GoModuleId {
        GoModuleId::latest("github.com/svengreb/fruit-mixer")
    }

    #[test]
    fn test_defaults() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(module()),
        )
        .unwrap();

        let root = dir.path().canonicalize().unwrap();
        assert_eq!(project.root_dir(), root);
        assert_eq!(project.output_dir(), root.join("out"));
        assert_eq!(project.name(), root.file_name().unwrap().to_str().unwrap());
        assert_eq!(project.display_name(), project.name());
        assert_eq!(project.vcs_kind(), VcsKind::None);
        assert_eq!(project.version().unwrap().to_string(), "0.0.0");
    }

    #[test]
    fn test_module_read_from_go_mod() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("go.mod"),
            "module github.com/svengreb/fruit-mixer\n\ngo 1.16\n",
        )
        .unwrap();

        let project = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_name("fruit-mixer")
                .with_display_name("Fruit Mixer"),
        )
        .unwrap();
        assert_eq!(project.go_module().path, "github.com/svengreb/fruit-mixer");
        assert_eq!(project.display_name(), "Fruit Mixer");
    }

    #[test]
    fn test_missing_go_mod() {
        let dir = TempDir::new().unwrap();
        let err = Project::new(ProjectOptions::new().with_root_dir(dir.path())).unwrap_err();
        assert!(matches!(
            err,
            Error::Project {
                kind: ProjectErrorKind::DetermineGoModule,
                ..
            }
        ));
    }

    #[test]
    fn test_absolute_output_dir_is_rejected() {
        let dir = TempDir::new().unwrap();
        let err = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(module())
                .with_base_output_dir(dir.path().join("out")),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Project {
                kind: ProjectErrorKind::PathNotRelative,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_root_dir() {
        let dir = TempDir::new().unwrap();
        let err = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path().join("missing"))
                .with_go_module(module()),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Project {
                kind: ProjectErrorKind::DetectRootDir,
                ..
            }
        ));
    }

    #[test]
    fn test_version_from_repository() {
        let dir = TempDir::new().unwrap();
        let repository = GitRepository::new(dir.path(), DEFAULT_VERSION)
            .with_history(FakeHistory::linear(4).tag("v0.5.0", 1));
        let project = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(module())
                .with_repository(Box::new(repository)),
        )
        .unwrap();

        assert_eq!(project.vcs_kind(), VcsKind::Git);
        assert_eq!(project.vcs_version().unwrap().commits_ahead, 2);
        assert!(project.version().unwrap().to_string().starts_with("0.5.0+2."));
    }

    #[test]
    fn test_invalid_default_version_fails_derivation() {
        let dir = TempDir::new().unwrap();
        let err = Project::new(
            ProjectOptions::new()
                .with_root_dir(dir.path())
                .with_go_module(module())
                .with_default_version("unknown"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Project {
                kind: ProjectErrorKind::DeriveVcsInformation,
                ..
            }
        ));
    }
}
