//! Version control system integration for project metadata

pub mod describe;
pub mod git;
pub mod none;

use crate::error::Result;
use crate::project::SemVer;

pub use describe::{CommitHistory, TagRef, derive_version};
pub use git::{GitCli, GitRepository};
pub use none::NoneRepository;

/// Kind of version control system a project uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VcsKind {
    #[default]
    None,
    Git,
}

crate::impl_kind_names!(
    VcsKind,
    None => "none",
    Git => "git"
);

/// Version information derived from a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsVersion {
    pub version: SemVer,
    /// Commits between HEAD and the nearest version tag
    pub commits_ahead: usize,
    /// Full hash of HEAD, `None` for repositories without commits
    pub commit_hash: Option<String>,
    /// Name of the nearest version tag
    pub latest_version_tag: Option<String>,
}

impl VcsVersion {
    pub fn from_version(version: SemVer) -> Self {
        Self {
            version,
            commits_ahead: 0,
            commit_hash: None,
            latest_version_tag: None,
        }
    }
}

/// A project repository that can provide version information.
pub trait Repository: std::fmt::Debug {
    fn kind(&self) -> VcsKind;

    /// Derive the version from the repository state.
    fn derive_version(&mut self) -> Result<()>;

    /// The derived version, `None` before [`Repository::derive_version`] ran.
    fn version(&self) -> Option<&VcsVersion>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!("GIT".parse::<VcsKind>().unwrap(), VcsKind::Git);
        assert_eq!(VcsKind::None.to_string(), "none");
        assert!("svn".parse::<VcsKind>().is_err());
    }
}
