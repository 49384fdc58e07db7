//! Version derivation from commit history, an approximation of `git describe`
//!
//! Starting at HEAD the history is walked commit by commit until the first
//! commit carrying a semantic version tag is found. When that commit is HEAD
//! itself the tag version is used as is, otherwise build metadata
//! `<commits-ahead>.<short-hash>` is appended. Tags that are not semantic
//! versions are ignored and a history without any version tag yields the
//! default version.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::project::SemVer;

use super::VcsVersion;

/// Number of hex characters of the HEAD hash used in build metadata.
pub const SHORT_HASH_LEN: usize = 8;

/// A tag and the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    pub name: String,
    /// Hash of the target commit, annotated tags are peeled
    pub commit: String,
}

impl TagRef {
    pub fn new(name: impl Into<String>, commit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: commit.into(),
        }
    }
}

/// Read access to the commit graph of a repository.
pub trait CommitHistory {
    /// Hashes of all commits reachable from HEAD, HEAD first, in the order
    /// they should be visited. Empty for a repository without commits.
    fn commits_from_head(&self) -> Result<Vec<String>>;

    /// All tags of the repository.
    fn tags(&self) -> Result<Vec<TagRef>>;
}

struct VersionTag {
    name: String,
    version: SemVer,
}

/// Index semantic version tags by commit. When several tags point at the
/// same commit the highest version wins.
fn index_version_tags(tags: Vec<TagRef>) -> HashMap<String, VersionTag> {
    let mut index: HashMap<String, VersionTag> = HashMap::new();
    for tag in tags {
        let Ok(version) = SemVer::parse(&tag.name) else {
            debug!("Ignoring non-semver tag {}", tag.name);
            continue;
        };
        let candidate = VersionTag {
            name: tag.name,
            version,
        };
        match index.get(&tag.commit) {
            Some(existing) if existing.version >= candidate.version => {}
            _ => {
                index.insert(tag.commit, candidate);
            }
        }
    }
    index
}

/// Derive the version of the commit at HEAD.
pub fn derive_version<H>(default_version: &str, history: &H) -> Result<VcsVersion>
where
    H: CommitHistory + ?Sized,
{
    if default_version.trim().is_empty() {
        return Err(Error::invalid_options(
            "version",
            "default version must not be empty",
        ));
    }
    let default = SemVer::parse(default_version)?;

    let commits = history.commits_from_head()?;
    let Some(head) = commits.first().cloned() else {
        debug!("Repository has no commits, using default version {}", default);
        return Ok(VcsVersion::from_version(default));
    };

    let version_tags = index_version_tags(history.tags()?);
    let nearest = commits
        .iter()
        .enumerate()
        .find_map(|(distance, commit)| version_tags.get(commit).map(|tag| (distance, tag)));

    let Some((distance, tag)) = nearest else {
        debug!("No version tag reachable from {}, using default version {}", head, default);
        return Ok(VcsVersion {
            version: default,
            commits_ahead: 0,
            commit_hash: Some(head),
            latest_version_tag: None,
        });
    };

    let version = if distance == 0 {
        tag.version.clone()
    } else {
        let short_hash = head.get(..SHORT_HASH_LEN).unwrap_or(&head);
        let describe = format!("{distance}.{short_hash}");
        let metadata = match tag.version.build_metadata() {
            "" => describe,
            existing => format!("{existing}-{describe}"),
        };
        tag.version.with_build_metadata(&metadata)?
    };

    debug!(
        "Derived version {} from tag {} ({} commits ahead)",
        version, tag.name, distance
    );

    Ok(VcsVersion {
        version,
        commits_ahead: distance,
        commit_hash: Some(head),
        latest_version_tag: Some(tag.name.clone()),
    })
}
