//! Git repositories read through the `git` command line client

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::ToolCommand;
use crate::error::{Error, Result};

use super::describe::{CommitHistory, TagRef, derive_version};
use super::{Repository, VcsKind, VcsVersion};

/// Default name of the `git` executable.
pub const DEFAULT_GIT_EXEC: &str = "git";

const TAG_FORMAT: &str = "--format=%(refname:short)%09%(objectname)%09%(*objectname)";

/// Commit history reader backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    exec: PathBuf,
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            exec: PathBuf::from(DEFAULT_GIT_EXEC),
            repo_dir: repo_dir.into(),
        }
    }

    pub fn with_exec(mut self, exec: impl Into<PathBuf>) -> Self {
        self.exec = exec.into();
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn git<I, S>(&self, args: I) -> ToolCommand
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolCommand::new(&self.exec)
            .with_args(["-C".to_string(), self.repo_dir.to_string_lossy().into_owned()])
            .with_args(args)
    }

    fn read(&self, cmd: ToolCommand) -> Result<String> {
        cmd.run_output("git").map_err(|e| {
            Error::Git(format!(
                "{} in {}: {e}",
                cmd.to_shell_command(),
                self.repo_dir.display()
            ))
        })
    }

    /// Hash of the commit HEAD points at, `None` when there are no commits.
    ///
    /// With `--verify --quiet` an unborn HEAD exits with 1, every other
    /// failure (not a repository, unsafe ownership ...) is an error.
    pub fn head(&self) -> Result<Option<String>> {
        let cmd = self.git(["rev-parse", "--verify", "--quiet", "HEAD^{commit}"]);
        match cmd.run_output("git") {
            Ok(hash) if !hash.is_empty() => Ok(Some(hash)),
            Ok(_) | Err(Error::Execution { code: Some(1), .. }) => Ok(None),
            Err(e) => Err(Error::Git(format!(
                "{} in {}: {e}",
                cmd.to_shell_command(),
                self.repo_dir.display()
            ))),
        }
    }
}

impl CommitHistory for GitCli {
    fn commits_from_head(&self) -> Result<Vec<String>> {
        if self.head()?.is_none() {
            return Ok(Vec::new());
        }
        let out = self.read(self.git(["rev-list", "HEAD"]))?;
        Ok(out.lines().map(str::to_string).collect())
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let out = self.read(self.git(["for-each-ref", TAG_FORMAT, "refs/tags"]))?;
        Ok(out.lines().filter_map(parse_tag_line).collect())
    }
}

/// Parse `<name>\t<object>\t<peeled object>`, the peeled object is empty for
/// lightweight tags.
fn parse_tag_line(line: &str) -> Option<TagRef> {
    let mut fields = line.split('\t');
    let name = fields.next().filter(|n| !n.is_empty())?;
    let object = fields.next().filter(|o| !o.is_empty())?;
    let commit = match fields.next() {
        Some(peeled) if !peeled.is_empty() => peeled,
        _ => object,
    };
    Some(TagRef::new(name, commit))
}

/// A project versioned in a Git repository.
#[derive(Debug)]
pub struct GitRepository {
    default_version: String,
    path: PathBuf,
    history: Box<dyn CommitHistoryDebug>,
    version: Option<VcsVersion>,
}

/// Object safe combination used to keep readers printable.
pub trait CommitHistoryDebug: CommitHistory + std::fmt::Debug {}

impl<T: CommitHistory + std::fmt::Debug> CommitHistoryDebug for T {}

impl GitRepository {
    /// Repository at `path` read through the `git` executable.
    pub fn new(path: impl Into<PathBuf>, default_version: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            history: Box::new(GitCli::new(&path)),
            default_version: default_version.into(),
            path,
            version: None,
        }
    }

    /// Repository read through a custom history reader.
    pub fn with_history<H>(mut self, history: H) -> Self
    where
        H: CommitHistory + std::fmt::Debug + 'static,
    {
        self.history = Box::new(history);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Repository for GitRepository {
    fn kind(&self) -> VcsKind {
        VcsKind::Git
    }

    fn derive_version(&mut self) -> Result<()> {
        debug!("Deriving version from git repository {}", self.path.display());
        let version = derive_version(&self.default_version, self.history.as_ref())?;
        self.version = Some(version);
        Ok(())
    }

    fn version(&self) -> Option<&VcsVersion> {
        self.version.as_ref()
    }
}
