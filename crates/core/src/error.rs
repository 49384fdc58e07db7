use std::fmt;
use std::io;

/// Broad category an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or empty options, malformed configuration files.
    Configuration,
    /// A runner could not locate or accept its executable.
    Validation,
    /// A wrapped process failed to start or exited unsuccessfully.
    Execution,
    /// Project metadata could not be assembled.
    Project,
    /// Application registration or lookup failed.
    App,
    /// Filesystem failure outside of the categories above.
    Io,
}

/// Reason a project could not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectErrorKind {
    DeriveVcsInformation,
    DetectRootDir,
    DetermineGoModule,
    PathNotRelative,
}

impl fmt::Display for ProjectErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DeriveVcsInformation => "failed to derive VCS version information",
            Self::DetectRootDir => "failed to detect project root directory path",
            Self::DetermineGoModule => "failed to determine Go module information",
            Self::PathNotRelative => "path is not relative",
        };
        f.write_str(msg)
    }
}

/// Reason an application could not be registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorKind {
    EmptyName,
    PathNotRelative,
    NotProjectSubDir,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::EmptyName => "application name must not be empty",
            Self::PathNotRelative => "path is not relative",
            Self::NotProjectSubDir => "path is not a subdirectory of the project root",
        };
        f.write_str(msg)
    }
}

/// Errors that can occur during wand operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid options for {name:?}: {reason}")]
    InvalidOptions { name: String, reason: String },

    #[error("runner {runner:?} does not handle {actual:?} tasks, expected {expected:?}")]
    UnsupportedTaskKind {
        runner: String,
        expected: String,
        actual: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid version {input:?}: {reason}")]
    Version { input: String, reason: String },

    #[error("runner {runner:?} validation failed: {reason}")]
    Validation { runner: String, reason: String },

    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("task {task:?} failed with {}", exit_description(.code))]
    Execution { task: String, code: Option<i32> },

    #[error("project error: {kind}: {reason}")]
    Project {
        kind: ProjectErrorKind,
        reason: String,
    },

    #[error("Git error: {0}")]
    Git(String),

    #[error("no configuration found for application with name {0:?}")]
    AppNotFound(String),

    #[error("application error: {kind}: {reason}")]
    App { kind: AppErrorKind, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOptions { .. }
            | Self::UnsupportedTaskKind { .. }
            | Self::ConfigError(_)
            | Self::Version { .. }
            | Self::SerializationError(_) => ErrorKind::Configuration,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Spawn { .. } | Self::Execution { .. } => ErrorKind::Execution,
            Self::Project { .. } | Self::Git(_) => ErrorKind::Project,
            Self::AppNotFound(_) | Self::App { .. } => ErrorKind::App,
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_options(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOptions {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(runner: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            runner: runner.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn project(kind: ProjectErrorKind, reason: impl Into<String>) -> Self {
        Self::Project {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn app(kind: AppErrorKind, reason: impl Into<String>) -> Self {
        Self::App {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result type alias for wand operations
pub type Result<T> = std::result::Result<T, Error>;
