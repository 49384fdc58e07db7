//! Lenient semantic versions
//!
//! Tags and module versions in the Go ecosystem are usually written with a
//! `v` prefix (`v1.32.0`) and occasionally abbreviated (`v1`, `v1.2`). They are
//! accepted here, normalized to a full `semver::Version`, while the text they
//! were parsed from is kept for rendering module queries like `path@v1.2.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV]?(\d+)(?:\.(\d+))?(?:\.(\d+))?((?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)$")
        .expect("version pattern is valid")
});

#[derive(Debug, Clone)]
pub struct SemVer {
    original: String,
    version: semver::Version,
}

impl SemVer {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: String| Error::Version {
            input: input.to_string(),
            reason,
        };

        let caps = VERSION_RE
            .captures(trimmed)
            .ok_or_else(|| invalid("not a semantic version".to_string()))?;

        let part = |idx: usize| caps.get(idx).map_or("0", |m| m.as_str());
        let normalized = format!("{}.{}.{}{}", part(1), part(2), part(3), &caps[4]);

        let version = semver::Version::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
        Ok(Self {
            original: trimmed.to_string(),
            version,
        })
    }

    /// The text this version was parsed from.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.version
    }

    /// The build metadata, empty when none is set.
    pub fn build_metadata(&self) -> &str {
        self.version.build.as_str()
    }

    /// Returns a copy whose build metadata is replaced by `metadata`.
    pub fn with_build_metadata(&self, metadata: &str) -> Result<Self> {
        let build = semver::BuildMetadata::new(metadata).map_err(|e| Error::Version {
            input: metadata.to_string(),
            reason: e.to_string(),
        })?;
        let mut version = self.version.clone();
        version.build = build;
        Ok(Self {
            original: version.to_string(),
            version,
        })
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

impl FromStr for SemVer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for SemVer {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
    }
}

impl Eq for SemVer {}

impl PartialOrd for SemVer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemVer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version.cmp(&other.version)
    }
}
