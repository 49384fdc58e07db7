use crate::error::{Error, Result};
use crate::project::SemVer;

use super::{Repository, VcsKind, VcsVersion};

/// A project without version control, its version is the default version.
#[derive(Debug, Clone)]
pub struct NoneRepository {
    default_version: String,
    version: Option<VcsVersion>,
}

impl NoneRepository {
    pub fn new(default_version: impl Into<String>) -> Self {
        Self {
            default_version: default_version.into(),
            version: None,
        }
    }
}

impl Repository for NoneRepository {
    fn kind(&self) -> VcsKind {
        VcsKind::None
    }

    fn derive_version(&mut self) -> Result<()> {
        if self.default_version.trim().is_empty() {
            return Err(Error::invalid_options(
                "version",
                "default version must not be empty",
            ));
        }
        let version = SemVer::parse(&self.default_version)?;
        self.version = Some(VcsVersion::from_version(version));
        Ok(())
    }

    fn version(&self) -> Option<&VcsVersion> {
        self.version.as_ref()
    }
}
