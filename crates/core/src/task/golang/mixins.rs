//! Reusable adjustments of [`GoOptions`]

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::project::GoModuleId;
use crate::task::Mixin;

use super::GoOptions;

/// Disable optimizations and inlining for all packages to improve the
/// debugging experience.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImproveDebugging;

impl Mixin<GoOptions> for ImproveDebugging {
    fn apply(&self, options: &mut GoOptions) -> Result<()> {
        options.flags_prefix_all = true;
        options.gc_flags.extend(["-N".to_string(), "-l".to_string()]);
        Ok(())
    }
}

/// Print the compiler's escape analysis decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImproveEscapeAnalysis;

impl Mixin<GoOptions> for ImproveEscapeAnalysis {
    fn apply(&self, options: &mut GoOptions) -> Result<()> {
        options.flags_prefix_all = false;
        options.gc_flags.extend(["-m".to_string(), "-m".to_string()]);
        Ok(())
    }
}

/// Set values of string variables at link time, e.g. a version number.
///
/// Keys are package-relative variable paths like `pkg/config.Version`, they
/// are prefixed with the module path.
#[derive(Debug, Clone, Default)]
pub struct InjectBuildTimeVariableValues {
    pub data: BTreeMap<String, String>,
    pub go_module: Option<GoModuleId>,
}

impl InjectBuildTimeVariableValues {
    pub fn new(go_module: GoModuleId) -> Self {
        Self {
            data: BTreeMap::new(),
            go_module: Some(go_module),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

impl Mixin<GoOptions> for InjectBuildTimeVariableValues {
    fn apply(&self, options: &mut GoOptions) -> Result<()> {
        let module = self.go_module.as_ref().ok_or_else(|| {
            Error::invalid_options("inject build time variable values", "module path is required")
        })?;

        options.ld_flags.extend(
            self.data
                .iter()
                .map(|(key, value)| format!("-X {}/{}={}", module.path, key, value)),
        );
        Ok(())
    }
}

/// Omit the symbol table and DWARF debug information.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripDebugMetadata;

impl Mixin<GoOptions> for StripDebugMetadata {
    fn apply(&self, options: &mut GoOptions) -> Result<()> {
        options.flags_prefix_all = true;
        options.ld_flags.extend(["-s".to_string(), "-w".to_string()]);
        Ok(())
    }
}
