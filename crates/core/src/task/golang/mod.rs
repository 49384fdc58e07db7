//! Tasks for the `go` command and the options shared by them

pub mod build;
pub mod env;
pub mod install;
pub mod mixins;
pub mod run;

use std::sync::Arc;

use tracing::warn;

use crate::task::Mixin;
use crate::utils::env::EnvMap;

pub use mixins::{
    ImproveDebugging, ImproveEscapeAnalysis, InjectBuildTimeVariableValues, StripDebugMetadata,
};

/// Environment variable controlling the module-aware mode of the `go` command.
pub const ENV_VAR_GO111MODULE: &str = "GO111MODULE";

/// Environment variable for the directory `go install` places executables in.
pub const ENV_VAR_GOBIN: &str = "GOBIN";

/// Environment variable for default flags of the `go` command.
pub const ENV_VAR_GOFLAGS: &str = "GOFLAGS";

/// Environment variable for the Go workspace.
pub const ENV_VAR_GOPATH: &str = "GOPATH";

/// Name of the executable directory within `GOPATH`.
pub const GOBIN_SUB_DIR_NAME: &str = "bin";

/// A mixin that can be shared between option sets.
pub type GoMixin = Arc<dyn Mixin<GoOptions> + Send + Sync>;

/// Options of the `go` command shared by the build and test tasks.
#[derive(Debug, Clone, Default)]
pub struct GoOptions {
    pub asm_flags: Vec<String>,
    pub enable_race_detector: bool,
    pub enable_trim_path: bool,
    pub env: EnvMap,
    /// Additional flags appended after all other options
    pub flags: Vec<String>,
    /// Apply asm, gc and ld flags to all packages, e.g. `-gcflags=all=...`
    pub flags_prefix_all: bool,
    pub gc_flags: Vec<String>,
    pub ld_flags: Vec<String>,
    pub mixins: Vec<GoMixin>,
    pub tags: Vec<String>,
}

impl GoOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asm_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.asm_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_race_detector(mut self, enable: bool) -> Self {
        self.enable_race_detector = enable;
        self
    }

    pub fn with_trim_path(mut self, enable: bool) -> Self {
        self.enable_trim_path = enable;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_flags_prefix_all(mut self, prefix_all: bool) -> Self {
        self.flags_prefix_all = prefix_all;
        self
    }

    pub fn with_gc_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gc_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_ld_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ld_flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn with_mixin<M>(mut self, mixin: M) -> Self
    where
        M: Mixin<GoOptions> + Send + Sync + 'static,
    {
        self.mixins.push(Arc::new(mixin));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Returns the options with all mixins applied in order.
    ///
    /// A mixin that fails leaves the options untouched and is skipped.
    pub fn resolve(&self) -> GoOptions {
        let mut resolved = self.clone();
        resolved.mixins.clear();

        for mixin in &self.mixins {
            let mut candidate = resolved.clone();
            match mixin.apply(&mut candidate) {
                Ok(()) => resolved = candidate,
                Err(e) => warn!("Skipping mixin {:?}: {}", mixin, e),
            }
        }

        resolved
    }
}

fn compiler_flag(name: &str, values: &[String], prefix_all: bool) -> String {
    let scope = if prefix_all { "=all" } else { "" };
    format!("-{name}{scope}={}", values.join(" "))
}

/// Render `options` with its mixins applied as `go` command parameters.
pub fn build_go_options(options: &GoOptions) -> Vec<String> {
    let opts = options.resolve();
    let mut args = Vec::new();

    if !opts.tags.is_empty() {
        args.push(format!("-tags={}", opts.tags.join(",")));
    }

    if opts.enable_race_detector {
        args.push("-race".to_string());
    }

    if opts.enable_trim_path {
        args.push("-trimpath".to_string());
    }

    for (name, values) in [
        ("asmflags", &opts.asm_flags),
        ("gcflags", &opts.gc_flags),
        ("ldflags", &opts.ld_flags),
    ] {
        if !values.is_empty() {
            args.push(compiler_flag(name, values, opts.flags_prefix_all));
        }
    }

    args.extend(opts.flags);
    args
}
