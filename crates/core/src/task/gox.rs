//! `gox`, a simple and parallel Go cross compiler
//!
//! See <https://github.com/mitchellh/gox>.

use std::path::PathBuf;

use crate::app::AppConfig;
use crate::error::Result;
use crate::project::GoModuleId;
use crate::task::golang::{ENV_VAR_GOFLAGS, GoOptions, build_go_options};
use crate::task::{ExecTask, GoModuleTask, Task, TaskKind};
use crate::utils::env::{EnvMap, merge_env};

pub const TASK_NAME: &str = "gox";

pub const DEFAULT_GO_MODULE_PATH: &str = "github.com/mitchellh/gox";

pub const DEFAULT_GO_MODULE_VERSION: &str = "v1.0.1";

/// Platforms compiled for when none are configured.
pub const DEFAULT_CROSS_COMPILE_TARGET_PLATFORMS: &[&str] =
    &["darwin/amd64", "linux/amd64", "windows/amd64"];

const TRIM_PATH_FLAG: &str = "-trimpath";

/// Output file name template, `gox` replaces the `{{.OS}}` and `{{.Arch}}`
/// placeholders for every platform.
pub fn default_cross_compile_binary_name_template(name: &str) -> String {
    format!("{name}-{{{{.OS}}}}-{{{{.Arch}}}}")
}

#[derive(Debug, Clone, Default)]
pub struct GoxOptions {
    /// Defaults to the application name
    pub binary_artifact_name: Option<String>,
    /// Defaults to [`DEFAULT_CROSS_COMPILE_TARGET_PLATFORMS`]
    pub cross_compile_target_platforms: Vec<String>,
    pub env: EnvMap,
    pub flags: Vec<String>,
    /// Path to a custom `go` executable
    pub go_cmd: Option<String>,
    pub go_module: Option<GoModuleId>,
    pub go_options: GoOptions,
    /// Defaults to the application output directory
    pub output_dir: Option<PathBuf>,
    /// Defaults to [`default_cross_compile_binary_name_template`]
    pub output_template: Option<String>,
    pub verbose: bool,
}

impl GoxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.binary_artifact_name = Some(name.into());
        self
    }

    pub fn with_cross_compile_target_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cross_compile_target_platforms
            .extend(platforms.into_iter().map(Into::into));
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

    pub fn with_go_cmd(mut self, go_cmd: impl Into<String>) -> Self {
        self.go_cmd = Some(go_cmd.into());
        self
    }

    pub fn with_go_module(mut self, go_module: GoModuleId) -> Self {
        self.go_module = Some(go_module);
        self
    }

    pub fn with_go_options(mut self, go_options: GoOptions) -> Self {
        self.go_options = go_options;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_output_template(mut self, template: impl Into<String>) -> Self {
        self.output_template = Some(template.into());
        self
    }

    pub fn with_verbose_output(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Cross compile the main package of an application.
#[derive(Debug, Clone)]
pub struct GoxTask {
    env: EnvMap,
    go_module: GoModuleId,
    params: Vec<String>,
}

impl GoxTask {
    pub fn new(app: &AppConfig, options: GoxOptions) -> Result<Self> {
        let go_module = match options.go_module.clone() {
            Some(go_module) => go_module,
            None => GoModuleId::pinned(DEFAULT_GO_MODULE_PATH, DEFAULT_GO_MODULE_VERSION)?,
        };

        let go_env = options.go_options.resolve().env;
        let mut env = merge_env(&go_env, &options.env);

        // gox does not accept -trimpath, it is passed through GOFLAGS instead
        let mut params = build_go_options(&options.go_options);
        if let Some(idx) = params.iter().position(|p| p == TRIM_PATH_FLAG) {
            params.remove(idx);
            let go_flags = [
                go_env.get(ENV_VAR_GOFLAGS),
                options.env.get(ENV_VAR_GOFLAGS),
            ]
            .into_iter()
            .flatten()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .chain(std::iter::once(TRIM_PATH_FLAG))
            .collect::<Vec<_>>()
            .join(" ");
            env.insert(ENV_VAR_GOFLAGS.to_string(), go_flags);
        }

        if options.verbose {
            params.push("-verbose".to_string());
        }

        if let Some(go_cmd) = options.go_cmd.as_deref().filter(|c| !c.is_empty()) {
            params.push(format!("-gocmd={go_cmd}"));
        }

        let platforms: Vec<String> = if options.cross_compile_target_platforms.is_empty() {
            DEFAULT_CROSS_COMPILE_TARGET_PLATFORMS
                .iter()
                .map(|p| p.to_string())
                .collect()
        } else {
            options.cross_compile_target_platforms.clone()
        };
        params.push(format!("-osarch={}", platforms.join(" ")));

        let artifact_name = options
            .binary_artifact_name
            .clone()
            .unwrap_or_else(|| app.name.clone());
        let template = options
            .output_template
            .clone()
            .unwrap_or_else(|| default_cross_compile_binary_name_template(&artifact_name));
        let output_dir = options
            .output_dir
            .clone()
            .unwrap_or_else(|| app.base_output_dir.clone());
        params.push(format!("--output={}/{}", output_dir.display(), template));

        params.extend(options.flags.iter().cloned());
        params.push(app.pkg_import_path.clone());

        Ok(Self {
            env,
            go_module,
            params,
        })
    }
}

impl Task for GoxTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::GoModule
    }
}

impl ExecTask for GoxTask {
    fn build_params(&self) -> Vec<String> {
        self.params.clone()
    }

    fn env(&self) -> EnvMap {
        self.env.clone()
    }

    fn as_go_module(&self) -> Option<&dyn GoModuleTask> {
        Some(self)
    }
}

impl GoModuleTask for GoxTask {
    fn id(&self) -> &GoModuleId {
        &self.go_module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::golang::StripDebugMetadata;

    fn app() -> AppConfig {
        AppConfig {
            name: "fruitctl".to_string(),
            display_name: "Fruit CLI".to_string(),
            path_rel: PathBuf::from("cmd/fruitctl"),
            base_output_dir: PathBuf::from("out/cmd/fruitctl"),
            pkg_import_path: "github.com/svengreb/fruit-mixer/cmd/fruitctl".to_string(),
        }
    }

    #[test]
    fn test_template() {
        assert_eq!(
            default_cross_compile_binary_name_template("fruitctl"),
            "fruitctl-{{.OS}}-{{.Arch}}"
        );
    }

    #[test]
    fn test_defaults() {
        let task = GoxTask::new(&app(), GoxOptions::new()).unwrap();
        assert_eq!(task.id().to_string(), "github.com/mitchellh/gox@v1.0.1");
        insta::assert_debug_snapshot!(task.build_params(), @r#"
        [
            "-osarch=darwin/amd64 linux/amd64 windows/amd64",
            "--output=out/cmd/fruitctl/fruitctl-{{.OS}}-{{.Arch}}",
            "github.com/svengreb/fruit-mixer/cmd/fruitctl",
        ]
        "#);
        assert!(task.env().is_empty());
    }

    #[test]
    fn test_trimpath_moves_to_goflags() {
        let options = GoxOptions::new()
            .with_go_options(
                GoOptions::new()
                    .with_trim_path(true)
                    .with_mixin(StripDebugMetadata)
                    .with_env("GOFLAGS", "-mod=readonly"),
            )
            .with_env("GOFLAGS", "-v")
            .with_verbose_output(true)
            .with_go_cmd("/usr/local/go/bin/go")
            .with_cross_compile_target_platforms(["linux/arm64"])
            .with_output_dir("out/dist");
        let task = GoxTask::new(&app(), options).unwrap();

        insta::assert_debug_snapshot!(task.build_params(), @r#"
        [
            "-ldflags=all=-s -w",
            "-verbose",
            "-gocmd=/usr/local/go/bin/go",
            "-osarch=linux/arm64",
            "--output=out/dist/fruitctl-{{.OS}}-{{.Arch}}",
            "github.com/svengreb/fruit-mixer/cmd/fruitctl",
        ]
        "#);
        assert_eq!(
            task.env().get("GOFLAGS").unwrap(),
            "-mod=readonly -v -trimpath"
        );
    }
}
