use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Output, Stdio};

use crate::error::{Error, Result};
use crate::utils::env::EnvMap;

/// A fully composed invocation of an external executable.
///
/// The environment is an overlay: the spawned process inherits the current
/// process environment and every entry of `env` replaces or adds a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: EnvMap,
    pub working_dir: Option<PathBuf>,
    /// Suppress the standard output of the process
    pub quiet: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: EnvMap::new(),
            working_dir: None,
            quiet: false,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_envs(mut self, env: &EnvMap) -> Self {
        self.env
            .extend(env.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Render the command the way it would be typed into a shell.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = quote(&self.program_name());
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&quote(arg));
        }
        cmd
    }

    fn to_process(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the process with inherited stdio and wait for it to exit.
    pub fn execute(&self) -> io::Result<ExitStatus> {
        let mut cmd = self.to_process();
        if self.quiet {
            cmd.stdout(Stdio::null());
        }
        cmd.status()
    }

    /// Run the process and capture its output.
    pub fn output(&self) -> io::Result<Output> {
        self.to_process().stdin(Stdio::null()).output()
    }

    /// Execute and map an unsuccessful exit to [`Error::Execution`].
    pub fn run(&self, task_name: &str) -> Result<()> {
        tracing::debug!("Running task {}: {}", task_name, self.to_shell_command());

        let status = self.execute().map_err(|source| Error::Spawn {
            program: self.program_name(),
            source,
        })?;

        if !status.success() {
            return Err(Error::Execution {
                task: task_name.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Execute and return the trimmed standard output.
    pub fn run_output(&self, task_name: &str) -> Result<String> {
        tracing::debug!("Running task {}: {}", task_name, self.to_shell_command());

        let output = self.output().map_err(|source| Error::Spawn {
            program: self.program_name(),
            source,
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::debug!("{} stderr: {}", task_name, stderr.trim());
            }
            return Err(Error::Execution {
                task: task_name.to_string(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() {
        "''".to_string()
    } else if arg.contains(' ') {
        format!("'{arg}'")
    } else {
        arg.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_command_quotes_spaces() {
        let cmd = ToolCommand::new("go").with_args(["build", "-gcflags=all=-N -l", "./..."]);
        assert_eq!(cmd.to_shell_command(), "go build '-gcflags=all=-N -l' ./...");
    }

    #[test]
    fn test_env_overlay_replaces_keys() {
        let mut base = EnvMap::new();
        base.insert("GOFLAGS".into(), "-mod=mod".into());
        let cmd = ToolCommand::new("go")
            .with_envs(&base)
            .with_env("GOFLAGS", "-trimpath");
        assert_eq!(cmd.env.get("GOFLAGS").map(String::as_str), Some("-trimpath"));
        assert_eq!(cmd.env.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_run_maps_exit_code() {
        let cmd = ToolCommand::new("sh").with_args(["-c", "exit 3"]);
        match cmd.run("probe") {
            Err(Error::Execution { task, code }) => {
                assert_eq!(task, "probe");
                assert_eq!(code, Some(3));
            }
            other => panic!("expected execution error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_output_captures_stdout_with_env() {
        let cmd = ToolCommand::new("sh")
            .with_args(["-c", "printf %s \"$WAND_PROBE\""])
            .with_env("WAND_PROBE", "spell");
        assert_eq!(cmd.run_output("probe").unwrap(), "spell");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = ToolCommand::new("wand-definitely-not-installed-4711");
        let err = cmd.run("probe").unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }
}
