use crate::task::{ExecTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "go/env";

/// Print Go environment information with `go env`.
#[derive(Debug, Clone, Default)]
pub struct EnvTask {
    pub enable_json_output: bool,
    pub env: EnvMap,
    /// Variables to print, all when empty
    pub env_vars: Vec<String>,
    pub extra_args: Vec<String>,
}

impl EnvTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json_output(mut self, enable: bool) -> Self {
        self.enable_json_output = enable;
        self
    }

    pub fn with_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars.extend(vars.into_iter().map(Into::into));
        self
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl Task for EnvTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Exec
    }
}

impl ExecTask for EnvTask {
    fn build_params(&self) -> Vec<String> {
        let mut params = vec!["env".to_string()];
        if self.enable_json_output {
            params.push("-json".to_string());
        }
        params.extend(self.extra_args.iter().cloned());
        params.extend(self.env_vars.iter().cloned());
        params
    }

    fn env(&self) -> EnvMap {
        self.env.clone()
    }
}
