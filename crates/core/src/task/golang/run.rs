use crate::project::GoModuleId;
use crate::task::{ExecTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "go/run";

/// Compile and run the main package of a Go module with `go run`.
#[derive(Debug, Clone)]
pub struct RunTask {
    args: Vec<String>,
    env: EnvMap,
    go_module: GoModuleId,
}

impl RunTask {
    pub fn new(go_module: GoModuleId) -> Self {
        Self {
            args: Vec::new(),
            env: EnvMap::new(),
            go_module,
        }
    }

    /// Arguments passed to the compiled program.
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
}

impl Task for RunTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Exec
    }
}

impl ExecTask for RunTask {
    fn build_params(&self) -> Vec<String> {
        let mut params = vec!["run".to_string(), self.go_module.to_string()];
        params.extend(self.args.iter().cloned());
        params
    }

    fn env(&self) -> EnvMap {
        self.env.clone()
    }
}
