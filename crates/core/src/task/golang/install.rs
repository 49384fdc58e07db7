use crate::project::GoModuleId;
use crate::task::{ExecTask, Task, TaskKind};
use crate::utils::env::EnvMap;

pub const TASK_NAME: &str = "go/install";

/// Compile and install the executable of a Go module with `go install`.
#[derive(Debug, Clone)]
pub struct InstallTask {
    env: EnvMap,
    go_module: GoModuleId,
}

impl InstallTask {
    pub fn new(go_module: GoModuleId) -> Self {
        Self {
            env: EnvMap::new(),
            go_module,
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn go_module(&self) -> &GoModuleId {
        &self.go_module
    }
}

impl Task for InstallTask {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn kind(&self) -> TaskKind {
        TaskKind::Exec
    }
}

impl ExecTask for InstallTask {
    fn build_params(&self) -> Vec<String> {
        vec!["install".to_string(), self.go_module.to_string()]
    }

    fn env(&self) -> EnvMap {
        self.env.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::golang::ENV_VAR_GOBIN;

    #[test]
    fn test_params() {
        let task = InstallTask::new(GoModuleId::pinned("github.com/mitchellh/gox", "v1.0.1").unwrap())
            .with_env(ENV_VAR_GOBIN, "/tmp/tools/gox/v1.0.1");
        assert_eq!(
            task.build_params(),
            vec!["install", "github.com/mitchellh/gox@v1.0.1"]
        );
        assert_eq!(task.env().get("GOBIN").unwrap(), "/tmp/tools/gox/v1.0.1");
    }

    #[test]
    fn test_latest_version() {
        let task = InstallTask::new(GoModuleId::latest("golang.org/x/tools/cmd/goimports"));
        assert_eq!(task.build_params()[1], "golang.org/x/tools/cmd/goimports@latest");
    }
}
