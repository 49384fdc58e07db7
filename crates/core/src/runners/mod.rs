//! Runners locate, validate and execute the executables of tasks
//!
//! Every runner handles exactly one [`TaskKind`]: [`GoRunner`] runs commands
//! of the `go` executable while [`GotoolRunner`] and [`GobinRunner`] run
//! executables built from Go modules.

pub mod gobin;
pub mod golang;
pub mod gotool;
pub mod lookup;
pub mod traits;

pub use gobin::GobinRunner;
pub use golang::GoRunner;
pub use gotool::GotoolRunner;
pub use lookup::{SearchPaths, resolve_executable};
pub use traits::{ExecRunner, Runner};

use crate::command::ToolCommand;
use crate::error::Result;
use crate::task::{ExecTask, TaskKind};

/// Kind of the runner used for Go module tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleRunnerKind {
    #[default]
    Gotool,
    Gobin,
}

crate::impl_kind_names!(
    ModuleRunnerKind,
    Gotool => "gotool",
    Gobin => "gobin"
);

/// The runner handling [`TaskKind::GoModule`] tasks.
#[derive(Debug, Clone)]
pub enum ModuleRunner {
    Gotool(GotoolRunner),
    Gobin(GobinRunner),
}

impl ModuleRunner {
    pub fn kind(&self) -> ModuleRunnerKind {
        match self {
            Self::Gotool(_) => ModuleRunnerKind::Gotool,
            Self::Gobin(_) => ModuleRunnerKind::Gobin,
        }
    }

    fn inner(&self) -> &dyn Runner {
        match self {
            Self::Gotool(runner) => runner,
            Self::Gobin(runner) => runner,
        }
    }
}

impl Runner for ModuleRunner {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn handles(&self) -> TaskKind {
        self.inner().handles()
    }

    fn validate(&mut self) -> Result<()> {
        match self {
            Self::Gotool(runner) => runner.validate(),
            Self::Gobin(runner) => runner.validate(),
        }
    }

    fn command(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        self.inner().command(task)
    }

    fn run(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        self.inner().run(task)
    }

    fn run_output(&self, task: &dyn ExecTask) -> Result<String> {
        self.inner().run_output(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::goimports::{GoimportsOptions, GoimportsTask};

    #[test]
    fn test_module_runner_kind_names() {
        assert_eq!(ModuleRunnerKind::default(), ModuleRunnerKind::Gotool);
        assert_eq!("gobin".parse::<ModuleRunnerKind>().unwrap(), ModuleRunnerKind::Gobin);
        assert!("mage".parse::<ModuleRunnerKind>().is_err());
    }

    #[test]
    fn test_module_runner_delegates() {
        let task = GoimportsTask::new(GoimportsOptions::new());

        let gobin = ModuleRunner::Gobin(GobinRunner::new().unwrap());
        assert_eq!(gobin.name(), "gobin");
        assert_eq!(gobin.handles(), TaskKind::GoModule);
        assert_eq!(
            gobin.command(&task).unwrap().to_shell_command(),
            "gobin -run golang.org/x/tools/cmd/goimports@latest ."
        );

        let gotool = ModuleRunner::Gotool(GotoolRunner::new(GoRunner::new()));
        assert_eq!(gotool.kind(), ModuleRunnerKind::Gotool);
        assert_eq!(
            gotool.command(&task).unwrap().to_shell_command(),
            "go run golang.org/x/tools/cmd/goimports@latest ."
        );
    }
}
