//! Tasks describe a single command of an external tool
//!
//! A task only knows which parameters and environment variables a command
//! needs. Locating and spawning the executable is the job of a
//! [`Runner`](crate::runners::Runner) that handles the task's [`TaskKind`].

pub mod clean;
pub mod gofumpt;
pub mod goimports;
pub mod golang;
pub mod golangci_lint;
pub mod go_mod_upgrade;
pub mod gox;
pub mod pkger;

use std::fmt;

use crate::error::Result;
use crate::project::GoModuleId;
use crate::utils::env::EnvMap;

/// Kind of a task, used by runners to decide whether they can run it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Logic implemented in the library itself
    Base,
    /// A command of an executable
    Exec,
    /// A command of an executable built from a Go module
    GoModule,
}

crate::impl_kind_names!(
    TaskKind,
    Base => "base",
    Exec => "executable",
    GoModule => "go.module"
);

/// A unit of work.
pub trait Task {
    fn name(&self) -> &str;

    fn kind(&self) -> TaskKind;
}

/// A task run by an executable.
pub trait ExecTask: Task {
    /// Parameters passed to the executable.
    fn build_params(&self) -> Vec<String>;

    /// Environment variables applied on top of the runner environment.
    fn env(&self) -> EnvMap;

    /// Access to the module information of Go module tasks.
    fn as_go_module(&self) -> Option<&dyn GoModuleTask> {
        None
    }
}

/// A task run by an executable that is built from a Go module.
pub trait GoModuleTask: ExecTask {
    fn id(&self) -> &GoModuleId;
}

/// Composable modification of task options of type `O`.
pub trait Mixin<O>: fmt::Debug {
    fn apply(&self, options: &mut O) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(TaskKind::Exec.to_string(), "executable");
        assert_eq!(TaskKind::GoModule.as_str(), "go.module");
        assert_eq!("Go.Module".parse::<TaskKind>().unwrap(), TaskKind::GoModule);
        assert_eq!(
            serde_json::to_string(&TaskKind::Base).unwrap(),
            "\"base\""
        );
        assert!("unknown".parse::<TaskKind>().is_err());
    }
}
