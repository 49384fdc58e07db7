//! Core traits for the runner architecture

use std::path::Path;

use crate::command::ToolCommand;
use crate::error::{Error, Result};
use crate::task::{ExecTask, GoModuleTask, TaskKind};

/// Runs tasks of a single [`TaskKind`] with a located executable.
pub trait Runner {
    /// Get the name of this runner
    fn name(&self) -> &str;

    /// The kind of tasks this runner is able to run
    fn handles(&self) -> TaskKind;

    /// Ensure the executable of this runner can be found.
    ///
    /// A successful validation may replace a configured executable name with
    /// the resolved path.
    fn validate(&mut self) -> Result<()>;

    /// Compose the command for `task` without running anything.
    fn command(&self, task: &dyn ExecTask) -> Result<ToolCommand>;

    /// Run `task` and return the command that was executed.
    fn run(&self, task: &dyn ExecTask) -> Result<ToolCommand> {
        let cmd = self.command(task)?;
        cmd.run(task.name())?;
        Ok(cmd)
    }

    /// Run `task` and capture its standard output.
    fn run_output(&self, task: &dyn ExecTask) -> Result<String> {
        self.command(task)?.run_output(task.name())
    }
}

/// A runner backed by a single executable.
pub trait ExecRunner: Runner {
    /// Name or path of the executable, a path after successful validation
    fn exec(&self) -> &Path;
}

/// Reject tasks of another kind than the runner handles.
pub(crate) fn ensure_kind(runner: &dyn Runner, task: &dyn ExecTask) -> Result<()> {
    if task.kind() != runner.handles() {
        return Err(Error::UnsupportedTaskKind {
            runner: runner.name().to_string(),
            expected: runner.handles().to_string(),
            actual: task.kind().to_string(),
        });
    }
    Ok(())
}

/// Access the module information of a task handled by a Go module runner.
pub(crate) fn go_module_task<'a>(
    runner: &dyn Runner,
    task: &'a dyn ExecTask,
) -> Result<&'a dyn GoModuleTask> {
    ensure_kind(runner, task)?;
    task.as_go_module().ok_or_else(|| Error::UnsupportedTaskKind {
        runner: runner.name().to_string(),
        expected: TaskKind::GoModule.to_string(),
        actual: task.kind().to_string(),
    })
}
