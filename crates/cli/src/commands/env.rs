use anyhow::{Context as _, Result};
use wand_core::task::golang::env::EnvTask;

use super::{Context, report_command};

pub fn env_command(ctx: &Context, vars: Vec<String>, json: bool) -> Result<()> {
    let elder = ctx.elder()?;

    let task = EnvTask::new().with_json_output(json).with_env_vars(vars);
    let cmd = elder
        .go_env(task)
        .context("Failed to print the Go environment")?;
    report_command(&elder, &cmd);
    Ok(())
}
