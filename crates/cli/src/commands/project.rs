use anyhow::{Context as _, Result};
use wand_core::Wand;

use super::{Context, report_command};

pub fn version_command(ctx: &Context, verbose: bool) -> Result<()> {
    let elder = ctx.elder()?;
    let project = elder.project_metadata();
    let version = project.version().context("Failed to determine the project version")?;

    println!("{version}");

    if verbose {
        if let Some(vcs) = project.vcs_version() {
            println!("vcs: {}", project.vcs_kind());
            if let Some(ref tag) = vcs.latest_version_tag {
                println!("tag: {tag}");
            }
            println!("commits ahead: {}", vcs.commits_ahead);
            if let Some(ref hash) = vcs.commit_hash {
                println!("commit: {hash}");
            }
        }
    }

    Ok(())
}

pub fn validate_command(ctx: &Context) -> Result<()> {
    let mut elder = ctx.elder()?;
    elder.validate().context("Runner validation failed")?;
    println!("✅ All runners are valid");
    Ok(())
}

pub fn bootstrap_command(ctx: &Context) -> Result<()> {
    let mut elder = ctx.elder()?;
    match elder.bootstrap().context("Bootstrap failed")? {
        Some(cmd) => report_command(&elder, &cmd),
        None => println!("Nothing to install"),
    }
    Ok(())
}
