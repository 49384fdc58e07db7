use anyhow::{Context as _, Result};
use tracing::debug;
use wand_core::task::golang::build::BuildOptions;
use wand_core::task::golang::{GoOptions, StripDebugMetadata};
use wand_core::task::gox::GoxOptions;

use super::{Context, report_command};

pub fn build_command(
    ctx: &Context,
    app: &str,
    strip: bool,
    trimpath: bool,
    tags: Vec<String>,
) -> Result<()> {
    let elder = ctx.elder()?;

    let mut go_options = GoOptions::new().with_trim_path(trimpath).with_tags(tags);
    if strip {
        go_options = go_options.with_mixin(StripDebugMetadata);
    }
    debug!("Building {} with {:?}", app, go_options);

    let cmd = elder
        .go_build(app, BuildOptions::new().with_go_options(go_options))
        .with_context(|| format!("Failed to build {app}"))?;
    report_command(&elder, &cmd);
    Ok(())
}

pub fn cross_command(ctx: &Context, app: &str, platforms: Vec<String>) -> Result<()> {
    let elder = ctx.elder()?;

    let options = GoxOptions::new()
        .with_cross_compile_target_platforms(platforms)
        .with_go_options(GoOptions::new().with_trim_path(true))
        .with_verbose_output(true);

    let cmd = elder
        .gox(app, options)
        .with_context(|| format!("Failed to cross compile {app}"))?;
    report_command(&elder, &cmd);
    Ok(())
}
