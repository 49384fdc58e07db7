use std::path::PathBuf;

use anyhow::{Context as _, Result};
use wand_core::task::clean::CleanOptions;

use super::{Context, app_config};

pub fn clean_command(ctx: &Context, app: Option<&str>, paths: Vec<PathBuf>) -> Result<()> {
    let elder = ctx.elder()?;
    let app = app_config(&elder, app)?;

    // Without explicit paths only the output directory of the app is removed
    let options = if paths.is_empty() {
        CleanOptions::new()
            .with_limit_to_app_output_dir(true)
            .with_paths([app.base_output_dir.clone()])
    } else {
        CleanOptions::new().with_paths(paths)
    };

    let cleaned = elder
        .clean(&app.name, options)
        .with_context(|| format!("Failed to clean {}", app.name))?;

    let verb = if elder.is_dry_run() { "Would remove" } else { "Removed" };
    if cleaned.is_empty() {
        println!("Nothing to clean");
    }
    for path in cleaned {
        println!("🧹 {verb} {}", path.display());
    }
    Ok(())
}
