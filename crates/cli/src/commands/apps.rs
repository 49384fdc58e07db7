use anyhow::{Context as _, Result};
use wand_core::AppConfig;

use super::Context;

pub fn apps_command(ctx: &Context, json: bool) -> Result<()> {
    let elder = ctx.elder()?;

    if json {
        let apps: Vec<&AppConfig> = elder.apps().iter().collect();
        let output =
            serde_json::to_string_pretty(&apps).context("Failed to serialize applications")?;
        println!("{output}");
        return Ok(());
    }

    for app in elder.apps().iter() {
        println!(
            "{}\t{}\t{}",
            app.name,
            app.path_rel.display(),
            app.pkg_import_path
        );
    }

    Ok(())
}
