use anyhow::{Context as _, Result};
use tracing::info;
use wand_core::config::{CONFIG_FILE_NAMES, ProjectConfig};
use wand_core::project::GO_MOD_FILE_NAME;
use wand_core::{GoModuleId, VcsKind, WandConfig};

use super::Context;

pub fn init_command(ctx: &Context, force: bool) -> Result<()> {
    let project_root = ctx
        .cwd()?
        .canonicalize()
        .context("Failed to canonicalize project root")?;
    let config_path = project_root.join(CONFIG_FILE_NAMES[0]);

    if config_path.exists() && !force {
        println!("❌ Config already exists at: {}", config_path.display());
        println!("   Use --force to overwrite");
        return Ok(());
    }

    let go_mod = project_root.join(GO_MOD_FILE_NAME);
    let module = GoModuleId::from_go_mod(&go_mod)
        .with_context(|| format!("Failed to read the module path from {}", go_mod.display()))?;
    info!("Detected Go module {}", module.path);

    let vcs = project_root
        .join(".git")
        .exists()
        .then(|| VcsKind::Git.to_string());

    let config = WandConfig {
        project: ProjectConfig {
            name: Some(module.exec_name().to_string()),
            module: Some(module.path.clone()),
            vcs,
            ..Default::default()
        },
        ..Default::default()
    };

    config
        .save_to_file(&config_path)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    println!("✅ Created config: {}", config_path.display());
    Ok(())
}
