use std::path::Path;

use anyhow::{Context as _, Result};
use wand_core::app::APP_REL_PATH;
use wand_core::task::gofumpt::GofumptOptions;
use wand_core::task::goimports::GoimportsOptions;
use wand_core::task::golangci_lint::GolangciLintOptions;
use wand_core::{AppConfig, Wand};

use super::{Context, app_config, report_command};

/// Source paths of `app`, empty for the project itself.
fn app_paths(app: &AppConfig) -> Vec<String> {
    if app.path_rel == Path::new(APP_REL_PATH) {
        Vec::new()
    } else {
        vec![format!("./{}", app.path_rel.display())]
    }
}

pub fn lint_command(ctx: &Context, app: Option<&str>, verbose: bool) -> Result<()> {
    let elder = ctx.elder()?;
    let app = app_config(&elder, app)?;

    let mut options = GolangciLintOptions::new().with_verbose_output(verbose);
    let paths = app_paths(app);
    if !paths.is_empty() {
        let pkgs = paths.iter().map(|p| format!("{p}/..."));
        options = options.with_args(std::iter::once("run".to_string()).chain(pkgs));
    }

    let cmd = elder
        .golangci_lint(options)
        .with_context(|| format!("Linting {} failed", app.name))?;
    report_command(&elder, &cmd);
    Ok(())
}

pub fn fmt_command(ctx: &Context, app: Option<&str>, check: bool, gofumpt: bool) -> Result<()> {
    let elder = ctx.elder()?;
    let app = app_config(&elder, app)?;
    let paths = app_paths(app);

    let cmd = if gofumpt {
        let options = GofumptOptions::new()
            .with_list_non_compliant_files(check)
            .with_persisted_changes(!check)
            .with_simplify(true)
            .with_paths(paths);
        elder.gofumpt(options)
    } else {
        let module = elder.project_metadata().go_module().path.clone();
        let options = GoimportsOptions::new()
            .with_list_non_compliant_files(check)
            .with_persisted_changes(!check)
            .with_local_pkgs([module])
            .with_paths(paths);
        elder.goimports(options)
    }
    .with_context(|| format!("Formatting {} failed", app.name))?;

    report_command(&elder, &cmd);
    Ok(())
}
