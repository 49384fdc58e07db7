pub mod apps;
pub mod build;
pub mod clean;
pub mod env;
pub mod init;
pub mod lint;
pub mod project;

pub use apps::apps_command;
pub use build::{build_command, cross_command};
pub use clean::clean_command;
pub use env::env_command;
pub use init::init_command;
pub use lint::{fmt_command, lint_command};
pub use project::{bootstrap_command, validate_command, version_command};
pub use test::test_command;

use std::env as std_env;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::{debug, info};
use wand_core::{AppConfig, Elder, ElderOptions, ToolCommand, Wand, WandConfig};

/// Global options shared by all commands.
#[derive(Debug, Clone)]
pub struct Context {
    config: Option<PathBuf>,
    cwd: Option<PathBuf>,
    dry_run: bool,
}

impl Context {
    pub fn new(config: Option<PathBuf>, cwd: Option<PathBuf>, dry_run: bool) -> Self {
        Self {
            config,
            cwd,
            dry_run,
        }
    }

    pub fn cwd(&self) -> Result<PathBuf> {
        match self.cwd {
            Some(ref cwd) => Ok(cwd.clone()),
            None => std_env::current_dir().context("Failed to get current directory"),
        }
    }

    /// The configuration file given on the command line or the nearest one.
    pub fn config_path(&self) -> Result<Option<PathBuf>> {
        let cwd = self.cwd()?;
        Ok(match self.config {
            Some(ref path) => Some(cwd.join(path)),
            None => WandConfig::find_config_file(&cwd),
        })
    }

    /// Load the configuration and create the orchestrator of the project.
    ///
    /// Without a configuration file the working directory is the project root.
    pub fn elder(&self) -> Result<Elder> {
        let (config, root_dir) = match self.config_path()? {
            Some(path) => {
                debug!("Using configuration file {}", path.display());
                let config = WandConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                let root_dir = path
                    .parent()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                (config, root_dir)
            }
            None => (WandConfig::default(), self.cwd()?),
        };

        let options = ElderOptions::from_config(&config, &root_dir)
            .context("Invalid configuration")?
            .with_dry_run(self.dry_run);
        Elder::new(options).context("Failed to set up the project")
    }
}

/// The configuration of `app`, the project itself when no name is given.
pub fn app_config<'a>(elder: &'a Elder, app: Option<&str>) -> Result<&'a AppConfig> {
    let name = app.unwrap_or_else(|| elder.project_metadata().name());
    Ok(elder.app_config(name)?)
}

/// Print the command in dry-run mode, otherwise log it.
pub fn report_command(elder: &Elder, cmd: &ToolCommand) {
    if elder.is_dry_run() {
        println!("{}", cmd.to_shell_command());
    } else {
        info!("Ran: {}", cmd.to_shell_command());
    }
}
