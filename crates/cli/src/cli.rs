use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{
    Context, apps_command, bootstrap_command, build_command, clean_command, cross_command,
    env_command, fmt_command, init_command, lint_command, test_command, validate_command,
    version_command,
};

#[derive(Parser, Debug)]
#[command(name = "wand")]
#[command(version, about, long_about = None, propagate_version = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// Path to the configuration file (defaults to the nearest wand.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Specify the current working directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Print the commands without executing them
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a wand.json configuration for the project
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
    /// List the registered applications
    Apps {
        /// Print in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Print the project version derived from the version control system
    Version {
        /// Show the commit distance and hash too
        #[arg(short, long)]
        verbose: bool,
    },
    /// Check that the executables of all runners can be found
    Validate,
    /// Install the executables the runners depend on
    Bootstrap,
    /// Compile an application with `go build`
    #[command(visible_alias = "b")]
    Build {
        /// Name of the application
        app: String,

        /// Strip debug metadata from the executable
        #[arg(long)]
        strip: bool,

        /// Remove file system paths from the executable
        #[arg(long)]
        trimpath: bool,

        /// Build tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Run tests with `go test`
    #[command(visible_alias = "t")]
    Test {
        /// Name of the application (defaults to the project)
        app: Option<String>,

        /// Write a coverage profile to the test output directory
        #[arg(long)]
        coverage: bool,

        /// Enable the data race detector
        #[arg(long)]
        race: bool,

        /// Include tests guarded by the integration build tag
        #[arg(long)]
        integration: bool,

        /// Packages to test (defaults to all packages of the application)
        #[arg(long = "pkg")]
        pkgs: Vec<String>,
    },
    /// Lint with golangci-lint
    Lint {
        /// Name of the application (defaults to the project)
        app: Option<String>,

        /// Enable verbose output of the linter
        #[arg(short, long)]
        verbose: bool,
    },
    /// Format Go source files with goimports or gofumpt
    Fmt {
        /// Name of the application (defaults to the project)
        app: Option<String>,

        /// List non-compliant files instead of rewriting them
        #[arg(long)]
        check: bool,

        /// Use gofumpt instead of goimports
        #[arg(long)]
        gofumpt: bool,
    },
    /// Cross compile an application with gox
    Cross {
        /// Name of the application
        app: String,

        /// Target platforms in `os/arch` format
        #[arg(short, long = "platform")]
        platforms: Vec<String>,
    },
    /// Remove output files of an application
    Clean {
        /// Name of the application (defaults to the project)
        app: Option<String>,

        /// Paths relative to the project root (defaults to the output directory)
        #[arg(short, long = "path")]
        paths: Vec<PathBuf>,
    },
    /// Print Go environment information
    Env {
        /// Variables to print
        vars: Vec<String>,

        /// Print in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        let ctx = Context::new(self.config, self.cwd, self.dry_run);

        match self.command {
            Commands::Init { force } => init_command(&ctx, force),
            Commands::Apps { json } => apps_command(&ctx, json),
            Commands::Version { verbose } => version_command(&ctx, verbose),
            Commands::Validate => validate_command(&ctx),
            Commands::Bootstrap => bootstrap_command(&ctx),
            Commands::Build {
                app,
                strip,
                trimpath,
                tags,
            } => build_command(&ctx, &app, strip, trimpath, tags),
            Commands::Test {
                app,
                coverage,
                race,
                integration,
                pkgs,
            } => test_command(&ctx, app.as_deref(), coverage, race, integration, pkgs),
            Commands::Lint { app, verbose } => lint_command(&ctx, app.as_deref(), verbose),
            Commands::Fmt {
                app,
                check,
                gofumpt,
            } => fmt_command(&ctx, app.as_deref(), check, gofumpt),
            Commands::Cross { app, platforms } => cross_command(&ctx, &app, platforms),
            Commands::Clean { app, paths } => clean_command(&ctx, app.as_deref(), paths),
            Commands::Env { vars, json } => env_command(&ctx, vars, json),
        }
    }
}
