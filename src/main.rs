//! packsmith - Python project scaffolding and packaging.
//!
//! Recreates a project tree from a YAML configuration, writes the
//! setuptools/PyInstaller/Inno Setup files, then drives the external
//! tools to produce an executable and an installer.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use packsmith::commands;
use packsmith::config::{ProjectConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser)]
#[command(name = "packsmith")]
#[command(about = "Scaffold a Python project and package it into an installer")]
#[command(args_conflicts_with_subcommands = true)]
#[command(
    after_help = "QUICK START:\n  packsmith preflight   Check tools and inputs\n  packsmith             Scaffold and package (same as `packsmith init`)\n  packsmith show status Inspect the generated project\n  packsmith clean       Remove the project directory"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    init: InitArgs,
}

#[derive(Args)]
struct ConfigArg {
    /// Path to the configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Args)]
struct InitArgs {
    #[command(flatten)]
    config: ConfigArg,

    /// Substitute {{key}} placeholders when instantiating templates
    #[arg(long)]
    render: bool,

    /// Stop after the first failed command
    #[arg(long)]
    fail_fast: bool,

    /// Exit non-zero if any command failed
    #[arg(long)]
    strict: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold the project and run every packaging step
    Init(InitArgs),

    /// Create the project tree and templates only
    Scaffold {
        #[command(flatten)]
        config: ConfigArg,

        /// Substitute {{key}} placeholders when instantiating templates
        #[arg(long)]
        render: bool,
    },

    /// Check host tools and input files
    Preflight {
        #[command(flatten)]
        config: ConfigArg,

        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Remove the project directory
    Clean {
        #[command(flatten)]
        config: ConfigArg,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show resolved configuration and paths
    Config {
        #[command(flatten)]
        config: ConfigArg,
    },
    /// Show what exists in the project directory
    Status {
        #[command(flatten)]
        config: ConfigArg,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

/// Load the configuration or terminate the process.
///
/// This is the only fatal path before any filesystem change is made.
fn load_config(path: &Path) -> ProjectConfig {
    match ProjectConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}

fn init_options(args: &InitArgs) -> commands::InitOptions {
    commands::InitOptions {
        render: args.render,
        fail_fast: args.fail_fast,
        strict: args.strict,
        report: args.report.clone(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present, before RUST_LOG is read
    dotenvy::dotenv().ok();
    init_logging();

    match cli.command {
        None => {
            let config = load_config(&cli.init.config.config);
            commands::cmd_init(config, init_options(&cli.init))?;
        }

        Some(Commands::Init(args)) => {
            let config = load_config(&args.config.config);
            commands::cmd_init(config, init_options(&args))?;
        }

        Some(Commands::Scaffold { config, render }) => {
            let config = load_config(&config.config);
            commands::cmd_scaffold(config, render)?;
        }

        Some(Commands::Preflight { config, strict }) => {
            let config = load_config(&config.config);
            commands::cmd_preflight(&config, strict)?;
        }

        Some(Commands::Clean { config }) => {
            let config = load_config(&config.config);
            commands::cmd_clean(&config)?;
        }

        Some(Commands::Show { what }) => {
            let (target, path) = match what {
                ShowTarget::Config { config } => (commands::show::ShowTarget::Config, config.config),
                ShowTarget::Status { config } => (commands::show::ShowTarget::Status, config.config),
            };
            let config = load_config(&path);
            commands::cmd_show(&config, target)?;
        }
    }

    Ok(())
}
