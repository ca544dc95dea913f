//! Launchpad - pre-deploy validation and git publishing
//!
//! Usage:
//!   launchpad            # Validate, commit and push (asks before pushing)
//!   launchpad --check    # Validate only
//!   launchpad --yes      # Push without asking

mod prompt;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use launchpad_core::config::{load_config, load_explicit_config};
use launchpad_core::prelude::*;
use launchpad_core::project::resolve_project_root;

use crate::prompt::TerminalGate;
use crate::render::ConsoleObserver;

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Validate a web API project and publish it to GitHub", long_about = None)]
struct Cli {
    /// Project root (default: nearest ancestor containing package.json)
    #[arg(short = 'C', long)]
    root: Option<PathBuf>,

    /// Configuration file (default: launchpad.toml in the project root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Push without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Only run the validation checks
    #[arg(long)]
    check: bool,

    /// Use the SSH remote URL instead of HTTPS
    #[arg(long)]
    ssh: bool,

    /// Skip the TypeScript type check
    #[arg(long)]
    skip_typecheck: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable progress
    #[default]
    Table,
    /// Machine-readable JSON report
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let report = run(&cli)?;
    Ok(ExitCode::from(report.exit_code()))
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<WorkflowReport> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let explicit = cli
        .config
        .as_deref()
        .map(|path| load_explicit_config(&cwd, path))
        .transpose()?;
    let manifest = discovery_manifest(explicit.as_ref().map(|(config, _)| config));
    let root = resolve_project_root(cli.root.as_deref(), &cwd, &manifest)?;
    std::env::set_current_dir(&root)
        .with_context(|| format!("Failed to enter project root {}", root.display()))?;
    tracing::debug!(root = %root.display(), "project root");

    let (mut config, source) = match explicit {
        Some(loaded) => loaded,
        None => load_config(&root, None)?,
    };
    if cli.skip_typecheck {
        config.validation.typecheck.clear();
    }

    let runner = SystemRunner::new(root.clone(), config.deploy.command_timeout());
    let options = WorkflowOptions {
        validate_only: cli.check,
        use_ssh: cli.ssh,
    };
    let workflow = Workflow::new(&root, &config, &runner, options);
    let mut gate = TerminalGate::new(cli.yes);

    match cli.format {
        OutputFormat::Table => {
            let mut observer = ConsoleObserver::stdout(config.remote.push_url(cli.ssh));
            observer.header(&root, &source);
            let report = workflow.run(&mut gate, &mut observer);
            observer.finish().context("Failed to write output")?;
            Ok(report)
        }
        OutputFormat::Json => {
            let report = workflow.run(&mut gate, &mut NoopObserver);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(report)
        }
    }
}

/// Manifest file name used to locate the project root.
fn discovery_manifest(explicit: Option<&DeployConfig>) -> String {
    explicit
        .map(|config| config.validation.manifest.clone())
        .unwrap_or_else(|| ValidationConfig::default().manifest)
}
