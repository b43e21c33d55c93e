//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod check;
mod color;
mod date;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, OutputFormat, PagecheckConfig};

pub use color::ColorAction;
pub use date::DateAction;

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// pagecheck - Normalize and compare colors and dates read from web UIs
#[derive(Parser)]
#[command(name = "pagecheck")]
#[command(about = "pagecheck - Normalize and compare colors and dates read from web UIs")]
#[command(version)]
pub struct Cli {
    /// Path to pagecheck.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize and compare color values
    Color {
        #[command(subcommand)]
        action: ColorAction,
    },

    /// Parse, convert, and compare date strings
    Date {
        #[command(subcommand)]
        action: DateAction,
    },

    /// Run assertion cases from JSONL files
    Check {
        /// Case files (.jsonl)
        files: Vec<PathBuf>,

        /// Check every .jsonl file under this directory
        #[arg(long, conflicts_with = "files")]
        dir: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Stop each file at its first failing case
        #[arg(long)]
        fail_fast: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match cli.command {
        Commands::Color { action } => color::run_color(action),
        Commands::Date { action } => {
            if let Err(code) = apply_overrides(&mut config, &action.overrides()) {
                return code;
            }
            date::run_date(action, &config)
        }
        Commands::Check { files, dir, json, fail_fast } => {
            let overrides = CliOverrides {
                fail_fast: fail_fast.then_some(true),
                output: json.then_some(OutputFormat::Json),
                ..Default::default()
            };
            if let Err(code) = apply_overrides(&mut config, &overrides) {
                return code;
            }
            check::run_check(&files, dir.as_deref(), &config)
        }
    }
}

/// Merge flag overrides into `config` and validate the result.
fn apply_overrides(config: &mut PagecheckConfig, overrides: &CliOverrides) -> Result<(), ExitCode> {
    merge_cli_overrides(config, overrides);
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    for e in errors {
        eprintln!("Error: '{}' {}", e.field, e.message);
    }
    Err(ExitCode::from(EXIT_INVALID_ARGS))
}
