//! cli
//!
//! Command-line interface layer for qbc.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and report config warnings
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Handlers resolve files and flags into core types
//! and call into [`crate::core`] and [`crate::render`]; no codec logic lives
//! here.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::core::config::Config;
use crate::ui::output::{self, Verbosity};
use anyhow::{Context as _, Result};

/// Execution context shared by all commands.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// Output verbosity
    pub verbosity: Verbosity,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let loaded = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    for warning in &loaded.warnings {
        output::warn(
            format!("{} ({})", warning.message, warning.path.display()),
            verbosity,
        );
    }
    if let Some(path) = loaded.config.loaded_from() {
        output::debug(format!("Loaded config from {}", path.display()), verbosity);
    }

    let ctx = Context {
        config: loaded.config,
        verbosity,
    };

    commands::dispatch(cli.command, &ctx)
}
