//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Map `ApiError::Unauthorized` to the uniform session-expiry exit
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! workflow modules ([`crate::lookup`], [`crate::disclosure`],
//! [`crate::actions`]); command handlers never talk to the wire directly,
//! only through the [`crate::api::RegistryApi`] trait.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::config::ClientConfig;
use crate::ui::output::Verbosity;
use anyhow::{Context as _, Result};

/// Execution context shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output verbosity from the global flags.
    pub verbosity: Verbosity,
    /// Interactive mode enabled.
    pub interactive: bool,
    /// Loaded client configuration.
    pub config: ClientConfig,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config = ClientConfig::load().context("failed to load configuration")?;
    let ctx = Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        interactive: cli.interactive(),
        config,
    };

    commands::dispatch(cli.command, &ctx)
}
