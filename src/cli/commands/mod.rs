//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Drives the workflow modules against the HTTP registry
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Every networked command is async because it involves HTTP I/O. Handlers
//! stay sync at the dispatch boundary and run their async bodies on a local
//! `tokio` runtime.
//!
//! # Session expiry
//!
//! An `ApiError::Unauthorized` from any endpoint is handled uniformly here:
//! the session store is cleared, the session file removed, and the command
//! exits non-zero with guidance to log in again. No command handles 401
//! differently.

mod auth;
mod completion;
mod delete;
mod list;
mod register;
mod show;
mod verify;

pub use auth::{login, logout, signup};
pub use completion::completion;
pub use delete::delete;
pub use list::list;
pub use register::register;
pub use show::show;
pub use verify::verify;

use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::Context;
use crate::api::http::HttpRegistry;
use crate::api::{ApiError, RegistryApi};
use crate::cli::args::Command;
use crate::session::{SessionFile, SessionStore};
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Signup { email } => auth::signup(ctx, email.as_deref()),
        Command::Login { email } => auth::login(ctx, email.as_deref()),
        Command::Logout => auth::logout(ctx),
        Command::List {
            sort,
            query,
            from,
            to,
            page,
            admin,
        } => list::list(ctx, &sort, &query, &from, &to, page, admin),
        Command::Register {
            file,
            update,
            password,
        } => register::register(ctx, &file, update.as_deref(), password.as_deref()),
        Command::Verify { file, original } => verify::verify(ctx, &file, original.as_deref()),
        Command::Show { hash, open } => show::show(ctx, &hash, open),
        Command::Delete { hash, force } => delete::delete(ctx, &hash, force),
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// The on-disk session handle plus its loaded store.
pub(crate) struct Session {
    pub file: SessionFile,
    pub store: SessionStore,
}

impl Session {
    /// Open the per-user session, empty when none was saved.
    pub fn open() -> Result<Self> {
        let file = SessionFile::default_location()?;
        let store = file.load();
        Ok(Self { file, store })
    }

    /// Persist the store; failures are reported as warnings, not errors.
    pub fn save(&self, ctx: &Context) {
        if let Err(e) = self.file.save(&self.store) {
            output::warn(format!("could not save session: {e}"), ctx.verbosity);
        }
    }

    /// Apply the uniform 401 rule: clear and remove the session, then
    /// return the error that makes the command exit non-zero.
    pub fn expire(&mut self) -> anyhow::Error {
        self.store.clear();
        let _ = self.file.remove();
        anyhow!("session expired; run `vd login` to sign in again")
    }

    /// Fold an API error into the command result, applying the 401 rule.
    pub fn fail(&mut self, err: ApiError) -> anyhow::Error {
        match err {
            ApiError::Unauthorized => self.expire(),
            other => anyhow!(other.to_string()),
        }
    }
}

/// Build the HTTP registry for the configured base URL and session.
pub(crate) fn registry(ctx: &Context, session: &Session) -> Arc<dyn RegistryApi> {
    Arc::new(HttpRegistry::new(
        ctx.config.api_base(),
        session.store.token().map(str::to_string),
    ))
}

/// Require a logged-in session before a networked command runs.
pub(crate) fn require_login(session: &Session) -> Result<()> {
    if session.store.is_logged_in() {
        Ok(())
    } else {
        Err(anyhow!("not logged in; run `vd login` first"))
    }
}
