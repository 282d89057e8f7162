//! auth commands - signup, login, logout
//!
//! Login stores the session cookie in the per-user data directory; logout
//! ends the session on both sides. Logout is best-effort server-side: the
//! local session is destroyed even when the server call fails, because a
//! dead token is worth nothing.

use anyhow::{anyhow, Result};

use super::{registry, Session};
use crate::cli::Context;
use crate::ui::{output, prompts};

/// Create an account on the registry.
pub fn signup(ctx: &Context, email: Option<&str>) -> Result<()> {
    let email = resolve_email(ctx, email)?;
    let password = prompts::password("password", ctx.interactive)?;
    let confirmed = prompts::password("confirm password", ctx.interactive)?;
    if password != confirmed {
        return Err(anyhow!("passwords do not match"));
    }

    let session = Session::open()?;
    let api = registry(ctx, &session);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(api.signup(&email, &password))
        .map_err(|e| anyhow!(e.to_string()))?;

    output::success(
        format!("account created for {email}; run `vd login` to sign in"),
        ctx.verbosity,
    );
    Ok(())
}

/// Sign in and store the session locally.
pub fn login(ctx: &Context, email: Option<&str>) -> Result<()> {
    let email = resolve_email(ctx, email)?;
    let password = prompts::password("password", ctx.interactive)?;

    let mut session = Session::open()?;
    let api = registry(ctx, &session);

    let rt = tokio::runtime::Runtime::new()?;
    let response = rt
        .block_on(api.login(&email, &password))
        .map_err(|e| anyhow!(e.to_string()))?;

    if response.token.is_none() {
        return Err(anyhow!("login succeeded but no session cookie was issued"));
    }

    // A fresh login discards any previous session, grants included.
    session.store.begin(response.token, response.is_admin);
    session.save(ctx);

    let role = if response.is_admin {
        "administrator"
    } else {
        "user"
    };
    output::success(format!("logged in as {email} ({role})"), ctx.verbosity);
    Ok(())
}

/// End the session locally and server-side.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut session = Session::open()?;
    if !session.store.is_logged_in() {
        output::print("not logged in", ctx.verbosity);
        return Ok(());
    }

    let api = registry(ctx, &session);
    let rt = tokio::runtime::Runtime::new()?;
    if let Err(e) = rt.block_on(api.logout()) {
        output::debug(format!("server-side logout failed: {e}"), ctx.verbosity);
    }

    session.store.clear();
    session.file.remove()?;
    output::success("logged out", ctx.verbosity);
    Ok(())
}

fn resolve_email(ctx: &Context, email: Option<&str>) -> Result<String> {
    match email {
        Some(e) if !e.trim().is_empty() => Ok(e.trim().to_string()),
        _ => {
            let entered = prompts::input("email", None, ctx.interactive)?;
            if entered.is_empty() {
                Err(anyhow!("an email address is required"))
            } else {
                Ok(entered)
            }
        }
    }
}
