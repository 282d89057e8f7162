//! delete command - Delete a registered version
//!
//! # Gating
//!
//! Deletion is only permitted for a version whose detail has been disclosed
//! in the current session (`vd show` first). The confirmation prompt warns
//! that deleting version 1 removes the entire lineage.

use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::{registry, require_login, Session};
use crate::actions::{ActionOrchestrator, DeleteError};
use crate::api::ListQuery;
use crate::cli::Context;
use crate::core::pagination::Pager;
use crate::core::types::FileHash;
use crate::lookup::ListFetcher;
use crate::ui::{output, prompts};

/// Delete the version identified by `hash`.
pub fn delete(ctx: &Context, hash: &str, force: bool) -> Result<()> {
    let hash = FileHash::new(hash)?;
    let mut session = Session::open()?;
    require_login(&session)?;

    let detail = session
        .store
        .disclosed(&hash)
        .ok_or_else(|| {
            anyhow!("deletion requires a disclosed detail; run `vd show {}` first", hash)
        })?
        .clone();

    if !force {
        let warning = if detail.version == 1 {
            format!(
                "delete '{}' ({})? this is version 1, so the ENTIRE lineage is removed",
                detail.file_name,
                hash.short(12),
            )
        } else {
            format!(
                "delete '{}' v{} ({})?",
                detail.file_name,
                detail.version,
                hash.short(12),
            )
        };
        let confirmed = prompts::confirm(&warning, false, ctx.interactive)?;
        if !confirmed {
            output::print("aborted", ctx.verbosity);
            return Ok(());
        }
    }

    let api = registry(ctx, &session);
    let fetcher = Arc::new(ListFetcher::new(Arc::clone(&api), Pager::default()));
    let orchestrator = ActionOrchestrator::new(Arc::clone(&api), fetcher);

    let rt = tokio::runtime::Runtime::new()?;
    let deleted =
        rt.block_on(orchestrator.delete(&mut session.store, &hash, &ListQuery::default()));
    deleted.map_err(|e| match e {
        DeleteError::Unauthorized => session.expire(),
        DeleteError::NotDisclosed => {
            anyhow!("deletion requires a disclosed detail; run `vd show {hash}` first")
        }
        DeleteError::Failed(message) => anyhow!(message),
    })?;

    // The cached detail for the deleted version is gone; persist that.
    session.save(ctx);
    output::success(format!("deleted '{}'", detail.file_name), ctx.verbosity);
    Ok(())
}
