//! register command - Register a document, new lineage or new version
//!
//! The content hash is computed locally for display before the upload; the
//! server recomputes it and remains the authority.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};

use super::{registry, require_login, Session};
use crate::actions::{ActionError, ActionForm, ActionOrchestrator, ActiveTab, UploadMode};
use crate::api::{ListQuery, RegistryApi};
use crate::cli::Context;
use crate::core::pagination::Pager;
use crate::core::types::{DocumentId, FileHash, SortOrder, UpdateCandidate};
use crate::lookup::ListFetcher;
use crate::ui::{output, prompts};

/// Register a document.
///
/// `update` is `None` for a new lineage, `Some("")` to pick the target
/// lineage interactively, and `Some(id)` for a known target.
pub fn register(
    ctx: &Context,
    file: &Path,
    update: Option<&str>,
    password: Option<&str>,
) -> Result<()> {
    let mut session = Session::open()?;
    require_login(&session)?;

    let content = std::fs::read(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("file has no usable name"))?
        .to_string();
    output::debug(
        format!("local content hash {}", FileHash::of_bytes(&content)),
        ctx.verbosity,
    );

    let password = match password {
        Some(p) if !p.is_empty() => p.to_string(),
        _ => prompts::password("detail-view password", ctx.interactive)?,
    };

    let api = registry(ctx, &session);
    let rt = tokio::runtime::Runtime::new()?;

    let mut form = ActionForm::new(ActiveTab::Register);
    form.select_file(file_name, content);
    form.set_password(password);
    if let Some(target) = update {
        form.set_mode(UploadMode::Update);
        let target = if target.is_empty() {
            pick_target(ctx, &rt, &api, &mut session)?
        } else {
            DocumentId::new(target)?
        };
        form.set_target(target);
    }

    let fetcher = Arc::new(ListFetcher::new(Arc::clone(&api), Pager::default()));
    let orchestrator = ActionOrchestrator::new(Arc::clone(&api), fetcher);

    let outcome = rt
        .block_on(orchestrator.submit(form, &ListQuery::default()))
        .map_err(|e| match e {
            ActionError::Unauthorized => session.expire(),
            ActionError::NotReady(reason) => anyhow!(reason),
        })?;

    if !outcome.success {
        return Err(anyhow!(outcome.message));
    }
    output::success(&outcome.message, ctx.verbosity);
    if let Some(hash) = outcome.submitted_hash {
        output::print(format!("registered hash: {hash}"), ctx.verbosity);
    }
    Ok(())
}

/// Interactively pick the target lineage from the update candidates.
fn pick_target(
    ctx: &Context,
    rt: &tokio::runtime::Runtime,
    api: &Arc<dyn RegistryApi>,
    session: &mut Session,
) -> Result<DocumentId> {
    let candidates = rt
        .block_on(api.documents_for_update(SortOrder::Latest))
        .map_err(|e| session.fail(e))?;
    if candidates.is_empty() {
        return Err(anyhow!("no documents available to update"));
    }

    output::print("documents available to update:", ctx.verbosity);
    for (i, c) in candidates.iter().enumerate() {
        output::print(
            format!("  {}. {} (v{})", i + 1, c.file_name, c.version),
            ctx.verbosity,
        );
    }
    let answer = prompts::input("target number", None, ctx.interactive)?;
    let index: usize = answer
        .parse()
        .map_err(|_| anyhow!("expected a number between 1 and {}", candidates.len()))?;
    let picked: &UpdateCandidate = candidates
        .get(index.checked_sub(1).ok_or_else(|| anyhow!("numbering starts at 1"))?)
        .ok_or_else(|| anyhow!("no candidate number {index}"))?;
    Ok(picked.document_id.clone())
}
