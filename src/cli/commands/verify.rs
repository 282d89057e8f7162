//! verify command - Verify a file against a registered original
//!
//! Exit status follows the verdict: a well-formed comparison that finds the
//! hashes differ exits non-zero, same as a rejected request.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context as _, Result};

use super::{registry, require_login, Session};
use crate::actions::{ActionError, ActionForm, ActionOrchestrator, ActiveTab};
use crate::api::{ListQuery, RegistryApi};
use crate::cli::Context;
use crate::core::pagination::Pager;
use crate::core::types::{flatten_originals, FileHash};
use crate::lookup::ListFetcher;
use crate::ui::{output, prompts};

/// Verify a file against a registered original.
///
/// `original` is the comparison hash; when omitted it is picked
/// interactively from the caller's registered versions.
pub fn verify(ctx: &Context, file: &Path, original: Option<&str>) -> Result<()> {
    let mut session = Session::open()?;
    require_login(&session)?;

    let content = std::fs::read(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("file has no usable name"))?
        .to_string();

    let api = registry(ctx, &session);
    let rt = tokio::runtime::Runtime::new()?;

    let original = match original {
        Some(hash) => FileHash::new(hash)?,
        None => pick_original(ctx, &rt, &api, &mut session)?,
    };

    let fetcher = Arc::new(ListFetcher::new(Arc::clone(&api), Pager::default()));
    let orchestrator = ActionOrchestrator::new(Arc::clone(&api), fetcher);

    let mut form = ActionForm::new(ActiveTab::Verify);
    form.select_file(file_name, content);
    form.set_original(original);

    let outcome = rt
        .block_on(orchestrator.submit(form, &ListQuery::default()))
        .map_err(|e| match e {
            ActionError::Unauthorized => session.expire(),
            ActionError::NotReady(reason) => anyhow!(reason),
        })?;

    if let Some(uploaded) = &outcome.uploaded_hash {
        output::debug(format!("uploaded hash {uploaded}"), ctx.verbosity);
    }
    if !outcome.success {
        return Err(anyhow!(outcome.message));
    }
    output::success(&outcome.message, ctx.verbosity);
    Ok(())
}

/// Interactively pick the comparison original from the registered versions.
fn pick_original(
    ctx: &Context,
    rt: &tokio::runtime::Runtime,
    api: &Arc<dyn RegistryApi>,
    session: &mut Session,
) -> Result<FileHash> {
    let groups = rt
        .block_on(api.list_documents(&ListQuery::default()))
        .map_err(|e| session.fail(e))?;
    let options = flatten_originals(&groups);
    if options.is_empty() {
        return Err(anyhow!("no registered versions to verify against"));
    }

    output::print("registered versions:", ctx.verbosity);
    for (i, o) in options.iter().enumerate() {
        output::print(
            format!(
                "  {}. {} (v{})  {}",
                i + 1,
                o.file_name,
                o.version,
                o.file_hash.short(12),
            ),
            ctx.verbosity,
        );
    }
    let answer = prompts::input("original number", None, ctx.interactive)?;
    let index: usize = answer
        .parse()
        .map_err(|_| anyhow!("expected a number between 1 and {}", options.len()))?;
    let picked = options
        .get(index.checked_sub(1).ok_or_else(|| anyhow!("numbering starts at 1"))?)
        .ok_or_else(|| anyhow!("no version number {index}"))?;
    Ok(picked.file_hash.clone())
}
