//! list command - List registered documents, grouped by lineage

use std::sync::Arc;

use anyhow::{anyhow, Result};

use super::{registry, require_login, Session};
use crate::api::ListQuery;
use crate::cli::Context;
use crate::core::pagination::{Pager, DEFAULT_PAGE_SIZE};
use crate::core::types::{DocumentGroup, SortOrder};
use crate::lookup::ListFetcher;
use crate::ui::output;

/// List registered documents.
#[allow(clippy::too_many_arguments)]
pub fn list(
    ctx: &Context,
    sort: &str,
    query: &str,
    from: &str,
    to: &str,
    page: usize,
    admin: bool,
) -> Result<()> {
    let sort: SortOrder = sort.parse()?;
    let mut session = Session::open()?;
    require_login(&session)?;

    if admin && !session.store.is_admin() {
        return Err(anyhow!("the admin listing requires an administrator session"));
    }

    let api = registry(ctx, &session);
    let fetcher = ListFetcher::new(Arc::clone(&api), Pager::new(DEFAULT_PAGE_SIZE));
    let list_query = ListQuery {
        sort,
        query: query.to_string(),
        date_from: from.to_string(),
        date_to: to.to_string(),
        admin,
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(fetcher.refresh(&list_query))
        .map_err(|e| session.fail(e))?;

    let state = {
        fetcher.goto_page(page);
        fetcher.state()
    };
    if let Some(message) = &state.error {
        return Err(anyhow!(message.clone()));
    }

    if state.groups.is_empty() {
        output::print("no documents found", ctx.verbosity);
        return Ok(());
    }

    for group in state.current_page() {
        print_group(ctx, group, admin);
    }
    output::print(
        format!(
            "page {} of {} ({} document{})",
            state.pager.current_page(),
            state.pager.total_pages(state.groups.len()),
            state.groups.len(),
            if state.groups.len() == 1 { "" } else { "s" },
        ),
        ctx.verbosity,
    );
    Ok(())
}

fn print_group(ctx: &Context, group: &DocumentGroup, admin: bool) {
    output::print(
        format!("{}  {}", group.document_id, group.latest_file_name),
        ctx.verbosity,
    );
    // Newest version first for display; server order is preserved in state.
    let mut versions: Vec<_> = group.version_history.iter().collect();
    versions.sort_by(|a, b| b.version.cmp(&a.version));
    for v in versions {
        let owner = match (&v.user_email, admin) {
            (Some(email), true) => format!("  {email}"),
            _ => String::new(),
        };
        output::print(
            format!(
                "  v{}  {}  {}  {}{}",
                v.version,
                v.file_hash.short(12),
                v.created_at.format("%Y-%m-%d %H:%M"),
                v.file_name,
                owner,
            ),
            ctx.verbosity,
        );
    }
}
