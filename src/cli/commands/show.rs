//! show command - Show the detail record for a registered version
//!
//! Routes through the disclosure gate: cached grants and admin sessions
//! skip the password challenge; everyone else is prompted. A granted
//! disclosure is saved back to the session file so repeat shows ask nothing.

use anyhow::{anyhow, Result};

use super::{registry, require_login, Session};
use crate::cli::Context;
use crate::core::types::{DocumentDetail, FileHash};
use crate::disclosure::{DisclosureGate, DisclosureState};
use crate::ui::{output, prompts};

/// Password attempts allowed per invocation in interactive mode.
const MAX_ATTEMPTS: u32 = 3;

/// Show the detail for the version identified by `hash`.
pub fn show(ctx: &Context, hash: &str, open: bool) -> Result<()> {
    let hash = FileHash::new(hash)?;
    let mut session = Session::open()?;
    require_login(&session)?;

    let api = registry(ctx, &session);
    let gate = DisclosureGate::new(api);
    let rt = tokio::runtime::Runtime::new()?;

    let opened = rt.block_on(gate.open(&mut session.store, &hash));
    let mut state = opened.map_err(|e| session.fail(e))?;

    let mut attempts = 0;
    let detail = loop {
        match state {
            DisclosureState::Granted { detail } => break detail,
            DisclosureState::Challenged { target } | DisclosureState::Denied { target, .. }
                if attempts < MAX_ATTEMPTS =>
            {
                attempts += 1;
                let password = prompts::password("document password", ctx.interactive)?;
                let submitted =
                    rt.block_on(gate.submit_password(&mut session.store, &target, &password));
                state = submitted.map_err(|e| session.fail(e))?;
                if let DisclosureState::Denied { ref reason, .. } = state {
                    output::warn(reason, ctx.verbosity);
                }
            }
            DisclosureState::Denied { reason, .. } => return Err(anyhow!(reason)),
            DisclosureState::Challenged { .. } => {
                return Err(anyhow!("too many failed password attempts"))
            }
            DisclosureState::Unknown => unreachable!("gate never yields Unknown"),
        }
    };

    // Persist the grant so the next show of this version skips the prompt.
    session.save(ctx);
    print_detail(ctx, &detail);

    if open {
        let url = preview_url(&detail)
            .ok_or_else(|| anyhow!("this version has no preview to open"))?;
        open::that(&url).map_err(|e| anyhow!("could not open preview: {e}"))?;
        output::print(format!("opened {url}"), ctx.verbosity);
    }
    Ok(())
}

fn print_detail(ctx: &Context, detail: &DocumentDetail) {
    output::print(format!("file:       {}", detail.file_name), ctx.verbosity);
    output::print(format!("version:    {}", detail.version), ctx.verbosity);
    output::print(format!("hash:       {}", detail.file_hash), ctx.verbosity);
    output::print(
        format!("registered: {}", detail.created_at.format("%Y-%m-%d %H:%M:%S")),
        ctx.verbosity,
    );
    if let Some(signature) = &detail.signature {
        output::print(format!("signature:  {signature}"), ctx.verbosity);
    }
    if let Some(email) = &detail.user_email {
        output::print(format!("owner:      {email}"), ctx.verbosity);
    }
    if let Some(url) = &detail.public_url {
        output::print(format!("preview:    {url}"), ctx.verbosity);
    }
    if let Some(text) = &detail.file_content {
        output::print(format!("\n{text}"), ctx.verbosity);
    }
}

/// The preview URL with the download name attached, when a preview exists.
fn preview_url(detail: &DocumentDetail) -> Option<String> {
    detail
        .public_url
        .as_ref()
        .map(|url| format!("{url}?download={}", detail.file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn preview_url_appends_download_name() {
        let detail = DocumentDetail {
            file_hash: FileHash::new("a".repeat(64)).unwrap(),
            file_name: "contract.pdf".into(),
            version: 1,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            signature: None,
            user_email: None,
            public_url: Some("https://files.example/abc".into()),
            file_content: None,
        };
        assert_eq!(
            preview_url(&detail).unwrap(),
            "https://files.example/abc?download=contract.pdf"
        );
    }

    #[test]
    fn no_preview_without_public_url() {
        let detail = DocumentDetail {
            file_hash: FileHash::new("a".repeat(64)).unwrap(),
            file_name: "contract.pdf".into(),
            version: 1,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            signature: None,
            user_email: None,
            public_url: None,
            file_content: None,
        };
        assert!(preview_url(&detail).is_none());
    }
}
