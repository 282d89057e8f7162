//! lookup::fetcher
//!
//! Listing requests with supersession: only the newest request may update
//! the displayed list.
//!
//! # Design
//!
//! Cancellation is modeled as a monotonically increasing request epoch.
//! Every `refresh` bumps the epoch and captures the new value; when the
//! response lands, it is applied only if its captured epoch is still
//! current. A superseded response is silently discarded - cancellation is
//! never an error - and the loading indicator is left to the request that
//! superseded it. This guarantees at most one listing request is "live"
//! from the consumer's perspective.
//!
//! Authentication failures are not handled here: `refresh` propagates
//! `ApiError::Unauthorized` so the caller can run the global session-clear
//! rule.
//!
//! The pager lives inside the listing state so that replacing the list and
//! resetting to page 1 are one atomic state change.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::api::{ApiError, ListQuery, RegistryApi};
use crate::core::pagination::Pager;
use crate::core::types::DocumentGroup;

/// Outcome of one `refresh` call.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The response was applied; the list now holds `groups` groups.
    Applied { groups: usize },
    /// A newer request superseded this one; nothing was touched.
    Superseded,
    /// A non-cancellation failure; the list was cleared and the message
    /// recorded.
    Failed { message: String },
}

/// Reconciled listing state: the group list, its pager, and the
/// loading/error indicators.
#[derive(Debug, Clone)]
pub struct ListingState {
    pub groups: Vec<DocumentGroup>,
    pub pager: Pager,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListingState {
    fn new(pager: Pager) -> Self {
        Self {
            groups: Vec::new(),
            pager,
            loading: false,
            error: None,
        }
    }

    /// The groups visible on the current page.
    pub fn current_page(&self) -> &[DocumentGroup] {
        self.pager.slice(&self.groups)
    }
}

/// Issues listing requests and reconciles responses under the epoch rule.
pub struct ListFetcher {
    api: Arc<dyn RegistryApi>,
    epoch: AtomicU64,
    state: Mutex<ListingState>,
}

impl std::fmt::Debug for ListFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListFetcher")
            .field("epoch", &self.epoch.load(Ordering::SeqCst))
            .finish()
    }
}

impl ListFetcher {
    /// Create a fetcher over the given API with the given pager.
    pub fn new(api: Arc<dyn RegistryApi>, pager: Pager) -> Self {
        Self {
            api,
            epoch: AtomicU64::new(0),
            state: Mutex::new(ListingState::new(pager)),
        }
    }

    /// Snapshot of the current listing state.
    pub fn state(&self) -> ListingState {
        self.state.lock().unwrap().clone()
    }

    /// Navigate the pager, clamped to the current list.
    pub fn goto_page(&self, page: usize) {
        let mut state = self.state.lock().unwrap();
        let len = state.groups.len();
        state.pager.goto(page, len);
    }

    /// Supersede any outstanding request without issuing a new one
    /// (tab change, navigation away).
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        state.loading = false;
    }

    /// Issue a listing request for `query`.
    ///
    /// Any outstanding request is superseded first; this is a hard
    /// precondition, not an optimization, because it prevents a slow stale
    /// response from clobbering a fresh result.
    ///
    /// # Errors
    ///
    /// Only `ApiError::Unauthorized` propagates; every other failure is
    /// folded into `FetchOutcome::Failed`.
    pub async fn refresh(&self, query: &ListQuery) -> Result<FetchOutcome, ApiError> {
        // The bump and the loading/error writes share the state lock, so a
        // request superseded before marking itself in flight can never
        // resurrect the loading indicator after its successor cleared it.
        let my_epoch = {
            let mut state = self.state.lock().unwrap();
            let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.error = None;
            epoch
        };

        let result = self.api.list_documents(query).await;

        let mut state = self.state.lock().unwrap();
        if self.epoch.load(Ordering::SeqCst) != my_epoch {
            // A newer request owns the state now; discard silently.
            return Ok(FetchOutcome::Superseded);
        }

        match result {
            Ok(groups) => {
                let count = groups.len();
                state.groups = groups;
                state.pager.reset();
                state.loading = false;
                Ok(FetchOutcome::Applied { groups: count })
            }
            Err(ApiError::Unauthorized) => {
                state.loading = false;
                Err(ApiError::Unauthorized)
            }
            Err(err) => {
                let message = err.to_string();
                state.groups.clear();
                state.pager.reset();
                state.error = Some(message.clone());
                state.loading = false;
                Ok(FetchOutcome::Failed { message })
            }
        }
    }
}
