//! lookup
//!
//! The listing pipeline: raw query edits flow through the debouncer, the
//! fetcher issues at most one live listing request at a time, and the
//! reconciled groups land in a paged listing state.
//!
//! # Modules
//!
//! - [`debounce`] - Composition-aware query debouncing
//! - [`fetcher`] - Epoch-guarded listing requests and reconciliation

pub mod debounce;
pub mod fetcher;

pub use debounce::QueryDebouncer;
pub use fetcher::{FetchOutcome, ListFetcher, ListingState};
