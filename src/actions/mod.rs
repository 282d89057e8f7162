//! actions
//!
//! The two mutating workflows: register (new document or new version) and
//! verify-against-original, plus version deletion.
//!
//! # Modules
//!
//! - [`form`] - Pending submission state with readiness predicates
//! - [`orchestrator`] - Submission, outcome classification, deletion

pub mod form;
pub mod orchestrator;

pub use form::{ActionForm, ActiveTab, SelectedFile, UploadMode};
pub use orchestrator::{ActionError, ActionOrchestrator, ActionOutcome, DeleteError};
