//! Veridoc - a client for hash-based document registration and verification
//!
//! Veridoc talks to a document registry service that identifies every
//! registered artifact by its content hash. It registers documents (as new
//! lineages or as new versions of existing ones), verifies files against
//! registered originals, and guards detail records behind per-document
//! password disclosure.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to workflows)
//! - [`lookup`] - Debounced, supersession-safe document listing
//! - [`disclosure`] - Password-gated access to detail records
//! - [`actions`] - Register/verify submission and deletion workflows
//! - [`api`] - Single interface for the registry's wire contract
//! - [`session`] - Session-scoped auth state and disclosure caches
//! - [`core`] - Domain types and pagination
//! - [`config`] - Client configuration loading
//! - [`ui`] - User interaction utilities
//!
//! # Correctness Invariants
//!
//! 1. Only the newest listing request may update the displayed list
//! 2. Disclosure grants and cached details are written and cleared together
//! 3. An authentication failure on any endpoint clears the whole session
//! 4. A verify that finds differing hashes is a failure, regardless of
//!    HTTP status

pub mod actions;
pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod disclosure;
pub mod lookup;
pub mod session;
pub mod ui;
