//! core
//!
//! Core domain types and pure operations for Veridoc.
//!
//! # Modules
//!
//! - [`types`] - Strong types: FileHash, DocumentId, wire records
//! - [`pagination`] - Page math for the reconciled group list
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Listing order is server-owned; the client never re-sorts histories
//! - All page math is deterministic and clamping, never erroring

pub mod pagination;
pub mod types;
