//! api
//!
//! Abstraction over the collaborating document registry service.
//!
//! # Architecture
//!
//! The `RegistryApi` trait defines the client's view of the service: one
//! async method per endpoint, speaking the exact multipart/JSON wire
//! contract. Workflow modules depend on `Arc<dyn RegistryApi>` only, never
//! on the HTTP implementation, so every workflow is testable against the
//! in-memory mock.
//!
//! # Modules
//!
//! - `traits`: Core `RegistryApi` trait and request/response types
//! - [`http`]: reqwest implementation
//! - [`mock`]: Deterministic in-memory implementation for tests
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use veridoc::api::{http::HttpRegistry, ListQuery, RegistryApi};
//!
//! let api: Arc<dyn RegistryApi> =
//!     Arc::new(HttpRegistry::new("http://127.0.0.1:8000", token));
//! let groups = api.list_documents(&ListQuery::default()).await?;
//! ```

pub mod http;
pub mod mock;
mod traits;

pub use traits::*;
