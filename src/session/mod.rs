//! session
//!
//! Session-scoped state: the admin flag, the login token, and the two
//! disclosure caches (grants and detail records).
//!
//! # Lifecycle
//!
//! Created at login, carried across CLI invocations by a best-effort session
//! file, and destroyed as a single atomic step on logout or on an
//! authentication failure (HTTP 401) from any endpoint.
//!
//! # Modules
//!
//! - [`store`] - In-memory `SessionStore`
//! - [`file`] - On-disk persistence with an exclusive write lock

pub mod file;
pub mod store;

pub use file::{SessionError, SessionFile};
pub use store::SessionStore;
