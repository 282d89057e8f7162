//! session::store
//!
//! In-memory session state: admin flag, token, disclosure grants, and the
//! disclosure detail cache.
//!
//! # Invariants
//!
//! - A grant and its cached detail are written together; `disclosed()` only
//!   answers when both halves agree.
//! - `clear()` wipes everything in one step. It is the single response to
//!   logout and to an authentication failure on any request.
//! - Grants are never individually revoked; only `clear()` and a deletion of
//!   the underlying version remove them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::types::{DocumentDetail, FileHash};

/// Session-scoped state shared by the disclosure gate and the orchestrator.
///
/// Injected explicitly into the workflows that need it; there is no
/// module-level singleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStore {
    /// Session token issued at login, absent when logged out.
    #[serde(default)]
    token: Option<String>,
    /// Whether the logged-in account is an administrator.
    #[serde(default)]
    is_admin: bool,
    /// Disclosure grants: hash -> proven right to view the detail.
    #[serde(default)]
    grants: HashMap<FileHash, bool>,
    /// Disclosure cache: hash -> detail record.
    #[serde(default)]
    details: HashMap<FileHash, DocumentDetail>,
}

impl SessionStore {
    /// Create an empty, logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fresh login.
    pub fn begin(&mut self, token: Option<String>, is_admin: bool) {
        self.clear();
        self.token = token;
        self.is_admin = is_admin;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether a session token is present.
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Record a successful disclosure: grant and detail together.
    pub fn grant(&mut self, detail: DocumentDetail) {
        let hash = detail.file_hash.clone();
        self.grants.insert(hash.clone(), true);
        self.details.insert(hash, detail);
    }

    /// The cached detail for a hash, only when the grant and cache agree.
    pub fn disclosed(&self, hash: &FileHash) -> Option<&DocumentDetail> {
        if self.grants.get(hash).copied().unwrap_or(false) {
            self.details.get(hash)
        } else {
            None
        }
    }

    /// Whether disclosure has already succeeded for a hash.
    pub fn has_grant(&self, hash: &FileHash) -> bool {
        self.disclosed(hash).is_some()
    }

    /// Drop the cached detail after the underlying version was deleted.
    pub fn forget(&mut self, hash: &FileHash) {
        self.grants.remove(hash);
        self.details.remove(hash);
    }

    /// Number of cached disclosures.
    pub fn disclosure_count(&self) -> usize {
        self.details.len()
    }

    /// Wipe the whole session in one step.
    pub fn clear(&mut self) {
        self.token = None;
        self.is_admin = false;
        self.grants.clear();
        self.details.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn hash(fill: char) -> FileHash {
        FileHash::new(fill.to_string().repeat(64)).unwrap()
    }

    fn detail(fill: char) -> DocumentDetail {
        DocumentDetail {
            file_hash: hash(fill),
            file_name: "doc.pdf".into(),
            version: 1,
            created_at: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            signature: None,
            user_email: None,
            public_url: None,
            file_content: None,
        }
    }

    #[test]
    fn grant_stores_both_halves() {
        let mut store = SessionStore::new();
        assert!(store.disclosed(&hash('a')).is_none());

        store.grant(detail('a'));
        assert!(store.has_grant(&hash('a')));
        assert_eq!(store.disclosed(&hash('a')).unwrap().file_name, "doc.pdf");
    }

    #[test]
    fn disclosed_requires_agreement() {
        // A detail without its grant must not be served.
        let mut store = SessionStore::new();
        store.details.insert(hash('a'), detail('a'));
        assert!(store.disclosed(&hash('a')).is_none());
    }

    #[test]
    fn clear_wipes_everything() {
        let mut store = SessionStore::new();
        store.begin(Some("tok".into()), true);
        store.grant(detail('a'));

        store.clear();
        assert!(!store.is_logged_in());
        assert!(!store.is_admin());
        assert_eq!(store.disclosure_count(), 0);
        assert!(store.disclosed(&hash('a')).is_none());
    }

    #[test]
    fn begin_discards_previous_session() {
        let mut store = SessionStore::new();
        store.begin(Some("tok1".into()), true);
        store.grant(detail('a'));

        store.begin(Some("tok2".into()), false);
        assert_eq!(store.token(), Some("tok2"));
        assert!(!store.is_admin());
        assert!(store.disclosed(&hash('a')).is_none());
    }

    #[test]
    fn forget_removes_one_disclosure() {
        let mut store = SessionStore::new();
        store.grant(detail('a'));
        store.grant(detail('b'));

        store.forget(&hash('a'));
        assert!(store.disclosed(&hash('a')).is_none());
        assert!(store.disclosed(&hash('b')).is_some());
    }

    #[test]
    fn serde_roundtrip_preserves_grants() {
        let mut store = SessionStore::new();
        store.begin(Some("tok".into()), false);
        store.grant(detail('a'));

        let json = serde_json::to_string(&store).unwrap();
        let back: SessionStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back.token(), Some("tok"));
        assert!(back.disclosed(&hash('a')).is_some());
    }
}
