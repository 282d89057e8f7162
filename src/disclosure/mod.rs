//! disclosure
//!
//! The gate between a listed version and its full detail record.
//!
//! # State machine
//!
//! Per `file_hash`, the gate moves through:
//!
//! ```text
//! Unknown -> Granted                          (cache hit or admin fetch)
//! Unknown -> Challenged -> Granted            (password accepted)
//! Unknown -> Challenged -> Denied -> ...      (retry allowed)
//! ```
//!
//! `Granted` is terminal for the session: the grant and the detail are
//! persisted in the session store together, so reopening the same hash
//! skips the challenge entirely with zero network calls. `Denied` never
//! mutates the grant or the cache; the challenge stays open for retry.
//!
//! A wrong password is local to the gate (`Denied`), while a lost session
//! (`ApiError::Unauthorized`) propagates to the global 401 handling.

use std::sync::Arc;

use crate::api::{ApiError, RegistryApi};
use crate::core::types::{DocumentDetail, FileHash};
use crate::session::SessionStore;

/// Disclosure progress for one `file_hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum DisclosureState {
    /// Nothing known yet.
    Unknown,
    /// A password prompt is open, bound to the target version.
    Challenged { target: FileHash },
    /// Disclosure succeeded; the detail is in hand.
    Granted { detail: DocumentDetail },
    /// The challenge was rejected; retry is allowed.
    Denied { target: FileHash, reason: String },
}

impl DisclosureState {
    /// Whether this state carries a disclosed detail.
    pub fn is_granted(&self) -> bool {
        matches!(self, DisclosureState::Granted { .. })
    }
}

/// Resolves detail-view requests against the session store and the API.
pub struct DisclosureGate {
    api: Arc<dyn RegistryApi>,
}

impl DisclosureGate {
    pub fn new(api: Arc<dyn RegistryApi>) -> Self {
        Self { api }
    }

    /// Resolve a request to view the detail for `target`.
    ///
    /// Chooses between cache hit, admin bypass, and password challenge:
    /// - grant + cached detail present: `Granted`, no network call
    /// - admin session: admin-privileged fetch, granted unconditionally on
    ///   success
    /// - otherwise: `Challenged`, waiting for a password submission
    ///
    /// # Errors
    ///
    /// `ApiError::Unauthorized` propagates; an admin fetch rejection also
    /// propagates (there is no password fallback for admins).
    pub async fn open(
        &self,
        session: &mut SessionStore,
        target: &FileHash,
    ) -> Result<DisclosureState, ApiError> {
        if let Some(detail) = session.disclosed(target) {
            return Ok(DisclosureState::Granted {
                detail: detail.clone(),
            });
        }

        if session.is_admin() {
            let detail = self.api.document_detail_admin(target).await?;
            session.grant(detail.clone());
            return Ok(DisclosureState::Granted { detail });
        }

        Ok(DisclosureState::Challenged {
            target: target.clone(),
        })
    }

    /// Submit a password for an open challenge.
    ///
    /// An empty submission is denied locally without a network call. A
    /// rejected password yields `Denied` with the server's message and
    /// leaves the grant/cache state untouched, so the submission is freely
    /// repeatable.
    ///
    /// # Errors
    ///
    /// Only `ApiError::Unauthorized` propagates (lost session).
    pub async fn submit_password(
        &self,
        session: &mut SessionStore,
        target: &FileHash,
        password: &str,
    ) -> Result<DisclosureState, ApiError> {
        let password = password.trim();
        if password.is_empty() {
            return Ok(DisclosureState::Denied {
                target: target.clone(),
                reason: "a password is required".to_string(),
            });
        }

        match self.api.document_detail(target, password).await {
            Ok(detail) => {
                session.grant(detail.clone());
                Ok(DisclosureState::Granted { detail })
            }
            Err(ApiError::Unauthorized) => Err(ApiError::Unauthorized),
            Err(err) => Ok(DisclosureState::Denied {
                target: target.clone(),
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{FailOn, MockOperation, MockRegistry};
    use chrono::{TimeZone, Utc};

    fn hash(fill: char) -> FileHash {
        FileHash::new(fill.to_string().repeat(64)).unwrap()
    }

    fn detail(fill: char) -> DocumentDetail {
        DocumentDetail {
            file_hash: hash(fill),
            file_name: "secret.pdf".into(),
            version: 1,
            created_at: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            signature: Some("cafe".into()),
            user_email: None,
            public_url: Some("https://files.example/secret.pdf".into()),
            file_content: None,
        }
    }

    fn gate(registry: &MockRegistry) -> DisclosureGate {
        DisclosureGate::new(Arc::new(registry.clone()))
    }

    #[tokio::test]
    async fn open_without_grant_challenges() {
        let registry = MockRegistry::new();
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        let state = gate.open(&mut session, &hash('a')).await.unwrap();
        assert_eq!(
            state,
            DisclosureState::Challenged { target: hash('a') }
        );
        // No network call for a challenge.
        assert!(registry.operations().is_empty());
    }

    #[tokio::test]
    async fn challenge_then_grant_caches_detail() {
        let registry = MockRegistry::new();
        registry.set_detail(detail('a'), "pw123");
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        let state = gate
            .submit_password(&mut session, &hash('a'), "pw123")
            .await
            .unwrap();
        assert!(state.is_granted());
        assert!(session.disclosed(&hash('a')).is_some());
    }

    #[tokio::test]
    async fn reopen_within_session_makes_zero_network_calls() {
        let registry = MockRegistry::new();
        registry.set_detail(detail('a'), "pw123");
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        gate.submit_password(&mut session, &hash('a'), "pw123")
            .await
            .unwrap();
        let calls_after_unlock = registry.operations().len();

        // Close and reopen: served from the session store.
        let reopened = gate.open(&mut session, &hash('a')).await.unwrap();
        match reopened {
            DisclosureState::Granted { detail: d } => {
                assert_eq!(d, detail('a'));
            }
            other => panic!("expected Granted, got {other:?}"),
        }
        assert_eq!(registry.operations().len(), calls_after_unlock);
    }

    #[tokio::test]
    async fn admin_bypasses_challenge() {
        let registry = MockRegistry::new();
        registry.set_detail(detail('a'), "pw123");
        let gate = gate(&registry);
        let mut session = SessionStore::new();
        session.begin(Some("tok".into()), true);

        let state = gate.open(&mut session, &hash('a')).await.unwrap();
        assert!(state.is_granted());
        assert_eq!(
            registry.operation_count(|op| matches!(op, MockOperation::DocumentDetailAdmin { .. })),
            1
        );

        // Second open hits the cache instead of the admin path.
        gate.open(&mut session, &hash('a')).await.unwrap();
        assert_eq!(
            registry.operation_count(|op| matches!(op, MockOperation::DocumentDetailAdmin { .. })),
            1
        );
    }

    #[tokio::test]
    async fn wrong_password_denies_and_leaves_state_untouched() {
        let registry = MockRegistry::new();
        registry.set_detail(detail('a'), "pw123");
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        for _ in 0..3 {
            let state = gate
                .submit_password(&mut session, &hash('a'), "nope")
                .await
                .unwrap();
            match &state {
                DisclosureState::Denied { target, reason } => {
                    assert_eq!(target, &hash('a'));
                    assert_eq!(reason, "password does not match");
                }
                other => panic!("expected Denied, got {other:?}"),
            }
            assert_eq!(session.disclosure_count(), 0);
        }

        // Still unlockable after repeated denials.
        let state = gate
            .submit_password(&mut session, &hash('a'), "pw123")
            .await
            .unwrap();
        assert!(state.is_granted());
    }

    #[tokio::test]
    async fn empty_password_denied_without_network_call() {
        let registry = MockRegistry::new();
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        let state = gate
            .submit_password(&mut session, &hash('a'), "   ")
            .await
            .unwrap();
        assert!(matches!(state, DisclosureState::Denied { .. }));
        assert!(registry.operations().is_empty());
    }

    #[tokio::test]
    async fn unauthorized_propagates_for_global_handling() {
        let registry = MockRegistry::new();
        registry.set_fail_on(Some(FailOn::DocumentDetail(ApiError::Unauthorized)));
        let gate = gate(&registry);
        let mut session = SessionStore::new();

        let err = gate
            .submit_password(&mut session, &hash('a'), "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
