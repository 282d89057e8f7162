//! api::mock
//!
//! Mock registry implementation for deterministic testing.
//!
//! # Design
//!
//! The mock registry stores document groups, details, and disclosure
//! passwords in memory and implements the real comparison semantics for
//! verify (hash the upload, compare against the stored original). Tests can
//! script failures per operation, queue successive listing responses with
//! per-response delays (to exercise request supersession), and inspect the
//! recorded operation log.
//!
//! # Example
//!
//! ```
//! use veridoc::api::mock::MockRegistry;
//! use veridoc::api::{ListQuery, RegistryApi};
//!
//! # tokio_test::block_on(async {
//! let registry = MockRegistry::new();
//! let groups = registry.list_documents(&ListQuery::default()).await.unwrap();
//! assert!(groups.is_empty());
//! assert_eq!(registry.operations().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::traits::{
    ApiError, ListQuery, LoginResponse, RegisterRequest, RegisterResponse, RegistryApi,
    VerifyRequest, VerifyResponse,
};
use crate::core::types::{DocumentDetail, DocumentGroup, FileHash, SortOrder, UpdateCandidate};

/// Mock registry for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    inner: Arc<Mutex<MockRegistryInner>>,
}

#[derive(Debug, Default)]
struct MockRegistryInner {
    /// Current listing returned when the queue is empty.
    groups: Vec<DocumentGroup>,
    /// Queued listing responses, consumed front-first.
    listing_queue: VecDeque<QueuedListing>,
    /// Update-mode target candidates.
    update_candidates: Vec<UpdateCandidate>,
    /// Disclosure details by hash.
    details: HashMap<FileHash, DocumentDetail>,
    /// Disclosure passwords by hash.
    passwords: HashMap<FileHash, String>,
    /// Scripted register response (default: success with computed hash).
    register_response: Option<RegisterResponse>,
    /// Whether login reports an admin session.
    admin_login: bool,
    /// Operation to fail, if any.
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

#[derive(Debug)]
struct QueuedListing {
    groups: Result<Vec<DocumentGroup>, ApiError>,
    delay: Option<Duration>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    ListDocuments(ApiError),
    DocumentsForUpdate(ApiError),
    Register(ApiError),
    Verify(ApiError),
    DocumentDetail(ApiError),
    DocumentDetailAdmin(ApiError),
    DeleteDocument(ApiError),
    Login(ApiError),
    Signup(ApiError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOperation {
    ListDocuments {
        sort: SortOrder,
        query: String,
        admin: bool,
    },
    DocumentsForUpdate {
        sort: SortOrder,
    },
    Register {
        file_name: String,
        upload_type: String,
        target_document_id: Option<String>,
    },
    Verify {
        original_file_hash: FileHash,
        file_name: String,
    },
    DocumentDetail {
        file_hash: FileHash,
    },
    DocumentDetailAdmin {
        file_hash: FileHash,
    },
    DeleteDocument {
        file_hash: FileHash,
    },
    Login {
        email: String,
    },
    Logout,
    Signup {
        email: String,
    },
}

impl MockRegistry {
    /// Create a new empty mock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the default listing.
    pub fn set_groups(&self, groups: Vec<DocumentGroup>) {
        self.inner.lock().unwrap().groups = groups;
    }

    /// Queue one listing response, optionally delayed.
    ///
    /// Queued responses are consumed in order before the default listing
    /// applies again; the delay simulates a slow in-flight request.
    pub fn push_listing(&self, groups: Vec<DocumentGroup>, delay: Option<Duration>) {
        self.inner.lock().unwrap().listing_queue.push_back(QueuedListing {
            groups: Ok(groups),
            delay,
        });
    }

    /// Queue one failing listing response, optionally delayed.
    pub fn push_listing_error(&self, error: ApiError, delay: Option<Duration>) {
        self.inner.lock().unwrap().listing_queue.push_back(QueuedListing {
            groups: Err(error),
            delay,
        });
    }

    /// Set the update-mode target candidates.
    pub fn set_update_candidates(&self, candidates: Vec<UpdateCandidate>) {
        self.inner.lock().unwrap().update_candidates = candidates;
    }

    /// Register a disclosure detail and its password.
    pub fn set_detail(&self, detail: DocumentDetail, password: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .passwords
            .insert(detail.file_hash.clone(), password.to_string());
        inner.details.insert(detail.file_hash.clone(), detail);
    }

    /// Script the register response.
    pub fn set_register_response(&self, response: RegisterResponse) {
        self.inner.lock().unwrap().register_response = Some(response);
    }

    /// Make subsequent logins report an admin session.
    pub fn set_admin_login(&self, admin: bool) {
        self.inner.lock().unwrap().admin_login = admin;
    }

    /// Configure one operation to fail.
    pub fn set_fail_on(&self, fail_on: Option<FailOn>) {
        self.inner.lock().unwrap().fail_on = fail_on;
    }

    /// Snapshot of the recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Count of recorded operations matching a predicate.
    pub fn operation_count(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        self.inner
            .lock()
            .unwrap()
            .operations
            .iter()
            .filter(|op| pred(op))
            .count()
    }

    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }
}

#[async_trait]
impl RegistryApi for MockRegistry {
    async fn list_documents(&self, query: &ListQuery) -> Result<Vec<DocumentGroup>, ApiError> {
        self.record(MockOperation::ListDocuments {
            sort: query.sort,
            query: query.query.clone(),
            admin: query.admin,
        });

        let queued = {
            let mut inner = self.inner.lock().unwrap();
            if let Some(FailOn::ListDocuments(err)) = &inner.fail_on {
                return Err(err.clone());
            }
            inner.listing_queue.pop_front()
        };

        match queued {
            Some(QueuedListing { groups, delay }) => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                groups
            }
            None => Ok(self.inner.lock().unwrap().groups.clone()),
        }
    }

    async fn documents_for_update(
        &self,
        sort: SortOrder,
    ) -> Result<Vec<UpdateCandidate>, ApiError> {
        self.record(MockOperation::DocumentsForUpdate { sort });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::DocumentsForUpdate(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(inner.update_candidates.clone())
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        self.record(MockOperation::Register {
            file_name: request.file_name.clone(),
            upload_type: request.upload_type().to_string(),
            target_document_id: request
                .target_document_id
                .as_ref()
                .map(|id| id.to_string()),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Register(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        if let Some(response) = &inner.register_response {
            return Ok(response.clone());
        }
        Ok(RegisterResponse {
            success: true,
            file_name: Some(request.file_name.clone()),
            message: Some("registered (v1)".to_string()),
            submitted_hash: Some(FileHash::of_bytes(&request.content)),
        })
    }

    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, ApiError> {
        self.record(MockOperation::Verify {
            original_file_hash: request.original_file_hash.clone(),
            file_name: request.file_name.clone(),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Verify(err)) = &inner.fail_on {
            return Err(err.clone());
        }

        let known = inner
            .groups
            .iter()
            .flat_map(|g| g.version_history.iter())
            .any(|v| v.file_hash == request.original_file_hash)
            || inner.details.contains_key(&request.original_file_hash);
        if !known {
            return Err(ApiError::rejected(
                404,
                Some("original document not found".to_string()),
            ));
        }

        let uploaded_hash = FileHash::of_bytes(&request.content);
        let is_valid = uploaded_hash == request.original_file_hash;
        Ok(VerifyResponse {
            success: true,
            is_valid: Some(is_valid),
            file_name: Some(request.file_name.clone()),
            message: Some(
                if is_valid {
                    "hashes match; the document is authentic"
                } else {
                    "hashes differ; the document was altered"
                }
                .to_string(),
            ),
            original_hash: Some(request.original_file_hash.clone()),
            uploaded_hash: Some(uploaded_hash),
        })
    }

    async fn document_detail(
        &self,
        file_hash: &FileHash,
        password: &str,
    ) -> Result<DocumentDetail, ApiError> {
        self.record(MockOperation::DocumentDetail {
            file_hash: file_hash.clone(),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::DocumentDetail(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        match inner.passwords.get(file_hash) {
            None => Err(ApiError::rejected(
                404,
                Some("document not found".to_string()),
            )),
            Some(expected) if expected != password => Err(ApiError::rejected(
                403,
                Some("password does not match".to_string()),
            )),
            Some(_) => Ok(inner.details[file_hash].clone()),
        }
    }

    async fn document_detail_admin(
        &self,
        file_hash: &FileHash,
    ) -> Result<DocumentDetail, ApiError> {
        self.record(MockOperation::DocumentDetailAdmin {
            file_hash: file_hash.clone(),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::DocumentDetailAdmin(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner
            .details
            .get(file_hash)
            .cloned()
            .ok_or_else(|| ApiError::rejected(404, Some("document not found".to_string())))
    }

    async fn delete_document(&self, file_hash: &FileHash) -> Result<(), ApiError> {
        self.record(MockOperation::DeleteDocument {
            file_hash: file_hash.clone(),
        });

        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::DeleteDocument(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        inner.details.remove(file_hash);
        inner.passwords.remove(file_hash);
        for group in &mut inner.groups {
            group.version_history.retain(|v| &v.file_hash != file_hash);
        }
        inner.groups.retain(|g| !g.version_history.is_empty());
        Ok(())
    }

    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.record(MockOperation::Login {
            email: email.to_string(),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Login(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(LoginResponse {
            is_admin: inner.admin_login,
            token: Some("mock-session-token".to_string()),
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.record(MockOperation::Logout);
        Ok(())
    }

    async fn signup(&self, email: &str, _password: &str) -> Result<(), ApiError> {
        self.record(MockOperation::Signup {
            email: email.to_string(),
        });

        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::Signup(err)) = &inner.fail_on {
            return Err(err.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use crate::core::types::{DocumentId, DocumentVersion};

    fn sample_hash(fill: char) -> FileHash {
        FileHash::new(fill.to_string().repeat(64)).unwrap()
    }

    fn sample_group() -> DocumentGroup {
        DocumentGroup {
            document_id: DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap(),
            latest_file_name: "report.pdf".into(),
            version_history: vec![DocumentVersion {
                file_hash: sample_hash('a'),
                file_name: "report.pdf".into(),
                version: 1,
                created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                signature: None,
                user_email: None,
            }],
        }
    }

    fn sample_detail(fill: char) -> DocumentDetail {
        DocumentDetail {
            file_hash: sample_hash(fill),
            file_name: "report.pdf".into(),
            version: 1,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            signature: None,
            user_email: None,
            public_url: None,
            file_content: None,
        }
    }

    #[tokio::test]
    async fn listing_queue_consumed_in_order() {
        let registry = MockRegistry::new();
        registry.push_listing(vec![sample_group()], None);
        registry.push_listing(vec![], None);

        let q = ListQuery::default();
        assert_eq!(registry.list_documents(&q).await.unwrap().len(), 1);
        assert_eq!(registry.list_documents(&q).await.unwrap().len(), 0);
        // Queue drained, default listing (empty) applies
        assert_eq!(registry.list_documents(&q).await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn detail_requires_matching_password() {
        let registry = MockRegistry::new();
        registry.set_detail(sample_detail('a'), "secret");

        let hash = sample_hash('a');
        assert!(registry.document_detail(&hash, "secret").await.is_ok());

        let err = registry.document_detail(&hash, "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn verify_compares_hashes() {
        let registry = MockRegistry::new();
        registry.set_groups(vec![sample_group()]);

        // The stored original hash is 64 'a's, which no real content hashes
        // to, so the comparison reports a mismatch.
        let resp = registry
            .verify(VerifyRequest {
                original_file_hash: sample_hash('a'),
                file_name: "report.pdf".into(),
                content: b"tampered".to_vec(),
            })
            .await
            .unwrap();
        assert!(resp.success);
        assert_eq!(resp.is_valid, Some(false));

        let err = registry
            .verify(VerifyRequest {
                original_file_hash: sample_hash('b'),
                file_name: "report.pdf".into(),
                content: b"x".to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
    }

    #[tokio::test]
    async fn delete_removes_version_and_empty_group() {
        let registry = MockRegistry::new();
        registry.set_groups(vec![sample_group()]);
        registry.set_detail(sample_detail('a'), "pw");

        registry.delete_document(&sample_hash('a')).await.unwrap();

        let groups = registry.list_documents(&ListQuery::default()).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn operations_are_recorded() {
        let registry = MockRegistry::new();
        let _ = registry.list_documents(&ListQuery::default()).await;
        let _ = registry.logout().await;

        let ops = registry.operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], MockOperation::ListDocuments { .. }));
        assert_eq!(ops[1], MockOperation::Logout);
    }
}
