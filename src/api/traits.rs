//! api::traits
//!
//! Registry API trait for the collaborating document service.
//!
//! # Design
//!
//! The `RegistryApi` trait is async because every operation involves network
//! I/O. All methods return `Result<_, ApiError>`; the workflow layers above
//! classify those errors per the taxonomy below and never let them escape
//! uncaught.
//!
//! The trait mirrors the wire contract exactly: field names on the request
//! and response types are the multipart/JSON field names the service speaks.
//!
//! # Error taxonomy
//!
//! - `Unauthorized` - HTTP 401 from any endpoint; the caller must clear the
//!   session store and send the user back to login
//! - `Rejected` - non-2xx with the server's message when it supplied one,
//!   otherwise a generic status-keyed message
//! - `Network` - transport failure, no usable response
//! - `Decode` - a 2xx body that did not match the contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{
    DocumentDetail, DocumentGroup, DocumentId, FileHash, SortOrder, UpdateCandidate,
};

/// Errors from registry operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Session expired or missing (HTTP 401 from any endpoint).
    #[error("authentication required")]
    Unauthorized,

    /// The server refused the request.
    #[error("{message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided detail, or a generic status-keyed message
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not match the wire contract.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The fallback message for a status with no server-provided detail.
    pub fn status_message(status: u16) -> String {
        format!("request failed with status {status}")
    }

    /// Build a `Rejected` error, falling back to the generic message.
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| Self::status_message(status)),
        }
    }
}

/// Filter and sort inputs for a listing request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub sort: SortOrder,
    /// Free-text query over file names (and owner emails for admins).
    pub query: String,
    /// Inclusive lower date bound (`YYYY-MM-DD`), empty for none.
    pub date_from: String,
    /// Inclusive upper date bound (`YYYY-MM-DD`), empty for none.
    pub date_to: String,
    /// Request the cross-user admin listing.
    pub admin: bool,
}

/// Fields for a register submission.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub file_name: String,
    pub content: Vec<u8>,
    pub password: String,
    /// `None` registers a new lineage; `Some` appends a version to it.
    pub target_document_id: Option<DocumentId>,
}

impl RegisterRequest {
    /// Wire value for the `upload_type` field.
    pub fn upload_type(&self) -> &'static str {
        if self.target_document_id.is_some() {
            "update"
        } else {
            "new"
        }
    }
}

/// Fields for a verify-against-original submission.
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub original_file_hash: FileHash,
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Response to a register submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub submitted_hash: Option<FileHash>,
}

/// Response to a verify submission.
///
/// `is_valid` is independent of `success`: a well-formed comparison against
/// a tampered file answers `success: true, is_valid: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default)]
    pub is_valid: Option<bool>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub original_hash: Option<FileHash>,
    #[serde(default)]
    pub uploaded_hash: Option<FileHash>,
}

/// Response to a login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub is_admin: bool,
    /// Session token captured from the `Set-Cookie` header by the transport.
    #[serde(skip)]
    pub token: Option<String>,
}

/// The registry API, one method per §6 endpoint.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the list fetcher shares one
/// instance across cooperative tasks via `Arc<dyn RegistryApi>`.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// `GET /documents` - the filtered, grouped listing.
    async fn list_documents(&self, query: &ListQuery) -> Result<Vec<DocumentGroup>, ApiError>;

    /// `GET /documents_for_update` - latest version of each lineage.
    async fn documents_for_update(&self, sort: SortOrder)
        -> Result<Vec<UpdateCandidate>, ApiError>;

    /// `POST /register` - register a new document or append a version.
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError>;

    /// `POST /verify_with_original` - compare an upload against an original.
    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, ApiError>;

    /// `POST /document_detail` - password-gated detail retrieval.
    ///
    /// A wrong password surfaces as `ApiError::Rejected`, not `Unauthorized`;
    /// it is local to the disclosure challenge and must not clear the session.
    async fn document_detail(
        &self,
        file_hash: &FileHash,
        password: &str,
    ) -> Result<DocumentDetail, ApiError>;

    /// `POST /document_detail_admin` - admin-privileged detail retrieval.
    async fn document_detail_admin(
        &self,
        file_hash: &FileHash,
    ) -> Result<DocumentDetail, ApiError>;

    /// `DELETE /document_delete` - delete a version (the whole lineage when
    /// the target is v1).
    async fn delete_document(&self, file_hash: &FileHash) -> Result<(), ApiError>;

    /// `POST /login` - establish a session.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// `POST /logout` - end the session server-side (best-effort).
    async fn logout(&self) -> Result<(), ApiError>;

    /// `POST /signup` - create an account.
    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError>;
}
