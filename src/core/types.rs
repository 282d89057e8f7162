//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`FileHash`] - Validated SHA-256 content hash (the version primary key)
//! - [`DocumentId`] - Validated lineage identifier
//! - [`SortOrder`] - Listing sort direction
//! - [`DocumentVersion`] / [`DocumentGroup`] - Listing wire records
//! - [`DocumentDetail`] - Disclosure-gated detail record
//! - [`UpdateCandidate`] / [`OriginalOption`] - Picker entries
//!
//! # Validation
//!
//! Identifier types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use veridoc::core::types::{DocumentId, FileHash, SortOrder};
//!
//! let hash = FileHash::new(
//!     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
//! ).unwrap();
//! assert_eq!(hash.short(8), "e3b0c442");
//!
//! let id = DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap();
//! assert_eq!(id.as_str().len(), 36);
//!
//! assert_eq!(SortOrder::Latest.to_string(), "latest");
//! assert!(FileHash::new("not-a-hash").is_err());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid file hash: {0}")]
    InvalidFileHash(String),

    #[error("invalid document id: {0}")]
    InvalidDocumentId(String),

    #[error("invalid sort order: {0}")]
    InvalidSortOrder(String),
}

/// A validated SHA-256 content hash.
///
/// Hashes are normalized to lowercase and must be exactly 64 hex characters.
/// A `FileHash` uniquely identifies one registered version and is the key
/// under which disclosure grants and cached details are stored.
///
/// # Example
///
/// ```
/// use veridoc::core::types::FileHash;
///
/// let hash = FileHash::new(
///     "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855",
/// ).unwrap();
/// assert_eq!(
///     hash.as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
///
/// // Hash of empty input, computed locally
/// assert_eq!(FileHash::of_bytes(b""), hash);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FileHash(String);

impl FileHash {
    /// SHA-256 hex digest length.
    const HEX_LEN: usize = 64;

    /// Create a new validated file hash.
    ///
    /// The hash is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidFileHash` if the string is not 64 hex chars.
    pub fn new(hash: impl Into<String>) -> Result<Self, TypeError> {
        let hash = hash.into().to_ascii_lowercase();
        Self::validate(&hash)?;
        Ok(Self(hash))
    }

    /// Compute the SHA-256 hash of a byte slice.
    ///
    /// Used to show the submitted hash before the server answers; the server
    /// remains the authority on identity.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get an abbreviated form of the hash.
    ///
    /// Returns the first `len` characters. If `len` exceeds the hash length,
    /// returns the full hash.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(hash: &str) -> Result<(), TypeError> {
        if hash.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidFileHash(format!(
                "expected {} hex chars, got {}",
                Self::HEX_LEN,
                hash.len()
            )));
        }
        if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidFileHash(
                "hash must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FileHash {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FileHash> for String {
    fn from(hash: FileHash) -> Self {
        hash.0
    }
}

impl AsRef<str> for FileHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated lineage identifier (UUID issued by the registry).
///
/// All versions of one logical document share one `DocumentId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a new validated document id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDocumentId` if the string is not a UUID.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        uuid::Uuid::parse_str(&id).map_err(|e| TypeError::InvalidDocumentId(e.to_string()))?;
        Ok(Self(id))
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Listing sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest groups first
    #[default]
    Latest,
    /// Oldest groups first
    Oldest,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Latest => write!(f, "latest"),
            SortOrder::Oldest => write!(f, "oldest"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(TypeError::InvalidSortOrder(other.to_string())),
        }
    }
}

/// One registered artifact within a lineage.
///
/// The `version` is a positive integer, strictly increasing per lineage.
/// The optional `signature` is opaque to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentVersion {
    pub file_hash: FileHash,
    pub file_name: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Owner email, present only in admin listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

/// One logical document lineage.
///
/// `version_history` preserves server order and is never re-sorted
/// client-side. A group that appears in a listing has a non-empty history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentGroup {
    pub document_id: DocumentId,
    pub latest_file_name: String,
    pub version_history: Vec<DocumentVersion>,
}

impl DocumentGroup {
    /// The entry with the highest `version` number, regardless of display
    /// order.
    pub fn latest_version(&self) -> Option<&DocumentVersion> {
        self.version_history.iter().max_by_key(|v| v.version)
    }

    /// Total number of registered versions.
    pub fn version_count(&self) -> usize {
        self.version_history.len()
    }
}

/// The disclosure-gated detail record for one version.
///
/// Materialized client-side only after a successful unlock, then cached
/// under its `file_hash` for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDetail {
    pub file_hash: FileHash,
    pub file_name: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Owner email, populated by the admin retrieval path only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    /// Inline text preview for text documents, truncated server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
}

/// One selectable target for update-mode registration.
///
/// The registry returns the latest version of each lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateCandidate {
    pub document_id: DocumentId,
    pub file_name: String,
    pub version: u32,
}

/// One selectable comparison original for verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginalOption {
    pub file_hash: FileHash,
    pub file_name: String,
    pub version: u32,
}

/// Flatten groups into the verify picker's original options.
///
/// Group and history order are preserved as returned by the server.
pub fn flatten_originals(groups: &[DocumentGroup]) -> Vec<OriginalOption> {
    groups
        .iter()
        .flat_map(|g| {
            g.version_history.iter().map(|v| OriginalOption {
                file_hash: v.file_hash.clone(),
                file_name: v.file_name.clone(),
                version: v.version,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hash(fill: char) -> FileHash {
        FileHash::new(fill.to_string().repeat(64)).unwrap()
    }

    fn version(n: u32, fill: char) -> DocumentVersion {
        DocumentVersion {
            file_hash: hash(fill),
            file_name: format!("doc-v{n}.pdf"),
            version: n,
            created_at: Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0).unwrap(),
            signature: None,
            user_email: None,
        }
    }

    mod file_hash_tests {
        use super::*;

        #[test]
        fn normalizes_to_lowercase() {
            let h = FileHash::new("A".repeat(64)).unwrap();
            assert_eq!(h.as_str(), "a".repeat(64));
        }

        #[test]
        fn rejects_wrong_length() {
            assert!(FileHash::new("abc123").is_err());
            assert!(FileHash::new("a".repeat(63)).is_err());
            assert!(FileHash::new("a".repeat(65)).is_err());
        }

        #[test]
        fn rejects_non_hex() {
            assert!(FileHash::new("g".repeat(64)).is_err());
        }

        #[test]
        fn of_bytes_matches_known_digest() {
            // sha256("") is a well-known constant
            assert_eq!(
                FileHash::of_bytes(b"").as_str(),
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            );
        }

        #[test]
        fn short_truncates() {
            let h = FileHash::new("ab".repeat(32)).unwrap();
            assert_eq!(h.short(6), "ababab");
            assert_eq!(h.short(100).len(), 64);
        }

        #[test]
        fn serde_roundtrip() {
            let h = FileHash::new("f".repeat(64)).unwrap();
            let json = serde_json::to_string(&h).unwrap();
            let back: FileHash = serde_json::from_str(&json).unwrap();
            assert_eq!(h, back);
        }

        #[test]
        fn serde_rejects_invalid() {
            assert!(serde_json::from_str::<FileHash>("\"nope\"").is_err());
        }
    }

    mod document_id_tests {
        use super::*;

        #[test]
        fn accepts_uuid() {
            assert!(DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").is_ok());
        }

        #[test]
        fn rejects_non_uuid() {
            assert!(DocumentId::new("").is_err());
            assert!(DocumentId::new("doc-1").is_err());
        }
    }

    mod sort_order_tests {
        use super::*;
        use std::str::FromStr;

        #[test]
        fn display_and_parse() {
            assert_eq!(SortOrder::Latest.to_string(), "latest");
            assert_eq!(SortOrder::Oldest.to_string(), "oldest");
            assert_eq!(SortOrder::from_str("latest").unwrap(), SortOrder::Latest);
            assert_eq!(SortOrder::from_str("oldest").unwrap(), SortOrder::Oldest);
            assert!(SortOrder::from_str("newest").is_err());
        }

        #[test]
        fn default_is_latest() {
            assert_eq!(SortOrder::default(), SortOrder::Latest);
        }
    }

    mod group_tests {
        use super::*;

        #[test]
        fn latest_version_ignores_display_order() {
            // History in "latest first" display order; highest version wins.
            let group = DocumentGroup {
                document_id: DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap(),
                latest_file_name: "doc-v1.pdf".into(),
                version_history: vec![version(3, 'c'), version(1, 'a'), version(2, 'b')],
            };
            assert_eq!(group.latest_version().unwrap().version, 3);
            assert_eq!(group.version_count(), 3);
        }

        #[test]
        fn flatten_preserves_order() {
            let g1 = DocumentGroup {
                document_id: DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap(),
                latest_file_name: "a.pdf".into(),
                version_history: vec![version(1, 'a')],
            };
            let g2 = DocumentGroup {
                document_id: DocumentId::new("7f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap(),
                latest_file_name: "b.pdf".into(),
                version_history: vec![version(2, 'b'), version(1, 'c')],
            };
            let opts = flatten_originals(&[g1, g2]);
            assert_eq!(opts.len(), 3);
            assert_eq!(opts[0].version, 1);
            assert_eq!(opts[1].version, 2);
            assert_eq!(opts[2].file_hash.as_str(), "c".repeat(64));
        }

        #[test]
        fn group_listing_deserializes_wire_shape() {
            let json = r#"{
                "document_id": "6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c",
                "latest_file_name": "contract.pdf",
                "version_history": [
                    {
                        "file_hash": "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
                        "file_name": "contract.pdf",
                        "version": 1,
                        "created_at": "2024-03-01T09:30:00Z",
                        "signature": "deadbeef"
                    }
                ]
            }"#;
            let group: DocumentGroup = serde_json::from_str(json).unwrap();
            assert_eq!(group.latest_file_name, "contract.pdf");
            assert_eq!(
                group.version_history[0].signature.as_deref(),
                Some("deadbeef")
            );
            assert!(group.version_history[0].user_email.is_none());
        }
    }
}
