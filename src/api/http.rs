//! api::http
//!
//! HTTP implementation of the `RegistryApi` trait using reqwest.
//!
//! # Design
//!
//! Every mutating endpoint speaks multipart form bodies with the exact field
//! names of the wire contract; listings are plain GETs with query parameters.
//! The session token travels as the `access_token` cookie the service issued
//! at login.
//!
//! # Error mapping
//!
//! HTTP 401 maps to `ApiError::Unauthorized` before any body parsing so the
//! session-clear rule applies uniformly to every endpoint. Other non-2xx
//! statuses are mined for a `detail` (or `message`) field and surfaced as
//! `ApiError::Rejected`; transport failures become `ApiError::Network`.
//!
//! # Example
//!
//! ```ignore
//! use veridoc::api::http::HttpRegistry;
//! use veridoc::api::{ListQuery, RegistryApi};
//!
//! let registry = HttpRegistry::new("http://127.0.0.1:8000", Some(token));
//! let groups = registry.list_documents(&ListQuery::default()).await?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE, USER_AGENT};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use super::traits::{
    ApiError, ListQuery, LoginResponse, RegisterRequest, RegisterResponse, RegistryApi,
    VerifyRequest, VerifyResponse,
};
use crate::core::types::{DocumentDetail, DocumentGroup, FileHash, SortOrder, UpdateCandidate};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "veridoc-cli";

/// Name of the session cookie the service issues at login.
const SESSION_COOKIE: &str = "access_token";

/// HTTP registry client.
pub struct HttpRegistry {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the registry service
    base_url: String,
    /// Session token (cookie value), absent before login
    token: Option<String>,
}

// Custom Debug to avoid exposing the session token
impl std::fmt::Debug for HttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistry")
            .field("base_url", &self.base_url)
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

/// Error body shape: FastAPI-style `detail`, with `message` as fallback.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentsEnvelope {
    #[serde(default)]
    documents: Vec<DocumentGroup>,
}

#[derive(Debug, Deserialize)]
struct UpdateDocsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    documents: Vec<UpdateCandidate>,
}

#[derive(Debug, Deserialize)]
struct DetailEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    document: Option<DocumentDetail>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AckEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginEnvelope {
    #[serde(default)]
    is_admin: bool,
}

impl HttpRegistry {
    /// Create a registry client for the given base URL.
    ///
    /// `token` is the session cookie value from a prior login, if any.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            token,
        }
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Build common headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        if let Some(ref token) = self.token {
            if let Ok(value) = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")) {
                headers.insert(COOKIE, value);
            }
        }
        headers
    }

    /// Handle an API response, mapping errors per the §7 taxonomy.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            Err(Self::error_from_body(response, status).await)
        }
    }

    /// Mine a non-2xx body for the server's message.
    async fn error_from_body(response: Response, status: StatusCode) -> ApiError {
        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.detail.or(b.message));
        ApiError::rejected(status.as_u16(), message)
    }

    fn document_part(file_name: &str, content: Vec<u8>) -> Part {
        Part::bytes(content).file_name(file_name.to_string())
    }
}

#[async_trait]
impl RegistryApi for HttpRegistry {
    async fn list_documents(&self, query: &ListQuery) -> Result<Vec<DocumentGroup>, ApiError> {
        let response = self
            .client
            .get(self.url("documents"))
            .headers(self.headers())
            .query(&[
                ("sort", query.sort.to_string()),
                ("q", query.query.clone()),
                ("from", query.date_from.clone()),
                ("to", query.date_to.clone()),
                ("admin", if query.admin { "1".into() } else { String::new() }),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let envelope: DocumentsEnvelope = self.handle_response(response).await?;
        Ok(envelope.documents)
    }

    async fn documents_for_update(
        &self,
        sort: SortOrder,
    ) -> Result<Vec<UpdateCandidate>, ApiError> {
        let response = self
            .client
            .get(self.url("documents_for_update"))
            .headers(self.headers())
            .query(&[("sort", sort.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let envelope: UpdateDocsEnvelope = self.handle_response(response).await?;
        if !envelope.success {
            return Ok(Vec::new());
        }
        Ok(envelope.documents)
    }

    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, ApiError> {
        let mut form = Form::new()
            .part(
                "document_file",
                Self::document_part(&request.file_name, request.content.clone()),
            )
            .text("password", request.password.clone())
            .text("upload_type", request.upload_type());
        if let Some(ref target) = request.target_document_id {
            form = form.text("target_document_id", target.to_string());
        }

        let response = self
            .client
            .post(self.url("register"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn verify(&self, request: VerifyRequest) -> Result<VerifyResponse, ApiError> {
        let form = Form::new()
            .text(
                "original_file_hash",
                request.original_file_hash.to_string(),
            )
            .part(
                "document_file",
                Self::document_part(&request.file_name, request.content.clone()),
            );

        let response = self
            .client
            .post(self.url("verify_with_original"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        self.handle_response(response).await
    }

    async fn document_detail(
        &self,
        file_hash: &FileHash,
        password: &str,
    ) -> Result<DocumentDetail, ApiError> {
        let form = Form::new()
            .text("file_hash", file_hash.to_string())
            .text("password", password.to_string());

        let response = self
            .client
            .post(self.url("document_detail"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let envelope: DetailEnvelope = self.handle_response(response).await?;
        match (envelope.success, envelope.document) {
            (true, Some(document)) => Ok(document),
            _ => Err(ApiError::rejected(status, envelope.detail)),
        }
    }

    async fn document_detail_admin(
        &self,
        file_hash: &FileHash,
    ) -> Result<DocumentDetail, ApiError> {
        let form = Form::new().text("file_hash", file_hash.to_string());

        let response = self
            .client
            .post(self.url("document_detail_admin"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let envelope: DetailEnvelope = self.handle_response(response).await?;
        match (envelope.success, envelope.document) {
            (true, Some(document)) => Ok(document),
            _ => Err(ApiError::rejected(status, envelope.detail)),
        }
    }

    async fn delete_document(&self, file_hash: &FileHash) -> Result<(), ApiError> {
        let form = Form::new().text("file_hash", file_hash.to_string());

        let response = self
            .client
            .delete(self.url("document_delete"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let ack: AckEnvelope = self.handle_response(response).await?;
        if !ack.success {
            return Err(ApiError::rejected(status, ack.message));
        }
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let form = Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string());

        let response = self
            .client
            .post(self.url("login"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // Capture the session cookie before the body is consumed.
        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(parse_session_cookie);

        let envelope: LoginEnvelope = self.handle_response(response).await?;
        Ok(LoginResponse {
            is_admin: envelope.is_admin,
            token,
        })
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("logout"))
            .headers(self.headers())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::error_from_body(response, status).await);
        }
        Ok(())
    }

    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let form = Form::new()
            .text("email", email.to_string())
            .text("password", password.to_string());

        let response = self
            .client
            .post(self.url("signup"))
            .headers(self.headers())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(Self::error_from_body(response, status).await);
        }
        Ok(())
    }
}

/// Extract the session token from a `Set-Cookie` header value.
fn parse_session_cookie(header: &str) -> Option<String> {
    let (name, rest) = header.split_once('=')?;
    if name.trim() != SESSION_COOKIE {
        return None;
    }
    let value = rest.split(';').next()?.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
