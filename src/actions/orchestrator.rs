//! actions::orchestrator
//!
//! Submits register/verify forms and classifies the result.
//!
//! # Classification
//!
//! A submission counts as successful only when the request was
//! HTTP-successful AND the payload does not flag failure: `success` must not
//! be false, and for verify `is_valid` must not be false either. A
//! well-formed comparison against a tampered file comes back as
//! `{success: true, is_valid: false}` and is a failure here. Transport
//! errors and server rejections fold into a failure outcome carrying the
//! best available message; only `Unauthorized` escapes, for the global
//! session-clear rule.
//!
//! A successful register triggers a listing refresh through the shared
//! fetcher, which resets pagination and supersedes any in-flight listing
//! request.

use std::sync::Arc;
use thiserror::Error;

use super::form::{ActionForm, ActiveTab};
use crate::api::{ApiError, ListQuery, RegisterRequest, RegistryApi, VerifyRequest};
use crate::core::types::FileHash;
use crate::lookup::ListFetcher;
use crate::session::SessionStore;

/// Submission failures that are not expressible as an outcome.
#[derive(Debug, Clone, Error)]
pub enum ActionError {
    /// The form's readiness predicate failed; nothing was sent.
    #[error("{0}")]
    NotReady(String),

    /// The session is gone; caller runs the global session-clear rule.
    #[error("authentication required")]
    Unauthorized,
}

/// Deletion failures.
#[derive(Debug, Clone, Error)]
pub enum DeleteError {
    /// Deletion requires the detail to be disclosed first.
    #[error("document detail has not been disclosed")]
    NotDisclosed,

    #[error("authentication required")]
    Unauthorized,

    #[error("{0}")]
    Failed(String),
}

/// Classified result of one register or verify submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub success: bool,
    pub file_name: Option<String>,
    pub message: String,
    /// Hash the server recorded for a register.
    pub submitted_hash: Option<FileHash>,
    /// Hash computed from the uploaded bytes during a verify.
    pub uploaded_hash: Option<FileHash>,
}

impl ActionOutcome {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            file_name: None,
            message,
            submitted_hash: None,
            uploaded_hash: None,
        }
    }
}

/// Drives the register and verify workflows against the API.
pub struct ActionOrchestrator {
    api: Arc<dyn RegistryApi>,
    fetcher: Arc<ListFetcher>,
}

impl ActionOrchestrator {
    pub fn new(api: Arc<dyn RegistryApi>, fetcher: Arc<ListFetcher>) -> Self {
        Self { api, fetcher }
    }

    /// Submit the form's workflow and classify the result.
    ///
    /// Consumes the form: pending state is discarded after submission either
    /// way. On a successful register the shared listing is refreshed with
    /// `query`.
    ///
    /// # Errors
    ///
    /// `NotReady` when the readiness predicate fails (no network call);
    /// `Unauthorized` when the session is gone.
    pub async fn submit(
        &self,
        form: ActionForm,
        query: &ListQuery,
    ) -> Result<ActionOutcome, ActionError> {
        if let Some(reason) = form.blocking_reason() {
            return Err(ActionError::NotReady(reason.to_string()));
        }

        match form.tab() {
            ActiveTab::Register => self.submit_register(form, query).await,
            ActiveTab::Verify => self.submit_verify(form).await,
            // Unreachable past the readiness check; kept total.
            ActiveTab::Lookup => Err(ActionError::NotReady("nothing to submit".to_string())),
        }
    }

    async fn submit_register(
        &self,
        form: ActionForm,
        query: &ListQuery,
    ) -> Result<ActionOutcome, ActionError> {
        let file = match form.file() {
            Some(file) => file.clone(),
            None => return Err(ActionError::NotReady("no file selected".to_string())),
        };
        let request = RegisterRequest {
            file_name: file.name,
            content: file.content,
            password: form.password().to_string(),
            target_document_id: form.target_document_id().cloned(),
        };

        let response = match self.api.register(request).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(ActionError::Unauthorized),
            Err(err) => return Ok(ActionOutcome::failure(err.to_string())),
        };

        if !response.success {
            return Ok(ActionOutcome::failure(
                response
                    .message
                    .unwrap_or_else(|| "registration was not accepted".to_string()),
            ));
        }

        // The list just changed server-side; refresh resets pagination and
        // supersedes any in-flight listing request.
        match self.fetcher.refresh(query).await {
            Ok(_) => {}
            Err(ApiError::Unauthorized) => return Err(ActionError::Unauthorized),
            Err(_) => {}
        }

        Ok(ActionOutcome {
            success: true,
            file_name: response.file_name,
            message: response
                .message
                .unwrap_or_else(|| "document registered".to_string()),
            submitted_hash: response.submitted_hash,
            uploaded_hash: None,
        })
    }

    async fn submit_verify(&self, form: ActionForm) -> Result<ActionOutcome, ActionError> {
        let (file, original) = match (form.file(), form.original_hash()) {
            (Some(file), Some(original)) => (file.clone(), original.clone()),
            _ => return Err(ActionError::NotReady("verify form incomplete".to_string())),
        };
        let request = VerifyRequest {
            original_file_hash: original,
            file_name: file.name,
            content: file.content,
        };

        let response = match self.api.verify(request).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized) => return Err(ActionError::Unauthorized),
            Err(err) => return Ok(ActionOutcome::failure(err.to_string())),
        };

        let authentic = response.success && response.is_valid != Some(false);
        Ok(ActionOutcome {
            success: authentic,
            file_name: response.file_name,
            message: response.message.unwrap_or_else(|| {
                if authentic {
                    "the document matches the registered original".to_string()
                } else {
                    "the document does not match the registered original".to_string()
                }
            }),
            submitted_hash: response.original_hash,
            uploaded_hash: response.uploaded_hash,
        })
    }

    /// Delete the version identified by `hash`.
    ///
    /// Requires the detail to be disclosed in the session first. The caller
    /// is responsible for confirming destructive intent, including the
    /// warning that deleting version 1 removes the whole lineage. On success
    /// the cached detail is dropped and the listing refreshed.
    pub async fn delete(
        &self,
        session: &mut SessionStore,
        hash: &FileHash,
        query: &ListQuery,
    ) -> Result<(), DeleteError> {
        if session.disclosed(hash).is_none() {
            return Err(DeleteError::NotDisclosed);
        }

        match self.api.delete_document(hash).await {
            Ok(()) => {}
            Err(ApiError::Unauthorized) => return Err(DeleteError::Unauthorized),
            Err(err) => return Err(DeleteError::Failed(err.to_string())),
        }

        session.forget(hash);
        match self.fetcher.refresh(query).await {
            Ok(_) => Ok(()),
            Err(ApiError::Unauthorized) => Err(DeleteError::Unauthorized),
            Err(_) => Ok(()),
        }
    }
}
