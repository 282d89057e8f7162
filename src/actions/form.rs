//! actions::form
//!
//! Pending submission state for the register and verify workflows.
//!
//! The form holds at most one selected file; selecting another file always
//! replaces it. Switching tabs discards every pending field, so nothing
//! entered under one workflow can leak into a submission under another.

use crate::core::types::{DocumentId, FileHash};

/// Which workflow the form currently serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Register,
    Verify,
    Lookup,
}

/// Register mode: a fresh lineage, or a new version of an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadMode {
    #[default]
    New,
    Update,
}

/// A file staged for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content: Vec<u8>,
}

/// Ephemeral state for an in-progress register or verify submission.
///
/// Discarded after submission or tab change; never persisted.
#[derive(Debug, Clone)]
pub struct ActionForm {
    tab: ActiveTab,
    file: Option<SelectedFile>,
    password: String,
    mode: UploadMode,
    target_document_id: Option<DocumentId>,
    original_hash: Option<FileHash>,
}

impl ActionForm {
    pub fn new(tab: ActiveTab) -> Self {
        Self {
            tab,
            file: None,
            password: String::new(),
            mode: UploadMode::default(),
            target_document_id: None,
            original_hash: None,
        }
    }

    pub fn tab(&self) -> ActiveTab {
        self.tab
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn target_document_id(&self) -> Option<&DocumentId> {
        self.target_document_id.as_ref()
    }

    pub fn original_hash(&self) -> Option<&FileHash> {
        self.original_hash.as_ref()
    }

    /// Stage a file, replacing any previous selection.
    pub fn select_file(&mut self, name: impl Into<String>, content: Vec<u8>) {
        self.file = Some(SelectedFile {
            name: name.into(),
            content,
        });
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Choose the register mode. Leaving update mode drops the target.
    pub fn set_mode(&mut self, mode: UploadMode) {
        self.mode = mode;
        if mode == UploadMode::New {
            self.target_document_id = None;
        }
    }

    pub fn set_target(&mut self, target: DocumentId) {
        self.target_document_id = Some(target);
    }

    pub fn set_original(&mut self, hash: FileHash) {
        self.original_hash = Some(hash);
    }

    /// Move to another tab, discarding all pending state.
    pub fn switch_tab(&mut self, tab: ActiveTab) {
        *self = Self::new(tab);
    }

    /// What blocks submission, if anything.
    ///
    /// These checks run before any network call; an unfinished form never
    /// costs a server round trip.
    pub fn blocking_reason(&self) -> Option<&'static str> {
        match self.tab {
            ActiveTab::Lookup => Some("nothing to submit"),
            ActiveTab::Register => {
                if self.file.is_none() {
                    Some("no file selected")
                } else if self.password.trim().is_empty() {
                    Some("a password is required")
                } else if self.mode == UploadMode::Update && self.target_document_id.is_none() {
                    Some("no target document selected")
                } else {
                    None
                }
            }
            ActiveTab::Verify => {
                if self.file.is_none() {
                    Some("no file selected")
                } else if self.original_hash.is_none() {
                    Some("no original document selected")
                } else {
                    None
                }
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        self.blocking_reason().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> DocumentId {
        DocumentId::new("6f2b4a1e-3c5d-4f6a-8b9c-0d1e2f3a4b5c").unwrap()
    }

    fn hash() -> FileHash {
        FileHash::new("a".repeat(64)).unwrap()
    }

    #[test]
    fn register_new_needs_file_and_password() {
        let mut form = ActionForm::new(ActiveTab::Register);
        assert_eq!(form.blocking_reason(), Some("no file selected"));

        form.select_file("a.pdf", vec![1]);
        assert_eq!(form.blocking_reason(), Some("a password is required"));

        form.set_password("pw");
        assert!(form.can_submit());
    }

    #[test]
    fn register_update_additionally_needs_target() {
        let mut form = ActionForm::new(ActiveTab::Register);
        form.select_file("a.pdf", vec![1]);
        form.set_password("pw");
        form.set_mode(UploadMode::Update);
        assert_eq!(form.blocking_reason(), Some("no target document selected"));

        form.set_target(target());
        assert!(form.can_submit());
    }

    #[test]
    fn leaving_update_mode_drops_target() {
        let mut form = ActionForm::new(ActiveTab::Register);
        form.set_mode(UploadMode::Update);
        form.set_target(target());

        form.set_mode(UploadMode::New);
        assert!(form.target_document_id().is_none());
    }

    #[test]
    fn verify_needs_file_and_original() {
        let mut form = ActionForm::new(ActiveTab::Verify);
        form.select_file("a.pdf", vec![1]);
        assert_eq!(form.blocking_reason(), Some("no original document selected"));

        form.set_original(hash());
        assert!(form.can_submit());
    }

    #[test]
    fn selecting_a_file_replaces_the_previous_one() {
        let mut form = ActionForm::new(ActiveTab::Register);
        form.select_file("first.pdf", vec![1]);
        form.select_file("second.pdf", vec![2]);

        let file = form.file().unwrap();
        assert_eq!(file.name, "second.pdf");
        assert_eq!(file.content, vec![2]);
    }

    #[test]
    fn switch_tab_discards_pending_state() {
        let mut form = ActionForm::new(ActiveTab::Register);
        form.select_file("a.pdf", vec![1]);
        form.set_password("pw");
        form.set_mode(UploadMode::Update);
        form.set_target(target());

        form.switch_tab(ActiveTab::Verify);
        assert_eq!(form.tab(), ActiveTab::Verify);
        assert!(form.file().is_none());
        assert!(form.password().is_empty());
        assert!(form.target_document_id().is_none());
    }

    #[test]
    fn lookup_tab_never_submits() {
        let form = ActionForm::new(ActiveTab::Lookup);
        assert!(!form.can_submit());
    }
}
