//! Draft edits of a share dialog and the state derived from them.

use std::collections::HashMap;

use crate::constants::ERROR_INVALID_EMAILS;
use crate::models::{Collaborator, Contact, SharedRecord};

/// Client-local working copy of a record's sharing settings.
///
/// Only user interaction mutates a draft; it is merged into an update
/// request when the dialog is accepted and dropped otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftEdit {
    pub collaborators: Vec<Collaborator>,
    pub live_enabled: bool,
}

impl DraftEdit {
    /// Start a draft from the server snapshot.
    pub fn from_record(record: &SharedRecord) -> Self {
        Self {
            collaborators: record.collaborators.clone(),
            live_enabled: record.live_enabled,
        }
    }

    /// Add a contact as viewer; returns false when it is already present.
    ///
    /// Contacts without an id (typed emails with no matching user) are
    /// accepted and make the draft invalid until removed.
    pub fn add(&mut self, contact: Contact) -> bool {
        if !contact.id.is_empty() && self.collaborators.iter().any(|c| c.id == contact.id) {
            return false;
        }
        if contact.id.is_empty() && self.collaborators.iter().any(|c| c.id.is_empty() && c.email == contact.email) {
            return false;
        }
        self.collaborators.push(Collaborator::from_contact(contact));
        true
    }

    /// Remove the collaborator at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<Collaborator> {
        (index < self.collaborators.len()).then(|| self.collaborators.remove(index))
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.collaborators.len();
        self.collaborators.retain(|c| c.id != id);
        before != self.collaborators.len()
    }

    /// Grant or revoke editor access.
    pub fn set_editor(&mut self, id: &str, editor: bool) -> bool {
        match self.collaborators.iter_mut().find(|c| c.id == id) {
            Some(collaborator) => {
                collaborator.set_editor(editor);
                true
            }
            None => false,
        }
    }

    pub fn set_live_enabled(&mut self, enabled: bool) {
        self.live_enabled = enabled;
    }

    /// The record as it would look once this draft is applied.
    pub fn apply_to(&self, record: &SharedRecord) -> SharedRecord {
        SharedRecord {
            collaborators: self.collaborators.clone(),
            live_enabled: self.live_enabled,
            ..record.clone()
        }
    }
}

/// Whether a draft differs from the server and may be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub is_dirty: bool,
    pub is_valid: bool,
    pub error: Option<&'static str>,
}

impl FormState {
    /// Derive the form state; pure, recompute it on every change.
    pub fn derive(original: &SharedRecord, draft: &DraftEdit) -> Self {
        let is_valid = draft
            .collaborators
            .iter()
            .all(|c| !c.id.is_empty() && !c.email.is_empty());

        Self {
            is_dirty: is_dirty(original, draft),
            is_valid,
            error: (!is_valid).then_some(ERROR_INVALID_EMAILS),
        }
    }
}

fn is_dirty(original: &SharedRecord, draft: &DraftEdit) -> bool {
    if draft.live_enabled != original.live_enabled {
        return true;
    }
    if draft.collaborators.len() != original.collaborators.len() {
        return true;
    }

    let server: HashMap<&str, &Collaborator> = original.collaborators.iter().map(|c| (c.id.as_str(), c)).collect();

    draft.collaborators.iter().any(|edited| match server.get(edited.id.as_str()) {
        None => true,
        // BTreeSet iteration is sorted, so equality compares sorted permission lists
        Some(known) => known.permissions != edited.permissions,
    })
}
