//! Button routing of the share dialog.
//!
//! The dialog is `Open` while the user edits. Copy buttons act immediately
//! and keep it open; `Done` closes it only when the draft is valid. A
//! dismiss (Esc, backdrop, close icon) with unsaved changes parks the dialog
//! in `PendingClose` until the user picks Cancel or Discard.

use std::sync::Arc;

use log::{info, warn};

use super::form_state::{DraftEdit, FormState};
use crate::backend::http::join_url;
use crate::clipboard::Clipboard;
use crate::constants::{COPY_LINK, COPY_LINK_NO_CODE, COPY_LIVE_LINK, DONE, INFO_LINK_COPIED, NO_CODE_QUERY};
use crate::models::SharedRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogButton {
    CopyLink,
    CopyLinkNoCode,
    CopyLiveLink,
    Done,
}

impl DialogButton {
    pub const ALL: [DialogButton; 4] = [
        DialogButton::CopyLink,
        DialogButton::CopyLinkNoCode,
        DialogButton::CopyLiveLink,
        DialogButton::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DialogButton::CopyLink => COPY_LINK,
            DialogButton::CopyLinkNoCode => COPY_LINK_NO_CODE,
            DialogButton::CopyLiveLink => COPY_LIVE_LINK,
            DialogButton::Done => DONE,
        }
    }
}

/// Where a click landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Button(DialogButton),
    /// Dialog content that is not a button
    Content,
    /// Outside the dialog content
    Backdrop,
    /// Inside the discard confirmation popup, outside its buttons
    ConfirmationPopup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Open,
    PendingClose,
    Closed,
}

/// How the dialog ended.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogOutcome {
    /// `Done` with a valid draft; the caller pushes an update when dirty
    Accepted { value: SharedRecord, is_dirty: bool },
    /// Unsaved changes thrown away from the confirmation
    Discarded,
    /// Closed without changes
    Dismissed,
}

/// Feedback line shown under the dialog body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineMessage {
    Info(String),
    Error(String),
}

/// Result of routing one input.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent {
    Copied(String),
    CopyFailed(String),
    /// Accept refused; carries the validation error
    Rejected(&'static str),
    ConfirmDiscard,
    Resumed,
    Closed(DialogOutcome),
    Ignored,
}

pub struct ShareDialogController {
    record: SharedRecord,
    draft: DraftEdit,
    state: DialogState,
    outcome: Option<DialogOutcome>,
    message: Option<InlineMessage>,
    clipboard: Arc<dyn Clipboard>,
}

impl ShareDialogController {
    pub fn new(record: SharedRecord, clipboard: Arc<dyn Clipboard>) -> Self {
        Self {
            draft: DraftEdit::from_record(&record),
            record,
            state: DialogState::Open,
            outcome: None,
            message: None,
            clipboard,
        }
    }

    pub fn title(&self) -> String {
        let verb = if self.record.is_read_only { "View" } else { "Share" };
        format!("{} \"{}\"", verb, self.record.display_title())
    }

    pub fn record(&self) -> &SharedRecord {
        &self.record
    }

    pub fn draft(&self) -> &DraftEdit {
        &self.draft
    }

    /// Mutable draft while the dialog is open and the record is editable.
    pub fn draft_mut(&mut self) -> Option<&mut DraftEdit> {
        if self.state != DialogState::Open || self.record.is_read_only {
            return None;
        }
        self.message = None;
        Some(&mut self.draft)
    }

    pub fn form_state(&self) -> FormState {
        FormState::derive(&self.record, &self.draft)
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn message(&self) -> Option<&InlineMessage> {
        self.message.as_ref()
    }

    pub fn outcome(&self) -> Option<&DialogOutcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<DialogOutcome> {
        self.outcome
    }

    /// Text a copy button puts on the clipboard.
    pub fn link_for(&self, button: DialogButton) -> Option<String> {
        let link = &self.record.shareable_link;
        match button {
            DialogButton::CopyLink => Some(link.clone()),
            DialogButton::CopyLinkNoCode => {
                let separator = if link.contains('?') { '&' } else { '?' };
                Some(format!("{link}{separator}{NO_CODE_QUERY}"))
            }
            DialogButton::CopyLiveLink => Some(join_url(
                &self.record.author_server_url,
                &format!("collaboration/{}", self.record.id),
            )),
            DialogButton::Done => None,
        }
    }

    /// Route a click anywhere on screen.
    pub fn handle_click(&mut self, target: ClickTarget) -> DialogEvent {
        match target {
            ClickTarget::Button(button) => self.press(button),
            ClickTarget::Backdrop => self.dismiss(),
            ClickTarget::Content | ClickTarget::ConfirmationPopup => DialogEvent::Ignored,
        }
    }

    /// Activate a dialog button.
    pub fn press(&mut self, button: DialogButton) -> DialogEvent {
        if self.state != DialogState::Open {
            return DialogEvent::Ignored;
        }

        if let Some(link) = self.link_for(button) {
            return match self.clipboard.copy(&link) {
                Ok(()) => {
                    info!("Copied {} for {}", button.label(), self.record.id);
                    self.message = Some(InlineMessage::Info(INFO_LINK_COPIED.to_string()));
                    DialogEvent::Copied(link)
                }
                Err(e) => {
                    warn!("Copy to clipboard failed: {}", e);
                    self.message = Some(InlineMessage::Error(e.to_string()));
                    DialogEvent::CopyFailed(e.to_string())
                }
            };
        }

        let form = self.form_state();
        if let Some(error) = form.error.filter(|_| !form.is_valid) {
            self.message = Some(InlineMessage::Error(error.to_string()));
            return DialogEvent::Rejected(error);
        }

        let value = self.draft.apply_to(&self.record);
        self.close(DialogOutcome::Accepted {
            value,
            is_dirty: form.is_dirty,
        })
    }

    /// Escape key, backdrop click or close icon.
    pub fn dismiss(&mut self) -> DialogEvent {
        match self.state {
            DialogState::Open if self.form_state().is_dirty => {
                self.state = DialogState::PendingClose;
                DialogEvent::ConfirmDiscard
            }
            DialogState::Open => self.close(DialogOutcome::Dismissed),
            DialogState::PendingClose | DialogState::Closed => DialogEvent::Ignored,
        }
    }

    /// "Cancel" in the discard confirmation; the draft is kept.
    pub fn cancel_discard(&mut self) -> DialogEvent {
        if self.state != DialogState::PendingClose {
            return DialogEvent::Ignored;
        }
        self.state = DialogState::Open;
        DialogEvent::Resumed
    }

    /// "Discard" in the discard confirmation.
    pub fn confirm_discard(&mut self) -> DialogEvent {
        if self.state != DialogState::PendingClose {
            return DialogEvent::Ignored;
        }
        self.close(DialogOutcome::Discarded)
    }

    fn close(&mut self, outcome: DialogOutcome) -> DialogEvent {
        self.state = DialogState::Closed;
        self.outcome = Some(outcome.clone());
        DialogEvent::Closed(outcome)
    }
}
