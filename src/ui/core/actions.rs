use std::sync::Arc;

use crate::models::{Contact, SharedLists, SharedRecord};
use crate::sharing::LiveToggle;
use crate::ui::core::share_dialog::DialogOutcome;

/// One of the two lists in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SidebarSection {
    #[default]
    SharedByMe,
    SharedWithMe,
}

#[derive(Debug, Clone)]
pub enum Action {
    // Toolbar
    Publish,
    ToggleLive,
    LookupCompleted(Option<SharedRecord>),
    Published(SharedRecord),
    LiveToggled(LiveToggle),
    ShareIdle,
    CollaborationIdle,

    // Share dialog
    OpenShare {
        file_id: String,
        title: String,
        is_read_only: bool,
    },
    ShareLoaded(SharedRecord),
    SubmitShare(DialogOutcome),
    ShareSubmitted(Option<SharedRecord>),
    SearchUsers(String),
    UsersFound {
        query: String,
        contacts: Vec<Contact>,
    },

    // Sidebar items
    DeleteFile(String),
    FileDeleted(String),
    OpenPreview(SharedRecord),
    PreviewLoaded {
        file_id: String,
        text: String,
    },
    SavePreviewHtml(String),
    SavePreviewNotebook(String),
    PreviewSaved(String),

    // List refresh
    Refresh,
    ListsUpdated(Arc<SharedLists>),

    // UI operations
    ShowDialog(DialogType),
    HideDialog,
    OperationFailed {
        title: String,
        message: String,
    },
    FocusChanged(bool),

    // App control
    Quit,
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogType {
    Share,
    DeleteConfirmation { file_id: String, title: String },
    Preview { file_id: String },
    Error { title: String, message: String },
    Info(String),
    Logs,
    Help,
}
