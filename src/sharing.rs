//! Sharing workflows triggered from the toolbar and the sidebar.
//!
//! Each network action runs under an [`AsyncActionController`] so progress
//! is visible, and its error is returned to the caller, which decides
//! whether to raise an error dialog.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::backend::SharingBackend;
use crate::constants::{RTC_DRIVE_PREFIX, TOAST_DISMISS_DELAY, TOAST_SHARING};
use crate::models::{Contact, SharedRecord, UpdateRequest};
use crate::ui::core::async_action::{ActionOptions, AsyncActionController, OverlayHost};
use crate::ui::core::share_dialog::DialogOutcome;
use crate::utils::files::load_notebook;

/// Remove the real-time collaboration drive prefix from a document path.
pub fn strip_drive_prefix(path: &str) -> &str {
    path.strip_prefix(RTC_DRIVE_PREFIX).unwrap_or(path)
}

/// Result of flipping live collaboration on a document.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveToggle {
    pub record: SharedRecord,
    pub live_enabled: bool,
    /// Enabling with nobody but the owner; the share dialog should be raised
    pub needs_collaborators: bool,
}

#[derive(Clone)]
pub struct SharingService {
    backend: Arc<dyn SharingBackend>,
    overlay: Arc<dyn OverlayHost>,
    dismiss_delay: Duration,
}

impl SharingService {
    pub fn new(backend: Arc<dyn SharingBackend>, overlay: Arc<dyn OverlayHost>) -> Self {
        Self {
            backend,
            overlay,
            dismiss_delay: TOAST_DISMISS_DELAY,
        }
    }

    pub fn with_dismiss_delay(mut self, delay: Duration) -> Self {
        self.dismiss_delay = delay;
        self
    }

    pub fn backend(&self) -> &Arc<dyn SharingBackend> {
        &self.backend
    }

    pub fn overlay(&self) -> &Arc<dyn OverlayHost> {
        &self.overlay
    }

    /// Controller for one action, using this service's overlay and delay.
    pub fn controller(&self, options: ActionOptions) -> AsyncActionController {
        AsyncActionController::new(Arc::clone(&self.overlay), options).with_dismiss_delay(self.dismiss_delay)
    }

    /// Published record of a local document, if any. Failures are logged only.
    pub async fn lookup(&self, path: &str) -> Option<SharedRecord> {
        let path = strip_drive_prefix(path);
        match self.backend.file_by_path(path, false).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Could not look up sharing state of {}: {}", path, e);
                None
            }
        }
    }

    /// Publish a local notebook.
    pub async fn publish(&self, path: &Path) -> Result<SharedRecord> {
        let model = load_notebook(path)?;
        let options = ActionOptions::new(TOAST_SHARING).tooltip(format!("Sharing \"{}\"", model.name));

        let backend = Arc::clone(&self.backend);
        let record = self
            .controller(options)
            .start(async move { backend.publish_file(&model).await })
            .await
            .with_context(|| format!("Failed to publish {}", path.display()))?;

        info!("Published {} as {} (version {})", path.display(), record.id, record.version);
        Ok(record)
    }

    /// Enable or disable real-time collaboration on a published document.
    pub async fn toggle_live(&self, path: &str, label: &str, currently_enabled: bool) -> Result<LiveToggle> {
        let path = strip_drive_prefix(path).to_string();
        let action_text = if currently_enabled { "Disabling" } else { "Enabling" };
        let options = || {
            ActionOptions::new(format!("{action_text} real-time-collaboration"))
                .tooltip(format!("{action_text} RTC in \"{label}\""))
        };

        let backend = Arc::clone(&self.backend);
        let lookup_path = path.clone();
        let record = self
            .controller(options())
            .start(async move { backend.file_by_path(&lookup_path, true).await })
            .await?
            .with_context(|| format!("{path} has not been shared yet"))?;

        let needs_collaborators = !currently_enabled && record.collaborators.len() <= 1;
        let live_enabled = !record.live_enabled;

        let backend = Arc::clone(&self.backend);
        let update = UpdateRequest::live_only(&record, live_enabled);
        let record = self
            .controller(options())
            .start(async move { backend.update_file(&update).await })
            .await?;

        info!("Live collaboration on {} is now {}", path, if live_enabled { "on" } else { "off" });
        Ok(LiveToggle {
            record,
            live_enabled,
            needs_collaborators,
        })
    }

    /// Fetch a record for the share dialog.
    pub async fn open_share(&self, file_id: &str, title: &str, is_read_only: bool) -> Result<SharedRecord> {
        let options = ActionOptions::new(TOAST_SHARING).tooltip(format!("Sharing \"{title}\""));
        let backend = Arc::clone(&self.backend);
        let id = file_id.to_string();
        let record = self
            .controller(options)
            .start(async move { backend.get_file(&id).await })
            .await?;
        Ok(SharedRecord { is_read_only, ..record })
    }

    /// Push the dialog's result when it was accepted with changes.
    ///
    /// Returns the updated record, or `None` when nothing had to be sent.
    pub async fn submit(&self, outcome: &DialogOutcome) -> Result<Option<SharedRecord>> {
        let value = match outcome {
            DialogOutcome::Accepted { value, is_dirty: true } if !value.is_read_only => value,
            _ => return Ok(None),
        };

        let update = UpdateRequest::from_record(value);
        let options = ActionOptions::new("Updating sharing settings")
            .tooltip(format!("Updating \"{}\"", value.display_title()))
            .failure_message_with(|error| format!("Update failed: {error}"));
        let backend = Arc::clone(&self.backend);
        let record = self
            .controller(options)
            .start(async move { backend.update_file(&update).await })
            .await?;

        info!("Updated sharing settings of {}", record.id);
        Ok(Some(record))
    }

    pub async fn delete(&self, file_id: &str) -> Result<()> {
        self.backend.delete_file(file_id).await?;
        info!("Unshared {}", file_id);
        Ok(())
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<Contact>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.backend.search_users(query.trim()).await?)
    }
}
