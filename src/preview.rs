//! Read-only preview of a shared notebook.
//!
//! The rendered HTML is fetched once per model. Both save actions pick a
//! non-colliding file name in the target directory and run under an
//! [`AsyncActionController`], raising a saving flag for their duration.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use tokio::sync::OnceCell;

use crate::backend::SharingBackend;
use crate::constants::{ERROR_SAVE_FAILED, PREVIEW_TEXT_WIDTH, SUCCESS_SAVED, TOAST_SAVING};
use crate::models::{Contact, SharedRecord};
use crate::sharing::SharingService;
use crate::ui::core::async_action::ActionOptions;
use crate::utils::datetime::format_local;
use crate::utils::files::{existing_names, generate_file_name};

const DEFAULT_HTML_NAME: &str = "Untitled.html";

/// Resets a saving flag when the save finishes, whatever the outcome.
struct SavingGuard<'a>(&'a AtomicBool);

impl<'a> SavingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct PreviewModel {
    record: SharedRecord,
    service: SharingService,
    html: OnceCell<String>,
    saving_html: AtomicBool,
    saving_notebook: AtomicBool,
}

impl PreviewModel {
    pub fn new(record: SharedRecord, service: SharingService) -> Self {
        Self {
            record,
            service,
            html: OnceCell::new(),
            saving_html: AtomicBool::new(false),
            saving_notebook: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn record(&self) -> &SharedRecord {
        &self.record
    }

    fn backend(&self) -> &Arc<dyn SharingBackend> {
        self.service.backend()
    }

    /// Preview HTML, fetched on first call. A failed fetch yields the error text.
    pub async fn fetch(&self) -> &str {
        self.html
            .get_or_init(|| async {
                match self.backend().preview_file(&self.record.id).await {
                    Ok(response) => response.html,
                    Err(e) => {
                        warn!("Preview of {} failed: {}", self.record.id, e);
                        e.to_string()
                    }
                }
            })
            .await
    }

    /// Content fetched so far, if any.
    pub fn data(&self) -> Option<&str> {
        self.html.get().map(String::as_str)
    }

    pub fn is_ready(&self) -> bool {
        self.html.initialized()
    }

    pub fn is_saving_html(&self) -> bool {
        self.saving_html.load(Ordering::SeqCst)
    }

    pub fn is_saving_notebook(&self) -> bool {
        self.saving_notebook.load(Ordering::SeqCst)
    }

    /// "Last updated" label and its tooltip naming the author.
    pub fn last_updated(&self) -> (String, String) {
        let when = self
            .record
            .last_modified_at()
            .map(format_local)
            .unwrap_or_else(|| "Unknown".to_string());
        let author = Contact::parse_author(&self.record.author);
        let author = if author.name.is_empty() {
            "Unknown".to_string()
        } else {
            author.name
        };
        (format!("Last updated: {when}"), format!("Updated by {author} on {when}"))
    }

    fn save_options(&self) -> ActionOptions {
        ActionOptions::new(TOAST_SAVING)
            .success_message(SUCCESS_SAVED)
            .failure_message(ERROR_SAVE_FAILED)
    }

    /// Write the preview HTML into `dir`. `None` when a save is already running.
    pub async fn save_html(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(_guard) = SavingGuard::raise(&self.saving_html) else {
            return Ok(None);
        };

        let html = self.fetch().await.to_string();
        let target = dir.join(generate_file_name(DEFAULT_HTML_NAME, &existing_names(dir)));
        let write_target = target.clone();

        self.service
            .controller(self.save_options())
            .start(async move { tokio::fs::write(&write_target, html).await })
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        info!("Saved preview of {} to {}", self.record.id, target.display());
        Ok(Some(target))
    }

    /// Ask the server to save the notebook into `dir`. `None` when a save is
    /// already running.
    pub async fn save_notebook(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let Some(_guard) = SavingGuard::raise(&self.saving_notebook) else {
            return Ok(None);
        };

        let name = generate_file_name(self.record.display_title(), &existing_names(dir));
        let target = dir.join(name);
        let path = target.to_string_lossy().into_owned();
        let backend = Arc::clone(self.backend());
        let id = self.record.id.clone();

        self.service
            .controller(self.save_options())
            .start(async move { backend.download_file(&id, &path).await })
            .await
            .with_context(|| format!("Failed to save {}", target.display()))?;

        info!("Saved notebook {} to {}", self.record.id, target.display());
        Ok(Some(target))
    }
}

/// Render preview HTML as plain text for the terminal.
pub fn html_to_text(html: &str) -> String {
    let text = html2text::from_read(html.as_bytes(), PREVIEW_TEXT_WIDTH);

    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    lines.dedup_by(|a, b| a.is_empty() && b.is_empty());
    lines.join("\n").trim().to_string()
}
