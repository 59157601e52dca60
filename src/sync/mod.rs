//! Shared notebooks list kept in sync with the sharing service.
//!
//! [`SharedNotebooksModel`] drives a [`RefreshScheduler`] whose source
//! fetches both the documents the user published and the documents shared
//! with them. The sidebar subscribes to the resulting snapshots.

pub mod poll;

use std::cmp::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use tokio::sync::broadcast;

use crate::backend::{AuthorFilter, SharingBackend};
use crate::models::{SharedLists, SharedRecord};
use poll::{PollConfig, PollState, RefreshScheduler, SnapshotSource};

/// Fetches both sidebar lists from the backend.
pub struct SharedListsSource {
    backend: Arc<dyn SharingBackend>,
}

impl SharedListsSource {
    pub fn new(backend: Arc<dyn SharingBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SnapshotSource for SharedListsSource {
    type Snapshot = SharedLists;

    async fn fetch(&self) -> Result<SharedLists> {
        info!("Fetching shared notebooks");
        let shared_by_me = self
            .backend
            .list_files(AuthorFilter::Me)
            .await
            .context("Failed to fetch notebooks shared by me")?;
        let shared_with_me = self
            .backend
            .list_files(AuthorFilter::Others)
            .await
            .context("Failed to fetch notebooks shared with me")?;
        info!(
            "Fetched {} shared by me, {} shared with me",
            shared_by_me.len(),
            shared_with_me.len()
        );
        Ok(SharedLists {
            shared_by_me,
            shared_with_me,
        })
    }
}

/// Sidebar model: list snapshots plus the per-item remote operations.
pub struct SharedNotebooksModel {
    backend: Arc<dyn SharingBackend>,
    scheduler: RefreshScheduler<SharedListsSource>,
}

impl SharedNotebooksModel {
    pub fn new(backend: Arc<dyn SharingBackend>, config: PollConfig) -> Self {
        let source = SharedListsSource::new(Arc::clone(&backend));
        Self {
            backend,
            scheduler: RefreshScheduler::new(source, config),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<SharedLists>> {
        self.scheduler.subscribe()
    }

    /// Fetch both lists now and wait for the broadcast.
    pub async fn refresh(&self) -> Result<()> {
        self.scheduler.refresh().await
    }

    pub fn latest(&self) -> Option<Arc<SharedLists>> {
        self.scheduler.latest()
    }

    pub fn set_visible(&self, visible: bool) {
        self.scheduler.set_visible(visible);
    }

    pub fn is_visible(&self) -> bool {
        self.scheduler.is_visible()
    }

    pub fn poll_state(&self) -> PollState {
        self.scheduler.state()
    }

    pub async fn get_file(&self, file_id: &str) -> Result<SharedRecord> {
        Ok(self.backend.get_file(file_id).await?)
    }

    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.backend.delete_file(file_id).await?;
        info!("Removed {} from the sharing service", file_id);
        Ok(())
    }

    pub fn is_disposed(&self) -> bool {
        self.scheduler.is_disposed()
    }

    pub fn dispose(&self) {
        self.scheduler.dispose();
    }
}

/// Column a sidebar list is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Title,
    #[default]
    LastModified,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOptions {
    pub column: SortColumn,
    pub desc: bool,
}

impl SortOptions {
    /// Titles compare lexicographically, timestamps numerically.
    pub fn compare(&self, first: &SharedRecord, second: &SharedRecord) -> Ordering {
        let ordering = match self.column {
            SortColumn::Title => first.title.cmp(&second.title),
            SortColumn::LastModified => numeric(&first.last_modified).total_cmp(&numeric(&second.last_modified)),
            SortColumn::Created => numeric(&first.created).total_cmp(&numeric(&second.created)),
        };
        if self.desc {
            ordering.reverse()
        } else {
            ordering
        }
    }

    pub fn sort(&self, records: &mut [SharedRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}

fn numeric(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(0.0)
}
