//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use nbshare::backend::{AuthorFilter, BackendError, SharingBackend};
use nbshare::clipboard::Clipboard;
use nbshare::models::{Collaborator, Contact, ContentsModel, PreviewResponse, SharedRecord, UpdateRequest};
use nbshare::ui::core::async_action::{DismissHandle, OverlayHost, Toast, ToastId};

pub fn collaborator(id: &str) -> Collaborator {
    Collaborator {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        permissions: Default::default(),
    }
}

pub fn contact(id: &str) -> Contact {
    Contact {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
    }
}

pub fn record(id: &str, collaborators: &[&str]) -> SharedRecord {
    SharedRecord {
        id: id.to_string(),
        author: r#"{"id":"owner","name":"Owner","email":"owner@example.com"}"#.to_string(),
        created: "1661366434955".to_string(),
        last_modified: "1661471195080".to_string(),
        version: 1,
        title: format!("{id}.ipynb"),
        shareable_link: format!("https://share.example.com/{id}/preview"),
        collaborators: collaborators.iter().map(|c| collaborator(c)).collect(),
        author_server_url: "https://share.example.com".to_string(),
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub records: Mutex<HashMap<String, SharedRecord>>,
    /// Local path to record id
    pub paths: Mutex<HashMap<String, String>>,
    pub users: Mutex<Vec<Contact>>,
    pub shared_by_me: Mutex<Vec<SharedRecord>>,
    pub shared_with_me: Mutex<Vec<SharedRecord>>,
    pub updates: Mutex<Vec<UpdateRequest>>,
    pub published: Mutex<Vec<ContentsModel>>,
    pub downloads: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<String>>,
    pub preview_html: Mutex<String>,
    pub fail_with: Mutex<Option<BackendError>>,
    pub preview_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn with_record(record: SharedRecord, path: &str) -> Self {
        let backend = Self::default();
        backend.insert(record, Some(path));
        backend
    }

    pub fn insert(&self, record: SharedRecord, path: Option<&str>) {
        if let Some(path) = path {
            self.paths.lock().unwrap().insert(path.to_string(), record.id.clone());
        }
        self.records.lock().unwrap().insert(record.id.clone(), record);
    }

    pub fn fail(&self, error: BackendError) {
        *self.fail_with.lock().unwrap() = Some(error);
    }

    pub fn updates(&self) -> Vec<UpdateRequest> {
        self.updates.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), BackendError> {
        match self.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn find(&self, file_id: &str) -> Result<SharedRecord, BackendError> {
        self.records
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(file_id.to_string()))
    }
}

#[async_trait]
impl SharingBackend for FakeBackend {
    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, BackendError> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.name.contains(query) || c.email.contains(query))
            .cloned()
            .collect())
    }

    async fn publish_file(&self, model: &ContentsModel) -> Result<SharedRecord, BackendError> {
        self.check()?;
        self.published.lock().unwrap().push(model.clone());
        let mut published = record("published", &[]);
        published.title = model.name.clone();
        self.insert(published.clone(), Some(&model.path));
        Ok(published)
    }

    async fn file_by_path(&self, path: &str, _with_collaborators: bool) -> Result<Option<SharedRecord>, BackendError> {
        self.check()?;
        let id = self.paths.lock().unwrap().get(path).cloned();
        match id {
            Some(id) => Ok(Some(self.find(&id)?)),
            None => Ok(None),
        }
    }

    async fn get_file(&self, file_id: &str) -> Result<SharedRecord, BackendError> {
        self.check()?;
        self.find(file_id)
    }

    async fn update_file(&self, update: &UpdateRequest) -> Result<SharedRecord, BackendError> {
        self.check()?;
        self.updates.lock().unwrap().push(update.clone());
        let mut record = self.find(&update.id)?;
        if let Some(collaborators) = &update.collaborators {
            record.collaborators = collaborators.clone();
        }
        if let Some(live_enabled) = update.live_enabled {
            record.live_enabled = live_enabled;
        }
        record.version += 1;
        self.insert(record.clone(), None);
        Ok(record)
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError> {
        self.check()?;
        self.deleted.lock().unwrap().push(file_id.to_string());
        self.records.lock().unwrap().remove(file_id);
        Ok(())
    }

    async fn preview_file(&self, file_id: &str) -> Result<PreviewResponse, BackendError> {
        self.preview_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let record = self.find(file_id)?;
        Ok(PreviewResponse {
            id: record.id,
            title: record.title,
            html: self.preview_html.lock().unwrap().clone(),
            ..Default::default()
        })
    }

    async fn download_file(&self, file_id: &str, path: &str) -> Result<(), BackendError> {
        self.check()?;
        self.downloads.lock().unwrap().push((file_id.to_string(), path.to_string()));
        Ok(())
    }

    async fn list_files(&self, author: AuthorFilter) -> Result<Vec<SharedRecord>, BackendError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(match author {
            AuthorFilter::Me => self.shared_by_me.lock().unwrap().clone(),
            AuthorFilter::Others => self.shared_with_me.lock().unwrap().clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    Attached(Toast),
    Updated(Toast),
    Detached(ToastId),
}

/// Overlay host that records every call and keeps the handles it was given.
#[derive(Default)]
pub struct RecordingOverlay {
    pub events: Mutex<Vec<OverlayEvent>>,
    pub handles: Mutex<Vec<DismissHandle>>,
}

impl RecordingOverlay {
    pub fn events(&self) -> Vec<OverlayEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn last_handle(&self) -> Option<DismissHandle> {
        self.handles.lock().unwrap().last().cloned()
    }

    pub fn attached_titles(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                OverlayEvent::Attached(toast) => Some(toast.title),
                _ => None,
            })
            .collect()
    }
}

impl OverlayHost for RecordingOverlay {
    fn attach(&self, toast: Toast, handle: DismissHandle) {
        self.events.lock().unwrap().push(OverlayEvent::Attached(toast));
        self.handles.lock().unwrap().push(handle);
    }

    fn update(&self, toast: Toast) {
        self.events.lock().unwrap().push(OverlayEvent::Updated(toast));
    }

    fn detach(&self, id: ToastId) {
        self.events.lock().unwrap().push(OverlayEvent::Detached(id));
    }
}

/// Clipboard that remembers what was copied, or refuses when `fail` is set.
#[derive(Default)]
pub struct RecordingClipboard {
    pub copied: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingClipboard {
    pub fn copied(&self) -> Vec<String> {
        self.copied.lock().unwrap().clone()
    }
}

impl Clipboard for RecordingClipboard {
    fn copy(&self, text: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("clipboard unavailable");
        }
        self.copied.lock().unwrap().push(text.to_string());
        Ok(())
    }
}
