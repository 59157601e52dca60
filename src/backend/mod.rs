//! Sharing service abstraction.
//!
//! This module defines the REST collaborator the rest of the crate talks to,
//! along with its error type. [`http::HttpBackend`] is the production
//! implementation; tests provide in-memory ones.

use async_trait::async_trait;

use crate::models::{Contact, ContentsModel, PreviewResponse, SharedRecord, UpdateRequest};

pub mod http;

/// Transport-level failures of a sharing service call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Which list of records to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorFilter {
    /// Records published by the current user
    Me,
    /// Records other users shared with the current user
    Others,
}

impl AuthorFilter {
    pub fn as_query(&self) -> &'static str {
        match self {
            AuthorFilter::Me => "me",
            AuthorFilter::Others => "others",
        }
    }
}

/// Operations offered by the sharing service.
#[async_trait]
pub trait SharingBackend: Send + Sync {
    /// Find users whose name or email matches `query`.
    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, BackendError>;

    /// Publish a local document, creating or replacing its shared copy.
    async fn publish_file(&self, model: &ContentsModel) -> Result<SharedRecord, BackendError>;

    /// Record published from a local path, if the path was ever published.
    async fn file_by_path(&self, path: &str, with_collaborators: bool) -> Result<Option<SharedRecord>, BackendError>;

    async fn get_file(&self, file_id: &str) -> Result<SharedRecord, BackendError>;
    async fn update_file(&self, update: &UpdateRequest) -> Result<SharedRecord, BackendError>;
    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError>;
    async fn preview_file(&self, file_id: &str) -> Result<PreviewResponse, BackendError>;

    /// Ask the server to save the published notebook to `path` in the workspace.
    async fn download_file(&self, file_id: &str, path: &str) -> Result<(), BackendError>;

    async fn list_files(&self, author: AuthorFilter) -> Result<Vec<SharedRecord>, BackendError>;
}
