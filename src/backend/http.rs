//! HTTP implementation of the sharing backend.
//!
//! Every endpoint funnels through [`HttpBackend::request`], which joins the
//! configured base URL with the endpoint path, attaches the bearer token and
//! maps transport and status failures onto [`BackendError`].

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{AuthorFilter, BackendError, SharingBackend};
use crate::models::{Contact, ContentsModel, PreviewResponse, SharedRecord, UpdateRequest};

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and decode the JSON response.
    ///
    /// An empty body decodes as `null`, so endpoints without a payload can
    /// be requested as `Option<T>` or `Value`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<T, BackendError> {
        let url = join_url(&self.base_url, path);
        debug!("{} {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("request to {url} failed: {e}")))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Network(format!("failed to read body: {e}")))?;

        let data: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) if !status.is_success() => Value::String(text.clone()),
                Err(e) => return Err(BackendError::InvalidData(format!("{url}: {e}"))),
            }
        };

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(error_message(&data).unwrap_or(url)));
        }
        if !status.is_success() {
            return Err(BackendError::Server {
                status: status.as_u16(),
                message: error_message(&data).unwrap_or_else(|| status.to_string()),
            });
        }

        serde_json::from_value(data).map_err(|e| BackendError::InvalidData(format!("{url}: {e}")))
    }
}

#[async_trait]
impl SharingBackend for HttpBackend {
    async fn search_users(&self, query: &str) -> Result<Vec<Contact>, BackendError> {
        let users: Option<Vec<Contact>> = self.request(&search_endpoint(query), Method::GET, None).await?;
        Ok(users.unwrap_or_default())
    }

    async fn publish_file(&self, model: &ContentsModel) -> Result<SharedRecord, BackendError> {
        let body = serde_json::to_value(model).map_err(|e| BackendError::InvalidData(e.to_string()))?;
        self.request("publishing", Method::POST, Some(body)).await
    }

    async fn file_by_path(&self, path: &str, with_collaborators: bool) -> Result<Option<SharedRecord>, BackendError> {
        match self.request(&file_endpoint(path, with_collaborators), Method::GET, None).await {
            Err(BackendError::NotFound(_)) => Ok(None),
            other => other,
        }
    }

    async fn get_file(&self, file_id: &str) -> Result<SharedRecord, BackendError> {
        self.request(&format!("publishing/{file_id}"), Method::GET, None).await
    }

    async fn update_file(&self, update: &UpdateRequest) -> Result<SharedRecord, BackendError> {
        let body = serde_json::to_value(update).map_err(|e| BackendError::InvalidData(e.to_string()))?;
        self.request(&format!("publishing/{}", update.id), Method::PATCH, Some(body))
            .await
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), BackendError> {
        let _: Value = self
            .request(&format!("publishing/{file_id}"), Method::DELETE, None)
            .await?;
        Ok(())
    }

    async fn preview_file(&self, file_id: &str) -> Result<PreviewResponse, BackendError> {
        self.request(&format!("publishing/{file_id}/preview"), Method::GET, None)
            .await
    }

    async fn download_file(&self, file_id: &str, path: &str) -> Result<(), BackendError> {
        let body = json!({ "id": file_id, "path": path });
        let _: Value = self
            .request(&format!("publishing/{file_id}/download"), Method::POST, Some(body))
            .await?;
        Ok(())
    }

    async fn list_files(&self, author: AuthorFilter) -> Result<Vec<SharedRecord>, BackendError> {
        let files: Option<Vec<SharedRecord>> = self
            .request(&format!("publishing?author={}", author.as_query()), Method::GET, None)
            .await?;
        Ok(files.unwrap_or_default())
    }
}

/// Join a base URL and a relative path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn search_endpoint(query: &str) -> String {
    format!("publishing/search/users?search_string={}", urlencoding::encode(query))
}

fn file_endpoint(path: &str, with_collaborators: bool) -> String {
    let mut endpoint = format!("publishing/file?path={}", urlencoding::encode(path));
    if with_collaborators {
        endpoint.push_str("&collaborators=1");
    }
    endpoint
}

fn error_message(data: &Value) -> Option<String> {
    match data {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(data.to_string())),
        _ => None,
    }
}
