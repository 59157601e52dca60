use super::actions::Action;
use super::share_dialog::DialogOutcome;
use crate::constants::{
    ERROR_COLLABORATION_FAILED, ERROR_REFRESH_FAILED, ERROR_REMOVE_FAILED, ERROR_SAVE_FAILED, ERROR_SHARING_FAILED,
};
use crate::models::SharedLists;
use crate::preview::{html_to_text, PreviewModel};
use crate::sharing::SharingService;
use crate::sync::SharedNotebooksModel;
use log::{debug, warn};
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

/// Runs network operations off the UI loop and reports back as [`Action`]s.
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<Action> {
        self.action_sender.clone()
    }

    fn track(&mut self, description: String, handle: JoinHandle<()>) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;
        debug!("Background task #{} started: {}", task_id, description);
        self.tasks.insert(
            task_id,
            BackgroundTask {
                id: task_id,
                handle,
                description,
                started_at: std::time::Instant::now(),
            },
        );
        task_id
    }

    /// Spawn an operation whose success is reported as an action.
    ///
    /// A failure raises an error dialog titled `failure_title`. `settle` is
    /// sent after either outcome, before the result.
    pub fn spawn_operation<Fut>(
        &mut self,
        description: String,
        failure_title: &'static str,
        settle: Option<Action>,
        operation: Fut,
    ) -> TaskId
    where
        Fut: Future<Output = anyhow::Result<Action>> + Send + 'static,
    {
        let action_sender = self.action_sender.clone();
        let desc = description.clone();

        let handle = tokio::spawn(async move {
            let result = operation.await;
            if let Some(settle) = settle {
                let _ = action_sender.send(settle);
            }
            match result {
                Ok(action) => {
                    let _ = action_sender.send(action);
                }
                Err(e) => {
                    warn!("{} failed: {:#}", desc, e);
                    let _ = action_sender.send(Action::OperationFailed {
                        title: failure_title.to_string(),
                        message: format!("{:#}", e),
                    });
                }
            }
        });

        self.track(description, handle)
    }

    pub fn spawn_lookup(&mut self, service: SharingService, path: String) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Look up {}", path);
        let handle = tokio::spawn(async move {
            let record = service.lookup(&path).await;
            let _ = action_sender.send(Action::LookupCompleted(record));
        });
        self.track(description, handle)
    }

    pub fn spawn_publish(&mut self, service: SharingService, path: PathBuf) -> TaskId {
        self.spawn_operation(
            format!("Publish {}", path.display()),
            ERROR_SHARING_FAILED,
            Some(Action::ShareIdle),
            async move { Ok(Action::Published(service.publish(&path).await?)) },
        )
    }

    pub fn spawn_toggle_live(
        &mut self,
        service: SharingService,
        path: String,
        label: String,
        currently_enabled: bool,
    ) -> TaskId {
        self.spawn_operation(
            format!("Toggle live collaboration on {}", path),
            ERROR_COLLABORATION_FAILED,
            Some(Action::CollaborationIdle),
            async move {
                let toggle = service.toggle_live(&path, &label, currently_enabled).await?;
                Ok(Action::LiveToggled(toggle))
            },
        )
    }

    pub fn spawn_open_share(
        &mut self,
        service: SharingService,
        file_id: String,
        title: String,
        is_read_only: bool,
    ) -> TaskId {
        self.spawn_operation(
            format!("Open sharing settings of {}", file_id),
            ERROR_SHARING_FAILED,
            None,
            async move {
                let record = service.open_share(&file_id, &title, is_read_only).await?;
                Ok(Action::ShareLoaded(record))
            },
        )
    }

    pub fn spawn_submit(&mut self, service: SharingService, outcome: DialogOutcome) -> TaskId {
        self.spawn_operation(
            "Submit sharing settings".to_string(),
            ERROR_SHARING_FAILED,
            None,
            async move { Ok(Action::ShareSubmitted(service.submit(&outcome).await?)) },
        )
    }

    pub fn spawn_delete(&mut self, service: SharingService, file_id: String) -> TaskId {
        self.spawn_operation(
            format!("Delete {}", file_id),
            ERROR_REMOVE_FAILED,
            None,
            async move {
                service.delete(&file_id).await?;
                Ok(Action::FileDeleted(file_id))
            },
        )
    }

    /// Search failures are logged only; the result list stays as it was.
    pub fn spawn_user_search(&mut self, service: SharingService, query: String) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Search users: '{}'", query);
        let handle = tokio::spawn(async move {
            match service.search_users(&query).await {
                Ok(contacts) => {
                    let _ = action_sender.send(Action::UsersFound { query, contacts });
                }
                Err(e) => warn!("User search for '{}' failed: {:#}", query, e),
            }
        });
        self.track(description, handle)
    }

    /// Forced refresh; snapshots arrive through the list forwarder.
    pub fn spawn_refresh(&mut self, model: Arc<SharedNotebooksModel>) -> TaskId {
        self.spawn_operation(
            "Refresh shared notebooks".to_string(),
            ERROR_REFRESH_FAILED,
            None,
            async move {
                model.refresh().await?;
                Ok(Action::None)
            },
        )
    }

    /// Turn every broadcast snapshot into a [`Action::ListsUpdated`].
    pub fn spawn_list_forwarder(&mut self, mut receiver: broadcast::Receiver<Arc<SharedLists>>) -> TaskId {
        let action_sender = self.action_sender.clone();
        let handle = tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(lists) => {
                        if action_sender.send(Action::ListsUpdated(lists)).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("List forwarder skipped {} stale snapshots", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        self.track("Forward shared list snapshots".to_string(), handle)
    }

    pub fn spawn_preview_fetch(&mut self, preview: Arc<PreviewModel>) -> TaskId {
        let action_sender = self.action_sender.clone();
        let description = format!("Preview {}", preview.id());
        let handle = tokio::spawn(async move {
            let text = html_to_text(preview.fetch().await);
            let _ = action_sender.send(Action::PreviewLoaded {
                file_id: preview.id().to_string(),
                text,
            });
        });
        self.track(description, handle)
    }

    pub fn spawn_save_html(&mut self, preview: Arc<PreviewModel>, dir: PathBuf) -> TaskId {
        self.spawn_operation(
            format!("Save preview of {} as HTML", preview.id()),
            ERROR_SAVE_FAILED,
            None,
            async move {
                Ok(match preview.save_html(&dir).await? {
                    Some(path) => Action::PreviewSaved(path.display().to_string()),
                    None => Action::None,
                })
            },
        )
    }

    pub fn spawn_save_notebook(&mut self, preview: Arc<PreviewModel>, dir: PathBuf) -> TaskId {
        self.spawn_operation(
            format!("Save notebook {}", preview.id()),
            ERROR_SAVE_FAILED,
            None,
            async move {
                Ok(match preview.save_notebook(&dir).await? {
                    Some(path) => Action::PreviewSaved(path.display().to_string()),
                    None => Action::None,
                })
            },
        )
    }

    /// Drop finished tasks; returns how many were removed.
    pub fn cleanup_finished_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.handle.is_finished());
        before - self.tasks.len()
    }

    /// Whether a task whose description starts with `prefix` is running
    pub fn is_running(&self, prefix: &str) -> bool {
        self.tasks
            .values()
            .any(|task| task.description.starts_with(prefix) && !task.handle.is_finished())
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}
