use std::sync::Arc;
use std::time::Duration;

use nbshare::backend::BackendError;
use nbshare::constants::{ERROR_COLLABORATION_FAILED, ERROR_REMOVE_FAILED, ERROR_SHARING_FAILED};
use nbshare::models::SharedLists;
use nbshare::sharing::SharingService;
use nbshare::ui::core::{Action, TaskManager};
use tokio::sync::{broadcast, mpsc};

use crate::common::{contact, record, FakeBackend, RecordingOverlay};

fn service(backend: Arc<FakeBackend>) -> SharingService {
    SharingService::new(backend, Arc::new(RecordingOverlay::default())).with_dismiss_delay(Duration::ZERO)
}

async fn next(rx: &mut mpsc::UnboundedReceiver<Action>) -> Action {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("action within timeout")
        .expect("channel open")
}

#[tokio::test]
async fn test_delete_reports_deleted_file() {
    let backend = Arc::new(FakeBackend::with_record(record("f1", &[]), "f1.ipynb"));
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_delete(service(backend.clone()), "f1".to_string());

    match next(&mut rx).await {
        Action::FileDeleted(id) => assert_eq!(id, "f1"),
        other => panic!("unexpected action {other:?}"),
    }
    assert_eq!(backend.deleted.lock().unwrap().clone(), vec!["f1".to_string()]);
}

#[tokio::test]
async fn test_failed_operation_becomes_error_dialog_action() {
    let backend = Arc::new(FakeBackend::default());
    backend.fail(BackendError::Network("offline".to_string()));
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_delete(service(backend), "f1".to_string());

    match next(&mut rx).await {
        Action::OperationFailed { title, message } => {
            assert_eq!(title, ERROR_REMOVE_FAILED);
            assert!(message.contains("offline"));
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn test_toggle_live_settles_toolbar_before_result() {
    // Only the owner is listed, so enabling asks for collaborators
    let backend = Arc::new(FakeBackend::with_record(record("f1", &["owner"]), "nb.ipynb"));
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_toggle_live(service(backend), "nb.ipynb".to_string(), "nb.ipynb".to_string(), false);

    assert!(matches!(next(&mut rx).await, Action::CollaborationIdle));
    match next(&mut rx).await {
        Action::LiveToggled(toggle) => {
            assert!(toggle.live_enabled);
            assert!(toggle.needs_collaborators);
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn test_toggle_live_on_unshared_document_fails() {
    let backend = Arc::new(FakeBackend::default());
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_toggle_live(service(backend), "nb.ipynb".to_string(), "nb.ipynb".to_string(), false);

    assert!(matches!(next(&mut rx).await, Action::CollaborationIdle));
    match next(&mut rx).await {
        Action::OperationFailed { title, message } => {
            assert_eq!(title, ERROR_COLLABORATION_FAILED);
            assert!(message.contains("has not been shared yet"));
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_publish_only_frees_the_share_button() {
    let backend = Arc::new(FakeBackend::default());
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_publish(service(backend), std::env::temp_dir().join("nbshare-missing.ipynb"));

    assert!(matches!(next(&mut rx).await, Action::ShareIdle));
    match next(&mut rx).await {
        Action::OperationFailed { title, .. } => assert_eq!(title, ERROR_SHARING_FAILED),
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test]
async fn test_user_search_reports_query_with_results() {
    let backend = Arc::new(FakeBackend::default());
    backend.users.lock().unwrap().extend([contact("1"), contact("2")]);
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_user_search(service(backend), "user2".to_string());

    match next(&mut rx).await {
        Action::UsersFound { query, contacts } => {
            assert_eq!(query, "user2");
            assert_eq!(contacts, vec![contact("2")]);
        }
        other => panic!("unexpected action {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_user_search_failure_is_silent() {
    let backend = Arc::new(FakeBackend::default());
    backend.fail(BackendError::Network("offline".to_string()));
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_user_search(service(backend), "ada".to_string());

    let received = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
    assert!(received.is_err(), "no action expected");
}

#[tokio::test]
async fn test_list_forwarder_turns_snapshots_into_actions() {
    let (sender, receiver) = broadcast::channel(4);
    let (mut manager, mut rx) = TaskManager::new();
    manager.spawn_list_forwarder(receiver);

    let lists = Arc::new(SharedLists {
        shared_by_me: vec![record("f1", &[])],
        shared_with_me: Vec::new(),
    });
    sender.send(Arc::clone(&lists)).unwrap();

    match next(&mut rx).await {
        Action::ListsUpdated(received) => assert!(Arc::ptr_eq(&received, &lists)),
        other => panic!("unexpected action {other:?}"),
    }

    // The forwarder stops once the scheduler goes away
    drop(sender);
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(manager.cleanup_finished_tasks(), 1);
    assert_eq!(manager.task_count(), 0);
}

#[tokio::test]
async fn test_cancel_all_tasks() {
    let (sender, receiver) = broadcast::channel::<Arc<SharedLists>>(4);
    let (mut manager, _rx) = TaskManager::new();
    manager.spawn_list_forwarder(receiver);
    assert_eq!(manager.task_count(), 1);
    assert!(manager.is_running("Forward"));

    manager.cancel_all_tasks();
    assert_eq!(manager.task_count(), 0);
    drop(sender);
}
