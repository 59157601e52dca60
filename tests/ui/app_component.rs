use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nbshare::config::Config;
use nbshare::logger::Logger;
use nbshare::models::SharedLists;
use nbshare::ui::core::{Action, DialogType, EventType};
use nbshare::ui::AppComponent;

use crate::common::{record, FakeBackend, RecordingClipboard};

fn app(backend: Arc<FakeBackend>) -> AppComponent {
    AppComponent::new(
        Config::default(),
        backend,
        Arc::new(RecordingClipboard::default()),
        Logger::new(),
        None,
    )
}

#[tokio::test]
async fn test_failed_operation_shows_error_dialog() {
    let mut app = app(Arc::new(FakeBackend::default()));

    app.dispatch(Action::OperationFailed {
        title: "Failed to share".to_string(),
        message: "offline".to_string(),
    });

    assert_eq!(
        app.dialog_type(),
        Some(&DialogType::Error {
            title: "Failed to share".to_string(),
            message: "offline".to_string(),
        })
    );
}

#[tokio::test]
async fn test_failure_closes_share_dialog_still_loading() {
    let backend = Arc::new(FakeBackend::default());
    let mut app = app(backend);

    app.dispatch(Action::OpenShare {
        file_id: "missing".to_string(),
        title: "missing.ipynb".to_string(),
        is_read_only: false,
    });
    assert!(app.is_share_dialog_visible());

    app.dispatch(Action::OperationFailed {
        title: "Failed to load".to_string(),
        message: "Resource not found: missing".to_string(),
    });
    assert!(!app.is_share_dialog_visible());
    assert!(matches!(app.dialog_type(), Some(DialogType::Error { .. })));
    app.shutdown();
}

#[tokio::test]
async fn test_focus_changes_pause_refresh() {
    let mut app = app(Arc::new(FakeBackend::default()));
    assert!(app.is_visible());

    app.handle_event(EventType::Focus(false)).unwrap();
    assert!(!app.is_visible());

    app.handle_event(EventType::Focus(true)).unwrap();
    assert!(app.is_visible());
}

#[tokio::test]
async fn test_preview_is_reused_per_record() {
    let backend = Arc::new(FakeBackend::with_record(record("f1", &[]), "f1.ipynb"));
    let mut app = app(backend);

    app.dispatch(Action::OpenPreview(record("f1", &[])));
    app.dispatch(Action::HideDialog);
    app.dispatch(Action::OpenPreview(record("f1", &[])));

    assert_eq!(app.open_preview_count(), 1);
    assert_eq!(
        app.dialog_type(),
        Some(&DialogType::Preview {
            file_id: "f1".to_string()
        })
    );
    app.shutdown();
}

#[tokio::test]
async fn test_list_update_drops_stale_previews() {
    let backend = Arc::new(FakeBackend::default());
    let mut app = app(backend);
    app.dispatch(Action::OpenPreview(record("f1", &[])));
    app.dispatch(Action::OpenPreview(record("f2", &[])));
    assert_eq!(app.open_preview_count(), 2);

    // f1 moved to a new version, f2 disappeared
    let mut changed = record("f1", &[]);
    changed.version = 2;
    app.dispatch(Action::ListsUpdated(Arc::new(SharedLists {
        shared_by_me: vec![changed],
        shared_with_me: Vec::new(),
    })));

    assert_eq!(app.open_preview_count(), 0);
    assert_eq!(app.lists().shared_by_me.len(), 1);
    app.shutdown();
}

#[tokio::test]
async fn test_quit_key_stops_background_work() {
    let mut app = app(Arc::new(FakeBackend::default()));
    app.start();
    assert!(app.is_busy());

    app.handle_event(EventType::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)))
        .unwrap();

    assert!(app.should_quit());
    assert_eq!(app.active_task_count(), 0);
}

#[tokio::test]
async fn test_help_key_opens_help() {
    let mut app = app(Arc::new(FakeBackend::default()));
    app.handle_event(EventType::Key(KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE)))
        .unwrap();
    assert_eq!(app.dialog_type(), Some(&DialogType::Help));
}
