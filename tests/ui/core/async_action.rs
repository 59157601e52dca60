use std::sync::Arc;
use std::time::Duration;

use nbshare::backend::BackendError;
use nbshare::ui::components::ToastOverlay;
use nbshare::ui::core::async_action::{
    ActionOptions, ActionPhase, AsyncActionController, OverlayHost, ToastPhase,
};
use tokio::sync::oneshot;

use crate::common::{OverlayEvent, RecordingOverlay};

#[tokio::test(start_paused = true)]
async fn test_pending_then_success_then_dismissed_after_delay() {
    let overlay = Arc::new(RecordingOverlay::default());
    let controller = AsyncActionController::new(
        overlay.clone(),
        ActionOptions::new("Sharing").tooltip("Sharing \"a.ipynb\"").success_message("Shared!"),
    );
    let id = controller.id();
    let lifecycle = controller.subscribe();

    let result: Result<u32, BackendError> = controller
        .start(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(7)
        })
        .await;
    assert_eq!(result, Ok(7));

    let events = overlay.events();
    assert_eq!(events.len(), 2);
    match &events[0] {
        OverlayEvent::Attached(toast) => {
            assert_eq!(toast.id, id);
            assert_eq!(toast.phase, ToastPhase::Pending);
            assert_eq!(toast.message(), "Sharing");
            assert_eq!(toast.tooltip, "Sharing \"a.ipynb\"");
            assert!(!toast.is_closable());
        }
        other => panic!("expected attach, got {other:?}"),
    }
    match &events[1] {
        OverlayEvent::Updated(toast) => {
            assert_eq!(toast.phase, ToastPhase::Succeeded("Shared!".to_string()));
            assert!(toast.is_closable());
        }
        other => panic!("expected update, got {other:?}"),
    }
    assert_eq!(lifecycle.borrow().phase, ActionPhase::Succeeded);
    assert!(lifecycle.borrow().visible);

    // Still visible just before the dismiss delay
    tokio::time::sleep(Duration::from_millis(1499)).await;
    assert!(!overlay.events().contains(&OverlayEvent::Detached(id)));

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(overlay.events().last(), Some(&OverlayEvent::Detached(id)));
    assert!(!lifecycle.borrow().visible);
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_displayed_and_returned_unchanged() {
    let overlay = Arc::new(RecordingOverlay::default());
    let controller = AsyncActionController::new(
        overlay.clone(),
        ActionOptions::new("Updating").failure_message_with(|error| format!("Update failed: {error}")),
    );

    let result: Result<(), BackendError> = controller
        .start(async { Err(BackendError::NotFound("abc".to_string())) })
        .await;
    assert_eq!(result, Err(BackendError::NotFound("abc".to_string())));

    match overlay.events().get(1) {
        Some(OverlayEvent::Updated(toast)) => assert_eq!(
            toast.phase,
            ToastPhase::Failed("Update failed: Resource not found: abc".to_string())
        ),
        other => panic!("expected failure update, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_without_message_the_toast_is_removed_immediately() {
    let overlay = Arc::new(RecordingOverlay::default());
    let controller = AsyncActionController::new(overlay.clone(), ActionOptions::new("Loading"));
    let id = controller.id();

    let result: Result<&str, String> = controller.start(async { Ok("done") }).await;
    assert_eq!(result, Ok("done"));

    let events = overlay.events();
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], OverlayEvent::Attached(_)));
    assert_eq!(events[1], OverlayEvent::Detached(id));
}

#[tokio::test(start_paused = true)]
async fn test_manual_dismiss_hides_without_cancelling() {
    let overlay = Arc::new(RecordingOverlay::default());
    let controller = AsyncActionController::new(overlay.clone(), ActionOptions::new("Saving...").success_message("Saved"));
    let handle = controller.handle();
    let (tx, rx) = oneshot::channel::<u32>();

    let task = tokio::spawn(controller.start(async move { rx.await.map_err(|e| e.to_string()) }));
    tokio::task::yield_now().await;
    assert_eq!(overlay.attached_titles(), vec!["Saving...".to_string()]);

    handle.dismiss();
    handle.dismiss();
    assert!(handle.is_dismissed());

    tx.send(3).unwrap();
    assert_eq!(task.await.unwrap(), Ok(3));

    let events = overlay.events();
    let detached = events.iter().filter(|e| matches!(e, OverlayEvent::Detached(_))).count();
    assert_eq!(detached, 1, "dismiss is idempotent");
    assert!(
        !events.iter().any(|e| matches!(e, OverlayEvent::Updated(_))),
        "a dismissed toast is never updated"
    );
}

#[tokio::test(start_paused = true)]
async fn test_newer_toast_preempts_older_one() {
    let overlay = Arc::new(ToastOverlay::new());
    let host: Arc<dyn OverlayHost> = overlay.clone();

    let first = AsyncActionController::new(Arc::clone(&host), ActionOptions::new("First").success_message("First done"));
    let first_handle = first.handle();
    let (tx, rx) = oneshot::channel::<()>();
    let first_task = tokio::spawn(first.start(async move { rx.await.map_err(|e| e.to_string()) }));
    tokio::task::yield_now().await;
    assert_eq!(overlay.current().map(|t| t.title), Some("First".to_string()));

    let second = AsyncActionController::new(Arc::clone(&host), ActionOptions::new("Second").success_message("Second done"));
    let second_id = second.id();
    let result: Result<(), String> = second.start(async { Ok(()) }).await;
    assert!(result.is_ok());
    assert!(first_handle.is_dismissed());

    // The preempted action still completes, but cannot touch the new toast
    tx.send(()).unwrap();
    assert!(first_task.await.unwrap().is_ok());
    let current = overlay.current().expect("second toast visible");
    assert_eq!(current.id, second_id);
    assert_eq!(current.message(), "Second done");

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(!overlay.is_visible());
}
