use std::sync::Arc;

use nbshare::ui::components::ToastOverlay;
use nbshare::ui::core::async_action::{ActionOptions, AsyncActionController, OverlayHost, Toast, ToastPhase};
use nbshare::ui::core::DismissHandle;

fn attach(overlay: &Arc<ToastOverlay>, title: &str, phase: ToastPhase) -> (Toast, DismissHandle) {
    let controller = AsyncActionController::new(overlay.clone(), ActionOptions::new(title));
    let toast = Toast {
        id: controller.id(),
        title: title.to_string(),
        tooltip: title.to_string(),
        phase,
    };
    let handle = controller.handle();
    overlay.attach(toast.clone(), handle.clone());
    (toast, handle)
}

#[test]
fn test_pending_toast_cannot_be_closed() {
    let overlay = Arc::new(ToastOverlay::new());
    let (_, handle) = attach(&overlay, "Sharing", ToastPhase::Pending);

    assert!(!overlay.close_current());
    assert!(overlay.is_visible());
    assert!(!handle.is_dismissed());
}

#[test]
fn test_settled_toast_closes_through_its_handle() {
    let overlay = Arc::new(ToastOverlay::new());
    let (_, handle) = attach(&overlay, "Sharing", ToastPhase::Succeeded("Shared!".to_string()));

    assert!(overlay.close_current());
    assert!(!overlay.is_visible());
    assert!(handle.is_dismissed());

    // Nothing left to close
    assert!(!overlay.close_current());
}

#[test]
fn test_update_and_detach_ignore_other_toasts() {
    let overlay = Arc::new(ToastOverlay::new());
    let (toast, _) = attach(&overlay, "Saving", ToastPhase::Pending);

    let stranger = Toast {
        id: toast.id + 1000,
        phase: ToastPhase::Failed("nope".to_string()),
        ..toast.clone()
    };
    overlay.update(stranger.clone());
    overlay.detach(stranger.id);
    assert_eq!(overlay.current(), Some(toast.clone()));

    let settled = Toast {
        phase: ToastPhase::Succeeded("Saved".to_string()),
        ..toast.clone()
    };
    overlay.update(settled.clone());
    assert_eq!(overlay.current().map(|t| t.message().to_string()), Some("Saved".to_string()));

    overlay.detach(toast.id);
    assert_eq!(overlay.current(), None);
}

#[test]
fn test_attach_preempts_the_shown_toast() {
    let overlay = Arc::new(ToastOverlay::new());
    let (_, first) = attach(&overlay, "First", ToastPhase::Pending);
    let (second, second_handle) = attach(&overlay, "Second", ToastPhase::Pending);

    assert!(first.is_dismissed());
    assert!(!second_handle.is_dismissed());
    assert_eq!(overlay.current().map(|t| t.id), Some(second.id));
}

#[test]
fn test_hit_is_false_before_first_render() {
    let overlay = ToastOverlay::new();
    assert!(!overlay.hit(0, 0));
}
