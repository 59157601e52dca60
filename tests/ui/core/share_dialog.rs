use std::sync::Arc;

use nbshare::constants::{ERROR_INVALID_EMAILS, INFO_LINK_COPIED};
use nbshare::models::{Contact, SharedRecord};
use nbshare::ui::core::share_dialog::InlineMessage;
use nbshare::ui::core::{ClickTarget, DialogButton, DialogEvent, DialogOutcome, DialogState, ShareDialogController};

use crate::common::{record, RecordingClipboard};

fn controller(record: SharedRecord) -> (ShareDialogController, Arc<RecordingClipboard>) {
    let clipboard = Arc::new(RecordingClipboard::default());
    (ShareDialogController::new(record, clipboard.clone()), clipboard)
}

#[test]
fn test_remove_then_done_submits_remaining_collaborators() {
    let (mut dialog, _) = controller(record("f1", &["1", "2"]));
    dialog.draft_mut().unwrap().remove("1");

    match dialog.press(DialogButton::Done) {
        DialogEvent::Closed(DialogOutcome::Accepted { value, is_dirty }) => {
            assert!(is_dirty);
            let ids: Vec<&str> = value.collaborators.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["2"]);
            assert_eq!(value.id, "f1");
        }
        other => panic!("expected accepted outcome, got {other:?}"),
    }
    assert_eq!(dialog.state(), DialogState::Closed);
}

#[test]
fn test_done_without_edits_is_accepted_clean() {
    let (mut dialog, _) = controller(record("f1", &["1"]));
    match dialog.press(DialogButton::Done) {
        DialogEvent::Closed(DialogOutcome::Accepted { is_dirty, .. }) => assert!(!is_dirty),
        other => panic!("expected accepted outcome, got {other:?}"),
    }
}

#[test]
fn test_backdrop_without_edits_closes_immediately() {
    let (mut dialog, _) = controller(record("f1", &["1"]));
    assert_eq!(
        dialog.handle_click(ClickTarget::Backdrop),
        DialogEvent::Closed(DialogOutcome::Dismissed)
    );
    assert_eq!(dialog.outcome(), Some(&DialogOutcome::Dismissed));
}

#[test]
fn test_dismiss_with_edits_asks_for_confirmation() {
    let (mut dialog, _) = controller(record("f1", &["1"]));
    dialog.draft_mut().unwrap().set_live_enabled(true);

    assert_eq!(dialog.dismiss(), DialogEvent::ConfirmDiscard);
    assert_eq!(dialog.state(), DialogState::PendingClose);

    // Clicks behind the confirmation are ignored
    assert_eq!(dialog.handle_click(ClickTarget::Backdrop), DialogEvent::Ignored);
    assert_eq!(dialog.handle_click(ClickTarget::ConfirmationPopup), DialogEvent::Ignored);
    assert_eq!(dialog.press(DialogButton::Done), DialogEvent::Ignored);
    assert!(dialog.draft_mut().is_none());

    // Cancel keeps the draft
    assert_eq!(dialog.cancel_discard(), DialogEvent::Resumed);
    assert_eq!(dialog.state(), DialogState::Open);
    assert!(dialog.draft().live_enabled);

    dialog.dismiss();
    assert_eq!(dialog.confirm_discard(), DialogEvent::Closed(DialogOutcome::Discarded));
    assert_eq!(dialog.state(), DialogState::Closed);
}

#[test]
fn test_invalid_email_rejects_done_and_stays_open() {
    let (mut dialog, _) = controller(record("f1", &[]));
    dialog.draft_mut().unwrap().add(Contact {
        email: "nobody@example.com".to_string(),
        ..Default::default()
    });

    assert_eq!(dialog.press(DialogButton::Done), DialogEvent::Rejected(ERROR_INVALID_EMAILS));
    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(
        dialog.message(),
        Some(&InlineMessage::Error(ERROR_INVALID_EMAILS.to_string()))
    );

    // Editing clears the message
    dialog.draft_mut().unwrap().remove_at(0);
    assert_eq!(dialog.message(), None);
}

#[test]
fn test_copy_buttons_keep_the_dialog_open() {
    let (mut dialog, clipboard) = controller(record("f1", &[]));

    assert!(matches!(dialog.press(DialogButton::CopyLink), DialogEvent::Copied(_)));
    assert!(matches!(dialog.press(DialogButton::CopyLinkNoCode), DialogEvent::Copied(_)));
    assert!(matches!(dialog.press(DialogButton::CopyLiveLink), DialogEvent::Copied(_)));
    assert_eq!(dialog.state(), DialogState::Open);
    assert_eq!(dialog.message(), Some(&InlineMessage::Info(INFO_LINK_COPIED.to_string())));

    assert_eq!(
        clipboard.copied(),
        vec![
            "https://share.example.com/f1/preview".to_string(),
            "https://share.example.com/f1/preview?view=nocode".to_string(),
            "https://share.example.com/collaboration/f1".to_string(),
        ]
    );
}

#[test]
fn test_no_code_link_appends_to_existing_query() {
    let mut shared = record("f1", &[]);
    shared.shareable_link = "https://share.example.com/f1?token=abc".to_string();
    let (dialog, _) = controller(shared);
    assert_eq!(
        dialog.link_for(DialogButton::CopyLinkNoCode).as_deref(),
        Some("https://share.example.com/f1?token=abc&view=nocode")
    );
    assert_eq!(dialog.link_for(DialogButton::Done), None);
}

#[test]
fn test_clipboard_failure_is_reported_inline() {
    let clipboard = Arc::new(RecordingClipboard {
        fail: true,
        ..Default::default()
    });
    let mut dialog = ShareDialogController::new(record("f1", &[]), clipboard);

    assert!(matches!(dialog.press(DialogButton::CopyLink), DialogEvent::CopyFailed(_)));
    assert!(matches!(dialog.message(), Some(InlineMessage::Error(_))));
    assert_eq!(dialog.state(), DialogState::Open);
}

#[test]
fn test_read_only_record_cannot_be_edited() {
    let mut shared = record("f1", &["1"]);
    shared.is_read_only = true;
    let (mut dialog, _) = controller(shared);

    assert!(dialog.title().starts_with("View"));
    assert!(dialog.draft_mut().is_none());
    assert_eq!(
        dialog.handle_click(ClickTarget::Content),
        DialogEvent::Ignored
    );
}
