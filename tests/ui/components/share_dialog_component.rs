use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nbshare::ui::components::ShareDialogComponent;
use nbshare::ui::core::{Action, Component, DialogOutcome, DialogState};

use crate::common::{contact, record, RecordingClipboard};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn open_dialog(collaborators: &[&str]) -> (ShareDialogComponent, Arc<RecordingClipboard>) {
    let clipboard = Arc::new(RecordingClipboard::default());
    let mut dialog = ShareDialogComponent::new(clipboard.clone());
    dialog.show_loading("f1", "f1.ipynb");
    assert!(matches!(dialog.update(Action::ShareLoaded(record("f1", collaborators))), Action::None));
    (dialog, clipboard)
}

#[test]
fn test_remove_and_done_yields_submit() {
    let (mut dialog, _) = open_dialog(&["1", "2"]);
    assert!(dialog.is_visible());

    dialog.handle_key_events(key(KeyCode::Char('x')));
    // Copy link, copy without code, Done
    dialog.handle_key_events(key(KeyCode::Tab));
    dialog.handle_key_events(key(KeyCode::Tab));

    match dialog.handle_key_events(key(KeyCode::Enter)) {
        Action::SubmitShare(DialogOutcome::Accepted { value, is_dirty }) => {
            assert!(is_dirty);
            let ids: Vec<&str> = value.collaborators.iter().map(|c| c.id.as_str()).collect();
            assert_eq!(ids, vec!["2"]);
        }
        other => panic!("unexpected action {other:?}"),
    }
    assert!(!dialog.is_visible());
}

#[test]
fn test_escape_with_edits_asks_before_discarding() {
    let (mut dialog, _) = open_dialog(&["1"]);
    dialog.handle_key_events(key(KeyCode::Char('l')));

    assert!(matches!(dialog.handle_key_events(key(KeyCode::Esc)), Action::None));
    assert_eq!(dialog.controller().map(|c| c.state()), Some(DialogState::PendingClose));

    // Cancel goes back to editing
    dialog.handle_key_events(key(KeyCode::Char('c')));
    assert_eq!(dialog.controller().map(|c| c.state()), Some(DialogState::Open));

    dialog.handle_key_events(key(KeyCode::Esc));
    assert!(matches!(
        dialog.handle_key_events(key(KeyCode::Char('d'))),
        Action::SubmitShare(DialogOutcome::Discarded)
    ));
    assert!(!dialog.is_visible());
}

#[test]
fn test_copy_shortcut_uses_clipboard() {
    let (mut dialog, clipboard) = open_dialog(&[]);
    assert!(matches!(dialog.handle_key_events(key(KeyCode::Char('c'))), Action::None));
    assert_eq!(clipboard.copied(), vec!["https://share.example.com/f1/preview".to_string()]);
    assert!(dialog.is_visible());
}

#[test]
fn test_typing_searches_and_picks_a_result() {
    let (mut dialog, _) = open_dialog(&[]);
    dialog.handle_key_events(key(KeyCode::Char('a')));

    let mut last = Action::None;
    for c in "user3".chars() {
        last = dialog.handle_key_events(key(KeyCode::Char(c)));
    }
    match last {
        Action::SearchUsers(query) => assert_eq!(query, "user3"),
        other => panic!("unexpected action {other:?}"),
    }

    // Results for an older query are dropped
    dialog.update(Action::UsersFound {
        query: "user".to_string(),
        contacts: vec![contact("9")],
    });
    dialog.update(Action::UsersFound {
        query: "user3".to_string(),
        contacts: vec![contact("3")],
    });
    dialog.handle_key_events(key(KeyCode::Enter));

    let controller = dialog.controller().expect("dialog open");
    let ids: Vec<&str> = controller.draft().collaborators.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["3"]);
    assert!(controller.form_state().is_dirty);
}

#[test]
fn test_escape_closes_loading_placeholder() {
    let mut dialog = ShareDialogComponent::new(Arc::new(RecordingClipboard::default()));
    dialog.show_loading("f1", "nb.ipynb");
    assert!(dialog.is_visible());

    assert!(matches!(dialog.handle_key_events(key(KeyCode::Esc)), Action::None));
    assert!(!dialog.is_visible());

    // The fetch finishing later must not bring the dialog back
    assert!(matches!(dialog.update(Action::ShareLoaded(record("f1", &["1"]))), Action::None));
    assert!(!dialog.is_visible());
    assert!(dialog.controller().is_none());
}

#[test]
fn test_slow_load_does_not_replace_newer_dialog() {
    let mut dialog = ShareDialogComponent::new(Arc::new(RecordingClipboard::default()));
    dialog.show_loading("a", "a.ipynb");
    dialog.show_loading("b", "b.ipynb");
    assert!(!dialog.is_loading("a"));

    dialog.update(Action::ShareLoaded(record("b", &[])));
    assert_eq!(dialog.controller().map(|c| c.record().id.as_str()), Some("b"));

    dialog.update(Action::ShareLoaded(record("a", &[])));
    assert_eq!(dialog.controller().map(|c| c.record().id.as_str()), Some("b"));
}

#[test]
fn test_load_without_placeholder_is_ignored() {
    let mut dialog = ShareDialogComponent::new(Arc::new(RecordingClipboard::default()));
    dialog.update(Action::ShareLoaded(record("f1", &[])));
    assert!(!dialog.is_visible());
}

#[test]
fn test_read_only_dialog_does_not_enter_input_mode() {
    let clipboard = Arc::new(RecordingClipboard::default());
    let mut dialog = ShareDialogComponent::new(clipboard);
    let mut shared = record("f1", &["1"]);
    shared.is_read_only = true;
    dialog.open(shared);

    dialog.handle_key_events(key(KeyCode::Char('a')));
    // Without input mode, 'x' removes the selected collaborator, which is refused
    dialog.handle_key_events(key(KeyCode::Char('x')));
    assert_eq!(dialog.controller().map(|c| c.draft().collaborators.len()), Some(1));
}
