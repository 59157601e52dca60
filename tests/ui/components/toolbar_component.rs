use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use nbshare::ui::components::ToolbarComponent;
use nbshare::ui::core::{Action, Component};

use crate::common::record;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn published_toolbar() -> ToolbarComponent {
    let mut toolbar = ToolbarComponent::new(Some(PathBuf::from("nb.ipynb")));
    toolbar.set_record(Some(record("f1", &[])));
    toolbar
}

#[test]
fn test_buttons_stay_disabled_while_their_action_runs() {
    let mut toolbar = published_toolbar();

    assert!(matches!(toolbar.handle_key_events(key('L')), Action::ToggleLive));
    assert!(matches!(toolbar.handle_key_events(key('p')), Action::Publish));

    // Publishing finished, the live toggle is still in flight
    toolbar.update(Action::ShareIdle);
    assert!(toolbar.state.share_enabled());
    assert!(!toolbar.state.collaboration_enabled());
    assert!(matches!(toolbar.handle_key_events(key('L')), Action::None));

    toolbar.update(Action::CollaborationIdle);
    assert!(matches!(toolbar.handle_key_events(key('L')), Action::ToggleLive));
}

#[test]
fn test_collaboration_idle_leaves_publish_busy() {
    let mut toolbar = published_toolbar();

    assert!(matches!(toolbar.handle_key_events(key('p')), Action::Publish));
    assert!(matches!(toolbar.handle_key_events(key('L')), Action::ToggleLive));

    toolbar.update(Action::CollaborationIdle);
    assert!(!toolbar.state.share_enabled());
    assert!(matches!(toolbar.handle_key_events(key('p')), Action::None));
}

#[test]
fn test_live_needs_a_published_document() {
    let mut toolbar = ToolbarComponent::new(Some(PathBuf::from("nb.ipynb")));
    assert!(matches!(toolbar.handle_key_events(key('L')), Action::None));

    let mut empty = ToolbarComponent::new(None);
    assert!(matches!(empty.handle_key_events(key('p')), Action::None));
}
