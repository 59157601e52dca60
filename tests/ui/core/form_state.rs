use nbshare::constants::ERROR_INVALID_EMAILS;
use nbshare::models::Contact;
use nbshare::ui::core::{DraftEdit, FormState};

use crate::common::{contact, record};

#[test]
fn test_fresh_draft_is_clean_and_valid() {
    let original = record("f1", &["1", "2"]);
    let draft = DraftEdit::from_record(&original);
    let form = FormState::derive(&original, &draft);
    assert!(!form.is_dirty);
    assert!(form.is_valid);
    assert_eq!(form.error, None);
}

#[test]
fn test_removing_a_collaborator_makes_the_draft_dirty() {
    let original = record("f1", &["1", "2"]);
    let mut draft = DraftEdit::from_record(&original);
    assert!(draft.remove("1"));

    let form = FormState::derive(&original, &draft);
    assert!(form.is_dirty);
    assert!(form.is_valid);
    let ids: Vec<&str> = draft.collaborators.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn test_add_then_remove_returns_to_clean() {
    let original = record("f1", &["1"]);
    let mut draft = DraftEdit::from_record(&original);
    assert!(draft.add(contact("2")));
    assert!(FormState::derive(&original, &draft).is_dirty);

    draft.remove("2");
    assert!(!FormState::derive(&original, &draft).is_dirty);
}

#[test]
fn test_permission_change_and_live_flag_are_dirty() {
    let original = record("f1", &["1"]);

    let mut draft = DraftEdit::from_record(&original);
    assert!(draft.set_editor("1", true));
    assert!(FormState::derive(&original, &draft).is_dirty);

    let mut draft = DraftEdit::from_record(&original);
    draft.set_live_enabled(true);
    assert!(FormState::derive(&original, &draft).is_dirty);
}

#[test]
fn test_unknown_email_invalidates_the_draft() {
    let original = record("f1", &[]);
    let mut draft = DraftEdit::from_record(&original);
    assert!(draft.add(Contact {
        id: String::new(),
        name: String::new(),
        email: "stranger@example.com".to_string(),
    }));

    let form = FormState::derive(&original, &draft);
    assert!(form.is_dirty);
    assert!(!form.is_valid);
    assert_eq!(form.error, Some(ERROR_INVALID_EMAILS));

    // The same typed email is only added once
    assert!(!draft.add(Contact {
        email: "stranger@example.com".to_string(),
        ..Default::default()
    }));
}

#[test]
fn test_apply_to_keeps_record_metadata() {
    let original = record("f1", &["1", "2"]);
    let mut draft = DraftEdit::from_record(&original);
    draft.remove_at(0);
    draft.set_live_enabled(true);

    let applied = draft.apply_to(&original);
    assert_eq!(applied.id, "f1");
    assert_eq!(applied.shareable_link, original.shareable_link);
    assert_eq!(applied.collaborators.len(), 1);
    assert!(applied.live_enabled);
}

#[test]
fn test_collaborator_without_email_is_invalid() {
    let original = record("f1", &[]);
    let mut draft = DraftEdit::from_record(&original);
    draft.add(Contact {
        id: "7".to_string(),
        name: "No Mail".to_string(),
        email: String::new(),
    });

    let form = FormState::derive(&original, &draft);
    assert!(!form.is_valid);
    assert_eq!(form.error, Some(ERROR_INVALID_EMAILS));
    // Pure: deriving again gives the same answer
    assert_eq!(FormState::derive(&original, &draft), form);
}
