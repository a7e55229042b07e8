//! Integration tests: profile editor view-model
//!
//! Coverage:
//! - Credential-change validation gates the privileged operation
//! - Two-phase save reports each phase independently
//! - A successful field patch is visible to other views through the session
//! - No-changes saves are rejected before any gateway call

mod common;

use common::{records, signed_in_session, InMemoryStore};
use fitclub::error::{AppError, ValidationError};
use fitclub::models::Role;
use fitclub::vm::ProfileEditor;

#[tokio::test]
async fn valid_credential_change_issues_exactly_one_privileged_update() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().new_credential = "hunter22".into();
    editor.draft_mut().confirm_credential = "hunter22".into();

    let report = editor.save().await.unwrap();

    assert_eq!(store.call_count("update_credential"), 1);
    assert_eq!(report.outcome.credential_ok, Some(true));
    assert_eq!(report.outcome.profile_ok, None);
    assert!(report.closed);
    assert!(!editor.is_open());
}

#[tokio::test]
async fn short_credential_issues_no_privileged_update() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().new_credential = "tiny".into();
    editor.draft_mut().confirm_credential = "tiny".into();

    let err = editor.save().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::CredentialTooShort)
    ));
    assert_eq!(store.call_count("update_credential"), 0);
    assert!(editor.is_open());
}

#[tokio::test]
async fn mismatched_confirmation_issues_no_privileged_update() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().new_credential = "hunter22".into();
    editor.draft_mut().confirm_credential = "hunter23".into();

    let err = editor.save().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::CredentialMismatch)
    ));
    assert_eq!(store.call_count("update_credential"), 0);
}

#[tokio::test]
async fn unchanged_draft_is_rejected_before_any_gateway_call() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();

    let err = editor.save().await.unwrap_err();

    assert!(matches!(
        err,
        AppError::Validation(ValidationError::NoChangesDetected)
    ));
    assert_eq!(store.call_count("update:users"), 0);
    assert_eq!(store.call_count("update_credential"), 0);
}

#[tokio::test]
async fn field_patch_success_propagates_to_other_views_via_the_session() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;

    // Another concurrently-open screen.
    let other_view = session.clone();

    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().display_name = "Jane Doe".into();
    editor.draft_mut().username = "janedoe".into();

    let report = editor.save().await.unwrap();

    assert_eq!(report.outcome.profile_ok, Some(true));
    assert!(report.closed);
    let seen = other_view.current_user().unwrap();
    assert_eq!(seen.display_name, "Jane Doe");
    assert_eq!(seen.username, "janedoe");
}

#[tokio::test]
async fn credential_failure_keeps_a_successful_field_patch() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    store.fail_on("update_credential");

    let mut editor = ProfileEditor::new(session.clone(), records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().display_name = "Jane Doe".into();
    editor.draft_mut().new_credential = "hunter22".into();
    editor.draft_mut().confirm_credential = "hunter22".into();

    let report = editor.save().await.unwrap();

    assert_eq!(report.outcome.profile_ok, Some(true));
    assert_eq!(report.outcome.credential_ok, Some(false));
    assert!(!report.closed);
    assert!(editor.is_open());
    assert_eq!(report.messages.len(), 1);
    // The field patch is not rolled back.
    assert_eq!(session.current_user().unwrap().display_name, "Jane Doe");
}

#[tokio::test]
async fn field_patch_failure_still_attempts_the_credential_change() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    store.fail_on("update");

    let mut editor = ProfileEditor::new(session.clone(), records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().display_name = "Jane Doe".into();
    editor.draft_mut().new_credential = "hunter22".into();
    editor.draft_mut().confirm_credential = "hunter22".into();

    let report = editor.save().await.unwrap();

    assert_eq!(report.outcome.profile_ok, Some(false));
    assert_eq!(report.outcome.credential_ok, Some(true));
    assert_eq!(store.call_count("update_credential"), 1);
    assert!(!report.closed);
    // The cached session user keeps its committed fields.
    assert_eq!(session.current_user().unwrap().display_name, "jane");
}

#[tokio::test]
async fn cancel_discards_the_draft() {
    let store = InMemoryStore::new();
    let session = signed_in_session(&store, "jane", Role::Member).await;
    let mut editor = ProfileEditor::new(session, records(&store));
    editor.begin_edit().unwrap();
    editor.draft_mut().display_name = "Scratch".into();

    editor.cancel();

    assert!(!editor.is_open());
    assert!(editor.draft().display_name.is_empty());
}
