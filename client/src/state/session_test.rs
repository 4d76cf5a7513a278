use store::Session;

use super::*;

fn user(email: &str) -> AuthUser {
    AuthUser { id: Uuid::new_v4(), email: email.to_owned() }
}

#[test]
fn default_state_is_loading_without_user() {
    let state = SessionState::default();
    assert!(state.loading);
    assert!(state.user.is_none());
}

#[test]
fn apply_tracks_sign_in_and_sign_out() {
    let mut state = SessionState::default();
    let ana = user("ana@example.com");

    state.apply(&AuthEvent::SignedIn(Session::new(ana.clone(), "t".to_owned())));
    assert!(!state.loading);
    assert_eq!(state.user_id(), Some(ana.id));

    state.apply(&AuthEvent::SignedOut);
    assert!(!state.loading);
    assert_eq!(state.user_id(), None);
}

#[test]
fn display_name_is_email_local_part() {
    let state = SessionState::resolved(Some(user("bo.peep@example.com")));
    assert_eq!(state.display_name().as_deref(), Some("bo.peep"));
    assert_eq!(SessionState::resolved(None).display_name(), None);
}

#[test]
fn notice_survives_same_user_and_clears_on_switch() {
    let ana = user("ana@example.com");
    let mut state = SessionState::resolved(None);
    state.signed_in_with_notice(ana.clone(), "profile missing".to_owned());

    state.apply(&AuthEvent::SignedIn(Session::new(ana, "t".to_owned())));
    assert_eq!(state.notice.as_deref(), Some("profile missing"));

    state.apply(&AuthEvent::SignedIn(Session::new(user("bo@example.com"), "t".to_owned())));
    assert!(state.notice.is_none());
}

#[test]
fn dismiss_notice_keeps_identity() {
    let ana = user("ana@example.com");
    let mut state = SessionState::resolved(None);
    state.signed_in_with_notice(ana.clone(), "profile missing".to_owned());
    state.dismiss_notice();
    assert!(state.notice.is_none());
    assert_eq!(state.user, Some(ana));
}
