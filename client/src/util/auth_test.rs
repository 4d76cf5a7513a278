use store::AuthUser;
use uuid::Uuid;

use super::*;

fn signed_in() -> SessionState {
    SessionState::resolved(Some(AuthUser { id: Uuid::new_v4(), email: "ana@example.com".to_owned() }))
}

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    assert!(should_redirect_unauth(&SessionState::resolved(None)));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = SessionState::default();
    assert!(!should_redirect_unauth(&state));
    assert!(!should_leave_login(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    assert!(!should_redirect_unauth(&signed_in()));
}

#[test]
fn signed_in_user_leaves_login() {
    assert!(should_leave_login(&signed_in()));
    assert!(!should_leave_login(&SessionState::resolved(None)));
}
