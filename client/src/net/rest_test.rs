use serde_json::json;
use store::AuthUser;
use time::macros::datetime;
use uuid::Uuid;

use super::*;

fn test_store() -> RestStore {
    let config = StoreConfig::from_parts(Some("https://demo.example.co"), Some("anon-key")).expect("config");
    RestStore::new(config)
}

fn sample_session() -> Session {
    Session::new(AuthUser { id: Uuid::new_v4(), email: "ana@example.com".to_owned() }, "jwt-1".to_owned())
}

const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

#[test]
fn error_message_prefers_backend_text() {
    assert_eq!(error_message(400, r#"{"code":400,"msg":"Invalid login credentials"}"#), "Invalid login credentials");
    assert_eq!(
        error_message(409, r#"{"code":"23505","message":"duplicate key value","details":null}"#),
        "duplicate key value"
    );
    assert_eq!(
        error_message(400, r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
        "Email not confirmed"
    );
}

#[test]
fn error_message_falls_back_to_status() {
    assert_eq!(error_message(502, "<html>bad gateway</html>"), "request failed with status 502");
    assert_eq!(error_message(500, r#"{"message":""}"#), "request failed with status 500");
}

#[test]
fn parse_session_reads_token_and_user() {
    let id = Uuid::new_v4();
    let body = json!({
        "access_token": "jwt",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "r",
        "user": { "id": id, "email": "ana@example.com", "aud": "authenticated" }
    });
    let session = parse_session(&body, NOW).expect("session");
    assert_eq!(session.access_token, "jwt");
    assert_eq!(session.user.id, id);
    assert_eq!(session.user.email, "ana@example.com");
    assert_eq!(session.refresh_token.as_deref(), Some("r"));
    assert_eq!(session.expires_at, Some(datetime!(2026-03-01 13:00 UTC)));
}

#[test]
fn parse_session_prefers_absolute_expiry() {
    let body = json!({
        "access_token": "jwt",
        "expires_in": 3600,
        "expires_at": 1_772_366_400,
        "user": { "id": Uuid::new_v4(), "email": "ana@example.com" }
    });
    let session = parse_session(&body, datetime!(2026-03-01 11:30 UTC)).expect("session");
    assert_eq!(session.expires_at, Some(NOW));
    assert_eq!(session.refresh_token, None);
}

#[test]
fn check_session_keeps_fresh_tokens() {
    let session = Session { expires_at: Some(datetime!(2026-03-01 13:00 UTC)), ..sample_session() };
    assert_eq!(check_session(&session, NOW), SessionCheck::Valid);
    assert_eq!(check_session(&sample_session(), NOW), SessionCheck::Valid);
}

#[test]
fn check_session_refreshes_tokens_near_expiry() {
    let session = Session {
        refresh_token: Some("r-1".to_owned()),
        expires_at: Some(datetime!(2026-03-01 12:00:30 UTC)),
        ..sample_session()
    };
    assert_eq!(check_session(&session, NOW), SessionCheck::Refresh("r-1".to_owned()));
}

#[test]
fn check_session_drops_expired_tokens_without_refresh() {
    let session = Session { expires_at: Some(datetime!(2026-03-01 11:00 UTC)), ..sample_session() };
    assert_eq!(check_session(&session, NOW), SessionCheck::Expired);
}

#[test]
fn parse_session_without_token_asks_for_confirmation() {
    let body = json!({ "id": Uuid::new_v4(), "email": "ana@example.com" });
    let err = parse_session(&body, NOW).expect_err("no token");
    assert_eq!(err, StoreError::Auth("Check your email to confirm your account".to_owned()));
}

#[test]
fn first_row_unwraps_representation_array() {
    assert_eq!(first_row(json!([{"id": 1}, {"id": 2}])).expect("row"), json!({"id": 1}));
    assert_eq!(first_row(json!({"id": 3})).expect("row"), json!({"id": 3}));
    assert!(first_row(json!([])).is_err());
    assert!(first_row(json!("nope")).is_err());
}

#[test]
fn sign_up_body_carries_username_metadata() {
    let body = sign_up_body("ana@example.com", "secret1", "ana");
    assert_eq!(body["data"]["username"], "ana");
    assert_eq!(body["email"], "ana@example.com");
}

#[test]
fn bearer_switches_from_anon_key_to_access_token() {
    let store = test_store();
    assert_eq!(store.bearer(), "anon-key");
    store.set_session(Some(sample_session()));
    assert_eq!(store.bearer(), "jwt-1");
    store.set_session(None);
    assert_eq!(store.bearer(), "anon-key");
}

#[tokio::test]
async fn session_changes_reach_auth_listeners() {
    let store = test_store();
    let mut events = store.auth_events();
    let session = sample_session();

    store.set_session(Some(session.clone()));
    store.set_session(None);

    assert_eq!(events.next_event().await, Some(AuthEvent::SignedIn(session.clone())));
    assert_eq!(events.next_event().await, Some(AuthEvent::SignedOut));
    assert_eq!(store.clone().session().await.expect("session"), None);
}

#[test]
fn dropping_auth_events_unregisters_listener() {
    let store = test_store();
    let events = store.auth_events();
    assert_eq!(store.listeners.senders.lock().expect("lock").len(), 1);
    drop(events);
    assert!(store.listeners.senders.lock().expect("lock").is_empty());
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn table_calls_are_unavailable_outside_the_browser() {
    let store = test_store();
    let err = store.select(&Query::from(Table::Servers)).await.expect_err("ssr stub");
    assert_eq!(err, StoreError::Unavailable("not available on server".to_owned()));
    assert!(store.subscribe(FeedFilter::table(Table::Messages)).is_err());
}
