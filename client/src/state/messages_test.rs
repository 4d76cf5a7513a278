use serde_json::Value;
use store::PresenceStatus;
use time::Duration;

use super::*;
use crate::state::feed::FeedSlot;

fn message(channel_id: Uuid, content: &str, at_secs: i64) -> Message {
    let at = OffsetDateTime::UNIX_EPOCH + Duration::seconds(at_secs);
    Message {
        id: Uuid::new_v4(),
        channel_id,
        user_id: Uuid::new_v4(),
        content: content.to_owned(),
        attachments: Value::Array(Vec::new()),
        created_at: at,
        updated_at: at,
    }
}

fn view(channel_id: Uuid, content: &str, at_secs: i64) -> MessageView {
    MessageView::new(message(channel_id, content, at_secs), None)
}

fn contents(state: &MessageListState) -> Vec<&str> {
    state.items.iter().map(|m| m.content.as_str()).collect()
}

#[test]
fn missing_profile_renders_unknown_author() {
    let v = view(Uuid::new_v4(), "hi", 0);
    assert_eq!(v.author.username, UNKNOWN_AUTHOR);
    assert_eq!(v.author.avatar_url, None);
}

#[test]
fn profile_supplies_author_fields() {
    let msg = message(Uuid::new_v4(), "hi", 0);
    let profile = Profile {
        id: msg.user_id,
        username: "ana".to_owned(),
        avatar_url: Some("https://img/ana.png".to_owned()),
        bio: String::new(),
        status: PresenceStatus::Online,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    };
    let v = MessageView::new(msg, Some(&profile));
    assert_eq!(v.author, Author { username: "ana".to_owned(), avatar_url: Some("https://img/ana.png".to_owned()) });
}

#[test]
fn snapshot_merges_with_events_received_while_loading() {
    let channel = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(channel);
    let mut state = MessageListState::default();
    state.begin(token);

    let early = view(channel, "early", 1);
    let live = view(channel, "live", 3);
    assert!(state.apply_insert(token, live.clone()));
    // The snapshot also saw `live`; it must not appear twice.
    state.apply_snapshot(token, Ok(vec![early, view(channel, "middle", 2), live]));

    assert_eq!(contents(&state), vec!["early", "middle", "live"]);
    assert!(!state.loading);
}

#[test]
fn inserts_are_deduplicated_and_kept_in_time_order() {
    let channel = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(channel);
    let mut state = MessageListState::default();
    state.begin(token);
    state.apply_snapshot(token, Ok(vec![view(channel, "a", 1), view(channel, "c", 3)]));

    let b = view(channel, "b", 2);
    assert!(state.apply_insert(token, b.clone()));
    assert!(!state.apply_insert(token, b));
    assert_eq!(contents(&state), vec!["a", "b", "c"]);
}

#[test]
fn messages_for_other_channels_are_rejected() {
    let channel = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(channel);
    let mut state = MessageListState::default();
    state.begin(token);

    assert!(!state.apply_insert(token, view(Uuid::new_v4(), "elsewhere", 1)));
    assert!(state.items.is_empty());
}

#[test]
fn stale_scope_cannot_touch_new_channel_list() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let mut slot = FeedSlot::<()>::default();
    let mut state = MessageListState::default();
    let token_a = slot.activate(a);
    state.begin(token_a);
    let token_b = slot.activate(b);
    state.begin(token_b);

    assert!(!state.apply_insert(token_a, view(a, "late", 1)));
    assert!(!state.apply_snapshot(token_a, Ok(vec![view(a, "late snapshot", 0)])));
    assert!(state.items.is_empty());
    assert_eq!(state.channel_id(), Some(b));
}

#[test]
fn scroll_seq_advances_only_when_rows_are_added() {
    let channel = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(channel);
    let mut state = MessageListState::default();
    state.begin(token);

    let m = view(channel, "x", 1);
    state.apply_insert(token, m.clone());
    let after_first = state.scroll_seq;
    state.apply_insert(token, m);
    assert_eq!(state.scroll_seq, after_first);
}
