use time::OffsetDateTime;

use super::*;
use crate::state::feed::FeedSlot;

fn channel(server_id: Uuid, name: &str, kind: ChannelKind, position: i32) -> Channel {
    Channel {
        id: Uuid::new_v4(),
        server_id,
        name: name.to_owned(),
        kind,
        position,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn server(id: Uuid) -> Server {
    Server {
        id,
        name: "Guild".to_owned(),
        description: String::new(),
        icon_url: None,
        owner_id: Uuid::new_v4(),
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

#[test]
fn snapshot_splits_text_and_voice() {
    let server_id = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(server_id);
    let mut state = ChannelListState::default();
    state.begin(token);

    let channels = vec![
        channel(server_id, "general", ChannelKind::Text, 0),
        channel(server_id, "lounge", ChannelKind::Voice, 1),
        channel(server_id, "random", ChannelKind::Text, 2),
    ];
    assert!(state.apply_snapshot(token, Ok((Some(server(server_id)), channels))));

    let text: Vec<_> = state.text_channels().map(|c| c.name.as_str()).collect();
    let voice: Vec<_> = state.voice_channels().map(|c| c.name.as_str()).collect();
    assert_eq!(text, vec!["general", "random"]);
    assert_eq!(voice, vec!["lounge"]);
    assert_eq!(state.server.as_ref().map(|s| s.id), Some(server_id));
}

#[test]
fn rows_of_another_server_are_never_shown() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(b);
    let mut state = ChannelListState::default();
    state.begin(token);

    state.apply_snapshot(
        token,
        Ok((Some(server(a)), vec![channel(a, "a-only", ChannelKind::Text, 0), channel(b, "b", ChannelKind::Text, 0)])),
    );
    assert!(state.server.is_none());
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].name, "b");
}

#[test]
fn late_snapshot_after_switch_is_discarded() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let mut state = ChannelListState::default();
    let token_a = slot.activate(a);
    state.begin(token_a);
    let token_b = slot.activate(b);
    state.begin(token_b);

    assert!(!state.apply_snapshot(token_a, Ok((Some(server(a)), vec![channel(a, "x", ChannelKind::Text, 0)]))));
    assert!(state.items.is_empty());
}

#[test]
fn default_selection_prefers_first_text_channel() {
    let server_id = Uuid::new_v4();
    let mut slot = FeedSlot::<()>::default();
    let token = slot.activate(server_id);
    let mut state = ChannelListState::default();
    state.begin(token);
    let voice = channel(server_id, "lounge", ChannelKind::Voice, 0);
    let text = channel(server_id, "general", ChannelKind::Text, 1);
    state.apply_snapshot(token, Ok((None, vec![voice.clone(), text.clone()])));

    assert_eq!(state.default_selection(None), Some(text.id));
    assert_eq!(state.default_selection(Some(voice.id)), None);
}

#[test]
fn default_selection_is_none_for_empty_server() {
    let state = ChannelListState::default();
    assert_eq!(state.default_selection(None), None);
}

#[test]
fn overlapping_reloads_keep_the_newest_result() {
    let mut slot = FeedSlot::<()>::default();
    let mut state = ChannelListState::default();
    let server_id = Uuid::new_v4();
    let token = slot.activate(server_id);
    state.begin(token);

    let first = state.issue_reload();
    let second = state.issue_reload();
    let both = vec![
        channel(server_id, "general", ChannelKind::Text, 0),
        channel(server_id, "random", ChannelKind::Text, 1),
    ];
    let only_first = vec![both[0].clone()];

    assert!(state.apply_reload(token, second, Ok((None, both))));
    assert!(!state.apply_reload(token, first, Ok((None, only_first))));
    assert_eq!(state.items.len(), 2);
}
