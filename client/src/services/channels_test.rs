use store::{MemoryStore, RemoteStore};

use super::*;
use crate::services::servers::{DEFAULT_CHANNEL, create_server, validate_server_input};

#[test]
fn normalize_lowercases_and_dashes_whitespace() {
    assert_eq!(normalize_channel_name("General Chat"), "general-chat");
    assert_eq!(normalize_channel_name("  Off   Topic\tStuff "), "off-topic-stuff");
    assert_eq!(normalize_channel_name("already-fine"), "already-fine");
}

#[test]
fn validate_channel_name_bounds() {
    assert_eq!(validate_channel_name("   "), Err("Channel name is required."));
    assert_eq!(validate_channel_name(&"c".repeat(101)), Err("Channel name must be 100 characters or fewer."));
    assert_eq!(validate_channel_name("Voice Lobby"), Ok("voice-lobby".to_owned()));
}

#[tokio::test]
async fn created_channels_append_in_position_order() {
    let store = MemoryStore::new();
    let owner = Uuid::new_v4();
    let input = validate_server_input("Guild", "").expect("valid");
    let created = create_server(&store, owner, &input).await.expect("created");
    let server_id = created.server.id;

    let random = create_channel(&store, server_id, "random", ChannelKind::Text).await.expect("random");
    let lounge = create_channel(&store, server_id, "lounge", ChannelKind::Voice).await.expect("lounge");
    assert_eq!(random.position, 1);
    assert_eq!(lounge.position, 2);

    let (server, channels) = load_server_and_channels(&store, server_id).await.expect("load");
    assert_eq!(server.map(|s| s.name).as_deref(), Some("Guild"));
    let names: Vec<_> = channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec![DEFAULT_CHANNEL, "random", "lounge"]);
}

#[tokio::test]
async fn channel_feed_ignores_other_servers() {
    let store = MemoryStore::new();
    let watched = Uuid::new_v4();
    let mut feed = store.subscribe(channel_feed(watched)).expect("subscribe");

    create_channel(&store, Uuid::new_v4(), "elsewhere", ChannelKind::Text).await.expect("insert");
    assert!(feed.try_next_event().is_none());

    create_channel(&store, watched, "here", ChannelKind::Text).await.expect("insert");
    assert!(feed.try_next_event().is_some());
}

#[tokio::test]
async fn load_channel_returns_none_for_unknown_id() {
    let store = MemoryStore::new();
    assert!(load_channel(&store, Uuid::new_v4()).await.expect("read").is_none());
}
