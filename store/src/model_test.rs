use super::*;

// =============================================================
// Table names
// =============================================================

#[test]
fn table_names_match_hosted_schema() {
    assert_eq!(Table::Profiles.as_str(), "profiles");
    assert_eq!(Table::ServerMembers.as_str(), "server_members");
    assert_eq!(Table::DirectMessages.as_str(), "direct_messages");
    assert_eq!(Table::Friendships.to_string(), "friendships");
}

#[test]
fn table_parse_accepts_every_name_and_rejects_unknown() {
    for table in Table::ALL {
        assert_eq!(Table::parse(table.as_str()), Some(table));
    }
    assert_eq!(Table::parse("users"), None);
}

// =============================================================
// Row decoding
// =============================================================

#[test]
fn profile_decodes_backend_row() {
    let row = serde_json::json!({
        "id": "6f1c2d3e-0000-4000-8000-000000000001",
        "username": "alice",
        "avatar_url": null,
        "bio": "",
        "status": "dnd",
        "created_at": "2024-05-01T12:30:00.123456+00:00",
        "updated_at": "2024-05-01T12:30:00+00:00"
    });
    let profile: Profile = serde_json::from_value(row).expect("profile should decode");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.status, PresenceStatus::Dnd);
    assert!(profile.avatar_url.is_none());
    assert!(profile.created_at > profile.updated_at);
}

#[test]
fn channel_type_column_maps_to_kind() {
    let row = serde_json::json!({
        "id": "6f1c2d3e-0000-4000-8000-000000000002",
        "server_id": "6f1c2d3e-0000-4000-8000-000000000003",
        "name": "lounge",
        "type": "voice",
        "position": 2,
        "created_at": "2024-05-01T12:30:00Z"
    });
    let channel: Channel = serde_json::from_value(row).expect("channel should decode");
    assert_eq!(channel.kind, ChannelKind::Voice);
    assert_eq!(channel.position, 2);
}

#[test]
fn message_without_attachments_defaults_to_null_payload() {
    let row = serde_json::json!({
        "id": "6f1c2d3e-0000-4000-8000-000000000004",
        "channel_id": "6f1c2d3e-0000-4000-8000-000000000005",
        "user_id": "6f1c2d3e-0000-4000-8000-000000000006",
        "content": "hi",
        "created_at": "2024-05-01T12:30:00Z",
        "updated_at": "2024-05-01T12:30:00Z"
    });
    let message: Message = serde_json::from_value(row).expect("message should decode");
    assert!(message.attachments.is_null());
}

// =============================================================
// Insert payloads
// =============================================================

#[test]
fn new_channel_serializes_kind_as_type_column() {
    let payload = NewChannel {
        server_id: uuid::Uuid::nil(),
        name: "general".to_owned(),
        kind: ChannelKind::Text,
        position: 0,
    };
    let value = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(value["type"], "text");
    assert!(value.get("kind").is_none());
}

#[test]
fn new_member_serializes_lowercase_role() {
    let payload = NewServerMember { server_id: uuid::Uuid::nil(), user_id: uuid::Uuid::nil(), role: MemberRole::Owner };
    let value = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(value["role"], "owner");
}

#[test]
fn enum_defaults_match_column_defaults() {
    assert_eq!(PresenceStatus::default(), PresenceStatus::Online);
    assert_eq!(MemberRole::default(), MemberRole::Member);
    assert_eq!(ChannelKind::default(), ChannelKind::Text);
    assert_eq!(FriendshipStatus::default(), FriendshipStatus::Pending);
}
