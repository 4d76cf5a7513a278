//! Row and insert-payload types for the hosted schema.
//!
//! DESIGN
//! ======
//! Each row type mirrors one table exactly as the backend returns it, so a
//! JSON row deserializes without any client-side reshaping. Insert payloads
//! carry only the columns the client sets; ids, timestamps and column
//! defaults are filled by the store.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// =============================================================================
// TABLES
// =============================================================================

/// The seven tables of the hosted schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Profiles,
    Servers,
    ServerMembers,
    Channels,
    Messages,
    DirectMessages,
    Friendships,
}

impl Table {
    pub const ALL: [Table; 7] = [
        Table::Profiles,
        Table::Servers,
        Table::ServerMembers,
        Table::Channels,
        Table::Messages,
        Table::DirectMessages,
        Table::Friendships,
    ];

    /// Table name as used in REST paths and change-feed configs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Servers => "servers",
            Self::ServerMembers => "server_members",
            Self::Channels => "channels",
            Self::Messages => "messages",
            Self::DirectMessages => "direct_messages",
            Self::Friendships => "friendships",
        }
    }

    /// Parse a table name; unknown names yield `None`.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed row that lives in a known table.
pub trait Row: DeserializeOwned {
    const TABLE: Table;
}

/// A typed insert payload; the store answers with the full [`Row`].
pub trait Insert: Serialize {
    type Row: Row;
}

// =============================================================================
// PROFILES
// =============================================================================

/// Presence shown next to a profile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    #[default]
    Online,
    Offline,
    Away,
    Dnd,
}

impl PresenceStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Away => "away",
            Self::Dnd => "dnd",
        }
    }
}

/// Public profile of an account. Created at registration, never deleted here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub status: PresenceStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Row for Profile {
    const TABLE: Table = Table::Profiles;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewProfile {
    /// Same id as the auth account.
    pub id: Uuid,
    pub username: String,
    pub status: PresenceStatus,
}

impl Insert for NewProfile {
    type Row = Profile;
}

// =============================================================================
// SERVERS
// =============================================================================

/// A community grouping channels and members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub icon_url: Option<String>,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Row for Server {
    const TABLE: Table = Table::Servers;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewServer {
    pub name: String,
    pub description: String,
    pub owner_id: Uuid,
}

impl Insert for NewServer {
    type Row = Server;
}

/// Role of a member inside a server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Owner,
    Admin,
    #[default]
    Member,
}

/// Membership link; determines which servers a session can see.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerMember {
    pub id: Uuid,
    pub server_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

impl Row for ServerMember {
    const TABLE: Table = Table::ServerMembers;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewServerMember {
    pub server_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
}

impl Insert for NewServerMember {
    type Row = ServerMember;
}

// =============================================================================
// CHANNELS
// =============================================================================

/// Text channels carry messages; voice channels are listed only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    #[default]
    Text,
    Voice,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub id: Uuid,
    pub server_id: Uuid,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ChannelKind,
    #[serde(default)]
    pub position: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Row for Channel {
    const TABLE: Table = Table::Channels;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewChannel {
    pub server_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    pub position: i32,
}

impl Insert for NewChannel {
    type Row = Channel;
}

// =============================================================================
// MESSAGES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    /// Opaque attachment payload; the client never interprets it.
    #[serde(default)]
    pub attachments: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Row for Message {
    const TABLE: Table = Table::Messages;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewMessage {
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

impl Insert for NewMessage {
    type Row = Message;
}

// =============================================================================
// SCHEMA-ONLY TABLES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    #[serde(default)]
    pub attachments: serde_json::Value,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Row for DirectMessage {
    const TABLE: Table = Table::DirectMessages;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
    Blocked,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_id: Uuid,
    #[serde(default)]
    pub status: FriendshipStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Row for Friendship {
    const TABLE: Table = Table::Friendships;
}
