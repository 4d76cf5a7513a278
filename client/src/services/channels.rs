//! Channel sidebar reads and channel creation.

#[cfg(test)]
#[path = "channels_test.rs"]
mod channels_test;

use store::{Channel, ChannelKind, FeedFilter, NewChannel, Query, RemoteStore, Server, StoreError, Table};
use uuid::Uuid;

const MAX_NAME_LEN: usize = 100;

/// Stored form of a channel name: trimmed, lower-cased, whitespace runs
/// collapsed to a single `-`.
#[must_use]
pub fn normalize_channel_name(raw: &str) -> String {
    raw.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// # Errors
///
/// Returns a user-facing message when the name is empty or too long.
pub fn validate_channel_name(raw: &str) -> Result<String, &'static str> {
    if raw.trim().chars().count() > MAX_NAME_LEN {
        return Err("Channel name must be 100 characters or fewer.");
    }
    let name = normalize_channel_name(raw);
    if name.is_empty() {
        return Err("Channel name is required.");
    }
    Ok(name)
}

fn channels_query(server_id: Uuid) -> Query {
    Query::from(Table::Channels).eq("server_id", server_id).order_by("position", true).order_by("created_at", true)
}

/// Server header row plus its channels in position order.
///
/// # Errors
///
/// Returns the first failing read.
pub async fn load_server_and_channels<S: RemoteStore>(
    store: &S,
    server_id: Uuid,
) -> Result<(Option<Server>, Vec<Channel>), StoreError> {
    let server = store.fetch_optional(&Query::from(Table::Servers).eq("id", server_id)).await?;
    let channels = store.fetch_all(&channels_query(server_id)).await?;
    Ok((server, channels))
}

/// A single channel row, for the chat header.
///
/// # Errors
///
/// Returns the store's read error.
pub async fn load_channel<S: RemoteStore>(store: &S, channel_id: Uuid) -> Result<Option<Channel>, StoreError> {
    store.fetch_optional(&Query::from(Table::Channels).eq("id", channel_id)).await
}

/// Any channel change in the server re-reads the sidebar.
#[must_use]
pub fn channel_feed(server_id: Uuid) -> FeedFilter {
    FeedFilter::table(Table::Channels).where_eq("server_id", server_id)
}

/// Insert a channel at the end of the server's list.
///
/// # Errors
///
/// Returns the read error for the position lookup or the insert error.
pub async fn create_channel<S: RemoteStore>(
    store: &S,
    server_id: Uuid,
    name: &str,
    kind: ChannelKind,
) -> Result<Channel, StoreError> {
    let existing: Vec<Channel> = store.fetch_all(&channels_query(server_id)).await?;
    let position = i32::try_from(existing.len()).unwrap_or(i32::MAX);
    store.insert_row(&NewChannel { server_id, name: name.to_owned(), kind, position }).await
}
