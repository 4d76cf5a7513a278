//! Channel message reads, live insert resolution and sending.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use std::collections::HashMap;

use store::{
    ChangeEvent, ChangeKind, FeedFilter, Message, NewMessage, Profile, Query, RemoteStore, StoreError, Table,
};
use uuid::Uuid;

use crate::state::messages::MessageView;

const MAX_MESSAGE_LEN: usize = 2000;

/// # Errors
///
/// Returns a user-facing message for empty or oversized content.
pub fn validate_message(raw: &str) -> Result<String, &'static str> {
    let content = raw.trim();
    if content.is_empty() {
        return Err("Message cannot be empty.");
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err("Message must be 2000 characters or fewer.");
    }
    Ok(content.to_owned())
}

/// Channel history, oldest first, joined with author profiles.
///
/// Authors are resolved with one batched profile read. Messages whose
/// profile is missing render with an unknown author.
///
/// # Errors
///
/// Returns the first failing read.
pub async fn load_messages<S: RemoteStore>(store: &S, channel_id: Uuid) -> Result<Vec<MessageView>, StoreError> {
    let messages: Vec<Message> = store
        .fetch_all(&Query::from(Table::Messages).eq("channel_id", channel_id).order_by("created_at", true))
        .await?;
    if messages.is_empty() {
        return Ok(Vec::new());
    }

    let mut author_ids: Vec<Uuid> = messages.iter().map(|m| m.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();
    let profiles: Vec<Profile> = store.fetch_all(&Query::from(Table::Profiles).is_in("id", author_ids)).await?;
    let by_id: HashMap<Uuid, Profile> = profiles.into_iter().map(|p| (p.id, p)).collect();

    Ok(messages
        .into_iter()
        .map(|m| {
            let author = by_id.get(&m.user_id);
            MessageView::new(m, author)
        })
        .collect())
}

/// Inserts into one channel.
#[must_use]
pub fn message_feed(channel_id: Uuid) -> FeedFilter {
    FeedFilter::table(Table::Messages).only(ChangeKind::Insert).where_eq("channel_id", channel_id)
}

/// Turn a live insert into a renderable row.
///
/// Returns `Ok(None)` for non-insert events and for messages whose author
/// profile cannot be found; those are dropped rather than shown.
///
/// # Errors
///
/// Returns a decode error for malformed rows or the profile read error.
pub async fn resolve_incoming<S: RemoteStore>(
    store: &S,
    event: &ChangeEvent,
) -> Result<Option<MessageView>, StoreError> {
    if event.table != Table::Messages || event.kind != ChangeKind::Insert {
        return Ok(None);
    }
    let message: Message = event.decode()?;
    let author: Option<Profile> = store.fetch_optional(&Query::from(Table::Profiles).eq("id", message.user_id)).await?;
    Ok(author.map(|profile| MessageView::new(message, Some(&profile))))
}

/// # Errors
///
/// Returns the insert error; the caller keeps the draft so it can be resent.
pub async fn send_message<S: RemoteStore>(
    store: &S,
    channel_id: Uuid,
    user_id: Uuid,
    content: &str,
) -> Result<Message, StoreError> {
    store.insert_row(&NewMessage { channel_id, user_id, content: content.to_owned() }).await
}
