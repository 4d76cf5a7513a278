//! Message list for the selected channel.
//!
//! DESIGN
//! ======
//! The feed is opened before the snapshot read, so inserts can arrive while
//! the snapshot is in flight. Both paths merge into one list keyed by message
//! id and ordered by `created_at`; whichever arrives second is a no-op for
//! rows already present.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use store::{Message, Profile, StoreError};
use time::OffsetDateTime;
use uuid::Uuid;

use super::feed::ScopeToken;

/// Author label used when a message's profile row is missing.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Author {
    pub username: String,
    pub avatar_url: Option<String>,
}

impl Author {
    #[must_use]
    pub fn unknown() -> Self {
        Self { username: UNKNOWN_AUTHOR.to_owned(), avatar_url: None }
    }
}

impl From<&Profile> for Author {
    fn from(profile: &Profile) -> Self {
        Self { username: profile.username.clone(), avatar_url: profile.avatar_url.clone() }
    }
}

/// A message joined with its author's display fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageView {
    pub id: Uuid,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub author: Author,
}

impl MessageView {
    #[must_use]
    pub fn new(message: Message, author: Option<&Profile>) -> Self {
        Self {
            id: message.id,
            channel_id: message.channel_id,
            user_id: message.user_id,
            content: message.content,
            created_at: message.created_at,
            author: author.map_or_else(Author::unknown, Author::from),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MessageListState {
    pub items: Vec<MessageView>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped whenever rows are added; the list scrolls to the bottom on change.
    pub scroll_seq: u64,
    active: Option<ScopeToken>,
}

impl MessageListState {
    pub fn begin(&mut self, token: ScopeToken) {
        self.items.clear();
        self.loading = true;
        self.error = None;
        self.active = Some(token);
    }

    pub fn reset(&mut self) {
        *self = Self {
            scroll_seq: self.scroll_seq,
            ..Self::default()
        };
    }

    #[must_use]
    pub fn channel_id(&self) -> Option<Uuid> {
        self.active.map(ScopeToken::parent)
    }

    /// Merge the snapshot read with anything the feed already delivered.
    pub fn apply_snapshot(&mut self, token: ScopeToken, result: Result<Vec<MessageView>, StoreError>) -> bool {
        if self.active != Some(token) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(snapshot) => {
                let live = std::mem::take(&mut self.items);
                for view in snapshot.into_iter().chain(live) {
                    self.insert_sorted(token, view);
                }
                self.error = None;
                self.scroll_seq += 1;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    /// Apply one live insert. Returns `true` when the row was added.
    pub fn apply_insert(&mut self, token: ScopeToken, view: MessageView) -> bool {
        if self.active != Some(token) {
            return false;
        }
        let added = self.insert_sorted(token, view);
        if added {
            self.scroll_seq += 1;
        }
        added
    }

    fn insert_sorted(&mut self, token: ScopeToken, view: MessageView) -> bool {
        if view.channel_id != token.parent() || self.items.iter().any(|m| m.id == view.id) {
            return false;
        }
        let at = self.items.partition_point(|m| m.created_at <= view.created_at);
        self.items.insert(at, view);
        true
    }
}
