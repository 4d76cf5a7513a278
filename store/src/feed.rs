//! Change-feed filters, events and the scoped [`Subscription`] guard.
//!
//! DESIGN
//! ======
//! A subscription is a resource tied to the lifetime of the value that owns
//! it: dropping a [`Subscription`] always releases the backend side, so a
//! view that switches parent ids or unmounts cannot leak a live feed on an
//! early-return path.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::mpsc::UnboundedReceiver;
use futures::{FutureExt, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;
use crate::model::Table;
use crate::query::Filter;

/// Row-level change type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

impl ChangeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Which change kinds a subscription wants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    Only(ChangeKind),
}

impl EventFilter {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "*",
            Self::Only(kind) => kind.as_str(),
        }
    }

    #[must_use]
    pub fn accepts(self, kind: ChangeKind) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == kind,
        }
    }
}

/// Scope of one change-feed subscription.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedFilter {
    pub table: Table,
    pub events: EventFilter,
    /// Optional `column = value` row filter.
    pub row: Option<Filter>,
}

impl FeedFilter {
    #[must_use]
    pub fn table(table: Table) -> Self {
        Self { table, events: EventFilter::All, row: None }
    }

    #[must_use]
    pub fn only(mut self, kind: ChangeKind) -> Self {
        self.events = EventFilter::Only(kind);
        self
    }

    #[must_use]
    pub fn where_eq(mut self, column: &str, value: impl Serialize) -> Self {
        self.row = Some(Filter::eq(column, value));
        self
    }

    /// Whether `event` falls inside this scope.
    #[must_use]
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        event.table == self.table
            && self.events.accepts(event.kind)
            && self.row.as_ref().map_or(true, |f| f.matches(event.record()))
    }

    /// Row filter rendered as `column=eq.value` for realtime join configs.
    #[must_use]
    pub fn row_param(&self) -> Option<String> {
        self.row.as_ref().map(|f| {
            let (column, op) = f.to_param();
            format!("{column}={op}")
        })
    }
}

/// One row-level change delivered by the feed.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    /// New row image (`null` for deletes).
    pub new: Value,
    /// Previous row image, when the backend provides one.
    pub old: Value,
}

impl ChangeEvent {
    /// The row the event is about: the old image for deletes, else the new one.
    #[must_use]
    pub fn record(&self) -> &Value {
        match self.kind {
            ChangeKind::Delete => &self.old,
            ChangeKind::Insert | ChangeKind::Update => &self.new,
        }
    }

    /// Decode the event's row into a typed model.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Decode`] when the row does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        Ok(serde_json::from_value(self.record().clone())?)
    }
}

/// Live change-feed handle. Dropping it releases the subscription.
pub struct Subscription {
    filter: FeedFilter,
    events: UnboundedReceiver<ChangeEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(
        filter: FeedFilter,
        events: UnboundedReceiver<ChangeEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self { filter, events, release: Some(Box::new(release)) }
    }

    #[must_use]
    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    /// Wait for the next event; `None` once the feed has been closed.
    pub async fn next_event(&mut self) -> Option<ChangeEvent> {
        self.events.next().await
    }

    /// Take an already-delivered event without waiting.
    pub fn try_next_event(&mut self) -> Option<ChangeEvent> {
        self.events.next().now_or_never().flatten()
    }
}

impl Stream for Subscription {
    type Item = ChangeEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ChangeEvent>> {
        self.get_mut().events.poll_next_unpin(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("filter", &self.filter).finish_non_exhaustive()
    }
}
