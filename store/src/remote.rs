//! The remote store contract consumed by the client.
//!
//! SYSTEM CONTEXT
//! ==============
//! The hosted backend owns durable state, auth and change fan-out. The
//! client only ever talks to it through [`RemoteStore`], which both the
//! browser adapter and [`crate::MemoryStore`] implement. Callers are generic
//! over the trait, so every flow can be exercised against the in-memory
//! store in tests.

#[cfg(test)]
#[path = "remote_test.rs"]
mod remote_test;

use futures::channel::mpsc::UnboundedReceiver;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::StoreError;
use crate::feed::{FeedFilter, Subscription};
use crate::model::{Insert, Row, Table};
use crate::query::Query;

/// Authenticated account identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// How long before expiry a session is treated as due for refresh.
pub const REFRESH_MARGIN: Duration = Duration::seconds(60);

/// An active auth session.
///
/// `expires_at` and `refresh_token` are absent for sessions that never
/// expire (the in-memory store). Sessions persisted before they existed
/// deserialize with both unset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, with = "time::serde::timestamp::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl Session {
    /// A session with no expiry.
    #[must_use]
    pub fn new(user: AuthUser, access_token: String) -> Self {
        Self { user, access_token, refresh_token: None, expires_at: None }
    }

    /// Whether the access token is expired or within [`REFRESH_MARGIN`] of it.
    #[must_use]
    pub fn needs_refresh(&self, now: OffsetDateTime) -> bool {
        self.expires_at.is_some_and(|at| at - REFRESH_MARGIN <= now)
    }
}

/// Session transition pushed to auth listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}

impl AuthEvent {
    /// Identity after the transition.
    #[must_use]
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn(session) => Some(&session.user),
            Self::SignedOut => None,
        }
    }
}

/// Stream of auth transitions; dropping it unregisters the listener.
pub struct AuthEvents {
    events: UnboundedReceiver<AuthEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl AuthEvents {
    pub fn new(events: UnboundedReceiver<AuthEvent>, release: impl FnOnce() + Send + 'static) -> Self {
        Self { events, release: Some(Box::new(release)) }
    }

    pub async fn next_event(&mut self) -> Option<AuthEvent> {
        self.events.next().await
    }
}

impl Drop for AuthEvents {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Table, auth and change-feed operations of the hosted backend.
///
/// Futures are not required to be `Send`: the browser runs everything on a
/// single cooperative event loop.
#[allow(async_fn_in_trait)]
pub trait RemoteStore: Clone + 'static {
    /// Read rows matching `query`.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Insert one row and return it as stored (ids, timestamps, defaults).
    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, StoreError>;

    /// Register an account; `username` travels as account metadata.
    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Session, StoreError>;

    async fn sign_out(&self) -> Result<(), StoreError>;

    /// The persisted session, if any.
    async fn session(&self) -> Result<Option<Session>, StoreError>;

    /// Listen for session transitions for as long as the returned value lives.
    fn auth_events(&self) -> AuthEvents;

    /// Open a change-feed subscription.
    ///
    /// # Errors
    ///
    /// Returns an error when the feed cannot be opened in this build.
    fn subscribe(&self, filter: FeedFilter) -> Result<Subscription, StoreError>;

    /// Read and decode rows.
    async fn fetch_all<T: Row>(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        debug_assert_eq!(query.table, T::TABLE);
        self.select(query)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .collect()
    }

    /// Single row or `None`.
    async fn fetch_optional<T: Row>(&self, query: &Query) -> Result<Option<T>, StoreError> {
        let query = query.clone().limit(1);
        Ok(self.fetch_all::<T>(&query).await?.into_iter().next())
    }

    /// Insert a typed payload and decode the stored row.
    async fn insert_row<I: Insert>(&self, payload: &I) -> Result<I::Row, StoreError> {
        let row = serde_json::to_value(payload)?;
        let stored = self.insert(<I::Row as Row>::TABLE, row).await?;
        Ok(serde_json::from_value(stored)?)
    }
}
