//! In-process [`RemoteStore`] implementation.
//!
//! DESIGN
//! ======
//! `MemoryStore` is a cheaply clonable handle over shared tables of JSON
//! rows. It fills ids, timestamps and column defaults the way the hosted
//! backend does, evaluates [`Query`] values directly, keeps email/password
//! accounts plus one persisted session, and fans every write out to the
//! matching change-feed subscribers. Writes can be made to fail on demand so
//! multi-step flows can be tested against partial failure.
//!
//! TRADE-OFFS
//! ==========
//! Row-level security is not modelled: every session sees every row. The
//! client never relies on the store hiding rows, only on filters it sends.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::channel::mpsc::{self, UnboundedSender};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::error::StoreError;
use crate::feed::{ChangeEvent, ChangeKind, FeedFilter, Subscription};
use crate::model::Table;
use crate::query::Query;
use crate::remote::{AuthEvent, AuthEvents, AuthUser, RemoteStore, Session};

const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// STATE
// =============================================================================

struct Account {
    user: AuthUser,
    /// Sign-up metadata, as the hosted backend keeps it on the auth user.
    username: String,
    salt: Uuid,
    digest: Vec<u8>,
}

struct Subscriber {
    id: u64,
    filter: FeedFilter,
    tx: UnboundedSender<ChangeEvent>,
}

#[derive(Default)]
struct Inner {
    tables: HashMap<Table, Vec<Value>>,
    accounts: HashMap<String, Account>,
    session: Option<Session>,
    subscribers: Vec<Subscriber>,
    auth_listeners: Vec<(u64, UnboundedSender<AuthEvent>)>,
    failures: HashMap<Table, String>,
    next_handle: u64,
    last_ts: Option<OffsetDateTime>,
}

impl Inner {
    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Wall-clock time, nudged forward so successive writes never tie.
    fn now(&mut self) -> OffsetDateTime {
        let mut ts = OffsetDateTime::now_utc();
        if let Some(last) = self.last_ts
            && ts <= last
        {
            ts = last + Duration::microseconds(1);
        }
        self.last_ts = Some(ts);
        ts
    }

    fn publish(&mut self, event: &ChangeEvent) {
        self.subscribers.retain(|s| !s.tx.is_closed());
        for sub in &self.subscribers {
            if sub.filter.matches(event) {
                let _ = sub.tx.unbounded_send(event.clone());
            }
        }
    }

    fn publish_auth(&mut self, event: &AuthEvent) {
        self.auth_listeners.retain(|(_, tx)| !tx.is_closed());
        for (_, tx) in &self.auth_listeners {
            let _ = tx.unbounded_send(event.clone());
        }
    }
}

/// Shared in-memory store handle.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next insert into `table` fail with `message`.
    pub fn fail_next_insert(&self, table: Table, message: &str) {
        self.lock().failures.insert(table, message.to_owned());
    }

    /// Snapshot of every row currently stored in `table`.
    #[must_use]
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    /// Number of open change-feed subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|s| !s.tx.is_closed());
        inner.subscribers.len()
    }

    /// Username given at sign-up for `email`, if that account exists.
    #[must_use]
    pub fn account_username(&self, email: &str) -> Option<String> {
        self.lock().accounts.get(&account_key(email)).map(|acc| acc.username.clone())
    }

    /// Patch a row as another client would, publishing an update event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when no row has that id.
    pub fn update(&self, table: Table, id: Uuid, patch: Value) -> Result<Value, StoreError> {
        let mut inner = self.lock();
        let key = json!(id);
        let rows = inner.tables.entry(table).or_default();
        let row = rows
            .iter_mut()
            .find(|r| r.get("id") == Some(&key))
            .ok_or_else(|| StoreError::Rejected(format!("no row {id} in {table}")))?;
        let old = row.clone();
        if let (Some(target), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
            for (column, value) in changes {
                target.insert(column.clone(), value.clone());
            }
        }
        let new = row.clone();
        inner.publish(&ChangeEvent { table, kind: ChangeKind::Update, new: new.clone(), old });
        Ok(new)
    }

    /// Remove a row as another client would, publishing a delete event.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Rejected`] when no row has that id.
    pub fn delete(&self, table: Table, id: Uuid) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let key = json!(id);
        let rows = inner.tables.entry(table).or_default();
        let index = rows
            .iter()
            .position(|r| r.get("id") == Some(&key))
            .ok_or_else(|| StoreError::Rejected(format!("no row {id} in {table}")))?;
        let old = rows.remove(index);
        inner.publish(&ChangeEvent { table, kind: ChangeKind::Delete, new: Value::Null, old });
        Ok(())
    }

    fn start_session(inner: &mut Inner, user: AuthUser) -> Session {
        let session = Session::new(user, Uuid::new_v4().to_string());
        inner.session = Some(session.clone());
        inner.publish_auth(&AuthEvent::SignedIn(session.clone()));
        session
    }
}

// =============================================================================
// ROW DEFAULTS
// =============================================================================

/// Columns that must be present on insert, per table.
fn required_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Profiles => &["id", "username"],
        Table::Servers => &["name", "owner_id"],
        Table::ServerMembers => &["server_id", "user_id"],
        Table::Channels => &["server_id", "name"],
        Table::Messages => &["channel_id", "user_id", "content"],
        Table::DirectMessages => &["sender_id", "receiver_id", "content"],
        Table::Friendships => &["user_id", "friend_id"],
    }
}

/// Column defaults, per table.
fn default_columns(table: Table) -> Vec<(&'static str, Value)> {
    match table {
        Table::Profiles => vec![("avatar_url", Value::Null), ("bio", json!("")), ("status", json!("online"))],
        Table::Servers => vec![("description", json!("")), ("icon_url", Value::Null)],
        Table::ServerMembers => vec![("role", json!("member"))],
        Table::Channels => vec![("type", json!("text")), ("position", json!(0))],
        Table::Messages => vec![("attachments", json!([]))],
        Table::DirectMessages => vec![("attachments", json!([])), ("read", json!(false))],
        Table::Friendships => vec![("status", json!("pending"))],
    }
}

/// Timestamp columns stamped at insert time, per table.
fn timestamp_columns(table: Table) -> &'static [&'static str] {
    match table {
        Table::Profiles | Table::Messages | Table::Friendships => &["created_at", "updated_at"],
        Table::ServerMembers => &["joined_at"],
        Table::Servers | Table::Channels | Table::DirectMessages => &["created_at"],
    }
}

fn complete_row(table: Table, mut row: Map<String, Value>, now: OffsetDateTime) -> Result<Value, StoreError> {
    for column in required_columns(table) {
        if row.get(*column).is_none_or(Value::is_null) {
            return Err(StoreError::Rejected(format!(
                "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
            )));
        }
    }
    row.entry("id").or_insert_with(|| json!(Uuid::new_v4()));
    for (column, value) in default_columns(table) {
        row.entry(column).or_insert(value);
    }
    let stamp = now.format(&Rfc3339).map_err(StoreError::decode)?;
    for column in timestamp_columns(table) {
        row.entry(*column).or_insert_with(|| json!(stamp));
    }
    Ok(Value::Object(row))
}

fn password_digest(salt: Uuid, password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn account_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

// =============================================================================
// REMOTE STORE
// =============================================================================

impl RemoteStore for MemoryStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let inner = self.lock();
        Ok(inner.tables.get(&query.table).map(|rows| query.apply(rows)).unwrap_or_default())
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        let mut inner = self.lock();
        if let Some(message) = inner.failures.remove(&table) {
            return Err(StoreError::Rejected(message));
        }
        let Value::Object(map) = row else {
            return Err(StoreError::Rejected("insert payload must be a JSON object".to_owned()));
        };
        let now = inner.now();
        let row = complete_row(table, map, now)?;

        let rows = inner.tables.entry(table).or_default();
        if rows.iter().any(|r| r.get("id") == row.get("id")) {
            return Err(StoreError::Rejected(format!(
                "duplicate key value violates unique constraint \"{table}_pkey\""
            )));
        }
        rows.push(row.clone());
        inner.publish(&ChangeEvent { table, kind: ChangeKind::Insert, new: row.clone(), old: Value::Null });
        Ok(row)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let mut inner = self.lock();
        let user = inner
            .accounts
            .get(&account_key(email))
            .filter(|acc| acc.digest == password_digest(acc.salt, password))
            .map(|acc| acc.user.clone())
            .ok_or_else(|| StoreError::Auth("Invalid login credentials".to_owned()))?;
        Ok(Self::start_session(&mut inner, user))
    }

    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Session, StoreError> {
        let key = account_key(email);
        if !key.contains('@') {
            return Err(StoreError::Auth("Unable to validate email address: invalid format".to_owned()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StoreError::Auth(format!("Password should be at least {MIN_PASSWORD_LEN} characters")));
        }

        let mut inner = self.lock();
        if inner.accounts.contains_key(&key) {
            return Err(StoreError::Auth("User already registered".to_owned()));
        }
        let user = AuthUser { id: Uuid::new_v4(), email: key.clone() };
        let salt = Uuid::new_v4();
        inner
            .accounts
            .insert(key, Account {
                user: user.clone(),
                username: username.to_owned(),
                salt,
                digest: password_digest(salt, password),
            });
        Ok(Self::start_session(&mut inner, user))
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.session = None;
        inner.publish_auth(&AuthEvent::SignedOut);
        Ok(())
    }

    async fn session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.lock().session.clone())
    }

    fn auth_events(&self) -> AuthEvents {
        let (tx, rx) = mpsc::unbounded();
        let id = {
            let mut inner = self.lock();
            let id = inner.next_handle();
            inner.auth_listeners.push((id, tx));
            id
        };
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        AuthEvents::new(rx, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.auth_listeners.retain(|(listener, _)| *listener != id);
            }
        })
    }

    fn subscribe(&self, filter: FeedFilter) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded();
        let id = {
            let mut inner = self.lock();
            let id = inner.next_handle();
            inner.subscribers.push(Subscriber { id, filter: filter.clone(), tx });
            id
        };
        let weak: Weak<Mutex<Inner>> = Arc::downgrade(&self.inner);
        Ok(Subscription::new(filter, rx, move || {
            if let Some(inner) = weak.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                inner.subscribers.retain(|s| s.id != id);
            }
        }))
    }
}
