//! Browser implementation of [`RemoteStore`] against the hosted backend.
//!
//! Client-side (hydrate): table reads/writes over the PostgREST surface,
//! password auth over the auth surface, change feeds over realtime sockets.
//! Server-side (SSR): calls return [`StoreError::Unavailable`] since these
//! endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Non-success responses are reduced to the backend's own message text
//! (`msg`, `message`, `error_description` or `error`) so forms can show it
//! verbatim. A failed token refresh ends the session rather than erroring,
//! so callers see a signed-out user instead of repeated expiry failures.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "rest_test.rs"]
mod rest_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::mpsc::{self, UnboundedSender};
use serde_json::Value;
use store::{AuthEvent, AuthEvents, FeedFilter, Query, RemoteStore, Session, StoreError, Subscription, Table};
#[cfg(any(test, feature = "hydrate"))]
use time::Duration;
use time::OffsetDateTime;

use crate::config::StoreConfig;

/// `localStorage` key holding the serialized session.
#[cfg(feature = "hydrate")]
const SESSION_KEY: &str = "parley_session";

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> StoreError {
    StoreError::Unavailable("not available on server".to_owned())
}

/// Pull the human-readable message out of an error body.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_owned))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"))
}

/// Decode a token grant / sign-up response into a session.
///
/// Sign-up without auto-confirm returns a bare user and no token; that is
/// surfaced as an auth error since there is no session to continue with.
/// Expiry comes from `expires_at` (unix seconds), else `now + expires_in`.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn parse_session(body: &Value, now: OffsetDateTime) -> Result<Session, StoreError> {
    let Some(token) = body.get("access_token").and_then(Value::as_str) else {
        return Err(StoreError::Auth("Check your email to confirm your account".to_owned()));
    };
    let user = body.get("user").cloned().ok_or_else(|| StoreError::decode("missing user"))?;
    let expires_at = match body.get("expires_at").and_then(Value::as_i64) {
        Some(at) => OffsetDateTime::from_unix_timestamp(at).ok(),
        None => body.get("expires_in").and_then(Value::as_i64).map(|secs| now + Duration::seconds(secs)),
    };
    Ok(Session {
        refresh_token: body.get("refresh_token").and_then(Value::as_str).map(str::to_owned),
        expires_at,
        ..Session::new(serde_json::from_value(user)?, token.to_owned())
    })
}

/// What to do with a stored session before using it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SessionCheck {
    Valid,
    /// Expired or about to; exchange this refresh token.
    Refresh(String),
    /// Expired with no way to refresh; drop it.
    Expired,
}

#[cfg_attr(not(any(test, feature = "hydrate")), allow(dead_code))]
pub(crate) fn check_session(session: &Session, now: OffsetDateTime) -> SessionCheck {
    if !session.needs_refresh(now) {
        return SessionCheck::Valid;
    }
    session.refresh_token.clone().map_or(SessionCheck::Expired, SessionCheck::Refresh)
}

/// Representation-returning inserts answer with a one-element array.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn first_row(body: Value) -> Result<Value, StoreError> {
    match body {
        Value::Array(rows) => rows.into_iter().next().ok_or_else(|| StoreError::decode("empty insert response")),
        Value::Object(_) => Ok(body),
        other => Err(StoreError::decode(format!("expected row, got {other}"))),
    }
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn sign_up_body(email: &str, password: &str, username: &str) -> Value {
    serde_json::json!({
        "email": email,
        "password": password,
        "data": { "username": username },
    })
}

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    senders: Mutex<Vec<(u64, UnboundedSender<AuthEvent>)>>,
}

/// Handle to the hosted backend. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct RestStore {
    config: StoreConfig,
    session: Arc<Mutex<Option<Session>>>,
    listeners: Arc<Listeners>,
}

impl RestStore {
    #[must_use]
    pub fn new(config: StoreConfig) -> Self {
        Self { config, session: Arc::new(Mutex::new(None)), listeners: Arc::new(Listeners::default()) }
    }

    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Bearer token: the signed-in user's access token, else the anon key.
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    fn bearer(&self) -> String {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or_else(|| self.config.anon_key.clone(), |s| s.access_token.clone())
    }

    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    fn set_session(&self, session: Option<Session>) {
        #[cfg(feature = "hydrate")]
        persist_session(session.as_ref());
        let event = session.clone().map_or(AuthEvent::SignedOut, AuthEvent::SignedIn);
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
        let mut senders = self.listeners.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|(_, tx)| tx.unbounded_send(event.clone()).is_ok());
    }

    #[cfg(feature = "hydrate")]
    async fn authorized(&self, builder: gloo_net::http::RequestBuilder) -> gloo_net::http::RequestBuilder {
        let bearer = self.request_bearer().await;
        builder.header("apikey", &self.config.anon_key).header("Authorization", &format!("Bearer {bearer}"))
    }

    #[cfg(feature = "hydrate")]
    async fn auth_request(&self, url: &str, body: &Value) -> Result<Session, StoreError> {
        let resp = gloo_net::http::Request::post(url)
            .header("apikey", &self.config.anon_key)
            .json(body)
            .map_err(|e| StoreError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| StoreError::Request(e.to_string()))?;
        if !resp.ok() {
            return Err(StoreError::Auth(error_message(status, &text)));
        }
        let body: Value = serde_json::from_str(&text)?;
        parse_session(&body, now())
    }

    /// Exchange a refresh token. Any failure ends the local session.
    #[cfg(feature = "hydrate")]
    async fn refresh(&self, refresh_token: &str) -> Option<Session> {
        let url = self.config.auth_url("token?grant_type=refresh_token");
        let body = serde_json::json!({ "refresh_token": refresh_token });
        match self.auth_request(&url, &body).await {
            Ok(session) => {
                self.set_session(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                leptos::logging::warn!("session refresh failed: {e}");
                self.set_session(None);
                None
            }
        }
    }

    /// The current session, refreshed first when its token is due.
    #[cfg(feature = "hydrate")]
    async fn live_session(&self) -> Option<Session> {
        let cached = self.session.lock().unwrap_or_else(PoisonError::into_inner).clone();
        let session = match cached {
            Some(session) => session,
            None => {
                let restored = load_persisted_session()?;
                self.session.lock().unwrap_or_else(PoisonError::into_inner).replace(restored.clone());
                restored
            }
        };
        match check_session(&session, now()) {
            SessionCheck::Valid => Some(session),
            SessionCheck::Refresh(token) => self.refresh(&token).await,
            SessionCheck::Expired => {
                self.set_session(None);
                None
            }
        }
    }

    /// Bearer for a request: a live access token, else the anon key.
    #[cfg(feature = "hydrate")]
    async fn request_bearer(&self) -> String {
        self.live_session().await.map_or_else(|| self.config.anon_key.clone(), |s| s.access_token)
    }
}

#[cfg(feature = "hydrate")]
fn now() -> OffsetDateTime {
    #[allow(clippy::cast_possible_truncation)]
    let secs = (js_sys::Date::now() / 1000.0) as i64;
    OffsetDateTime::from_unix_timestamp(secs).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

#[cfg(feature = "hydrate")]
fn persist_session(session: Option<&Session>) {
    let Some(storage) = storage() else {
        return;
    };
    match session.map(serde_json::to_string) {
        Some(Ok(raw)) => {
            let _ = storage.set_item(SESSION_KEY, &raw);
        }
        Some(Err(e)) => leptos::logging::warn!("session not persisted: {e}"),
        None => {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}

#[cfg(feature = "hydrate")]
fn load_persisted_session() -> Option<Session> {
    let raw = storage()?.get_item(SESSION_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

#[cfg(feature = "hydrate")]
async fn read_response(resp: gloo_net::http::Response) -> Result<Value, StoreError> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| StoreError::Request(e.to_string()))?;
    if !resp.ok() {
        return Err(StoreError::Response { status, message: error_message(status, &text) });
    }
    Ok(serde_json::from_str(&text)?)
}

impl RemoteStore for RestStore {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let params = query.to_params();
            let resp = self
                .authorized(gloo_net::http::Request::get(&self.config.rest_url(query.table)))
                .await
                .query(params.iter().map(|(k, v)| (k.as_str(), v)))
                .send()
                .await
                .map_err(|e| StoreError::Request(e.to_string()))?;
            match read_response(resp).await? {
                Value::Array(rows) => Ok(rows),
                other => Err(StoreError::decode(format!("expected rows, got {other}"))),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = query;
            Err(unavailable())
        }
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let resp = self
                .authorized(gloo_net::http::Request::post(&self.config.rest_url(table)))
                .await
                .header("Prefer", "return=representation")
                .json(&row)
                .map_err(|e| StoreError::Request(e.to_string()))?
                .send()
                .await
                .map_err(|e| StoreError::Request(e.to_string()))?;
            first_row(read_response(resp).await?)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (table, row);
            Err(unavailable())
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.auth_url("token?grant_type=password");
            let body = serde_json::json!({ "email": email, "password": password });
            let session = self.auth_request(&url, &body).await?;
            self.set_session(Some(session.clone()));
            Ok(session)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(unavailable())
        }
    }

    async fn sign_up(&self, email: &str, password: &str, username: &str) -> Result<Session, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.auth_url("signup");
            let session = self.auth_request(&url, &sign_up_body(email, password, username)).await?;
            self.set_session(Some(session.clone()));
            Ok(session)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password, username);
            Err(unavailable())
        }
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            let result = self
                .authorized(gloo_net::http::Request::post(&self.config.auth_url("logout")))
                .await
                .send()
                .await;
            // The local session ends even when the revoke call fails.
            self.set_session(None);
            let resp = result.map_err(|e| StoreError::Request(e.to_string()))?;
            if !resp.ok() {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                return Err(StoreError::Auth(error_message(status, &text)));
            }
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Err(unavailable())
        }
    }

    async fn session(&self) -> Result<Option<Session>, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            Ok(self.live_session().await)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            Ok(self.session.lock().unwrap_or_else(PoisonError::into_inner).clone())
        }
    }

    fn auth_events(&self) -> AuthEvents {
        let (tx, rx) = mpsc::unbounded();
        let id = self.listeners.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.senders.lock().unwrap_or_else(PoisonError::into_inner).push((id, tx));
        let weak = Arc::downgrade(&self.listeners);
        AuthEvents::new(rx, move || {
            if let Some(listeners) = weak.upgrade() {
                let mut senders = listeners.senders.lock().unwrap_or_else(PoisonError::into_inner);
                senders.retain(|(listener, _)| *listener != id);
            }
        })
    }

    fn subscribe(&self, filter: FeedFilter) -> Result<Subscription, StoreError> {
        #[cfg(feature = "hydrate")]
        {
            super::realtime::open(&self.config, self.bearer(), filter)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = filter;
            Err(unavailable())
        }
    }
}
