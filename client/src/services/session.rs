//! Session restore, sign-in, sign-up and sign-out.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use store::{AuthUser, NewProfile, PresenceStatus, Profile, Query, RemoteStore, StoreError, Table};
use uuid::Uuid;

use crate::state::session::SessionState;

const MIN_PASSWORD_LEN: usize = 6;
const MAX_USERNAME_LEN: usize = 32;

/// Validated sign-up input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub username: String,
}

/// Check sign-in fields. Returns the trimmed email.
///
/// # Errors
///
/// Returns a user-facing message for the first invalid field.
pub fn validate_sign_in(email: &str, password: &str) -> Result<String, &'static str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if password.is_empty() {
        return Err("Enter your password.");
    }
    Ok(email.to_owned())
}

/// Check sign-up fields.
///
/// # Errors
///
/// Returns a user-facing message for the first invalid field.
pub fn validate_sign_up(email: &str, password: &str, username: &str) -> Result<SignUpInput, &'static str> {
    let email = validate_sign_in(email, password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    let username = username.trim();
    if username.is_empty() {
        return Err("Choose a username.");
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err("Username must be 32 characters or fewer.");
    }
    Ok(SignUpInput { email, password: password.to_owned(), username: username.to_owned() })
}

/// Resolve the persisted session. A failed check counts as signed out.
pub async fn restore<S: RemoteStore>(store: &S) -> SessionState {
    let user = store.session().await.ok().flatten().map(|s| s.user);
    SessionState::resolved(user)
}

/// # Errors
///
/// Returns the store's auth error (e.g. `Invalid login credentials`).
pub async fn sign_in<S: RemoteStore>(store: &S, email: &str, password: &str) -> Result<AuthUser, StoreError> {
    Ok(store.sign_in_with_password(email, password).await?.user)
}

/// Sign-up failure. When `account` is set the auth account was created and
/// is already signed in (the store announced it), but its profile row was
/// not written.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct SignUpError {
    pub account: Option<AuthUser>,
    #[source]
    pub source: StoreError,
}

impl SignUpError {
    /// Text shown after the auth transition has already left the form.
    #[must_use]
    pub fn incomplete_notice(&self) -> String {
        format!("Your account was created, but your profile could not be saved: {}", self.source)
    }
}

/// Create the account, then its profile row.
///
/// # Errors
///
/// Returns [`SignUpError`]; `account` tells whether the user ended up
/// signed in without a profile.
pub async fn sign_up<S: RemoteStore>(store: &S, input: &SignUpInput) -> Result<AuthUser, SignUpError> {
    let session = store
        .sign_up(&input.email, &input.password, &input.username)
        .await
        .map_err(|source| SignUpError { account: None, source })?;
    store
        .insert_row(&NewProfile {
            id: session.user.id,
            username: input.username.clone(),
            status: PresenceStatus::Online,
        })
        .await
        .map_err(|source| SignUpError { account: Some(session.user.clone()), source })?;
    Ok(session.user)
}

/// # Errors
///
/// Returns the store's error when the backend rejects the sign-out.
pub async fn sign_out<S: RemoteStore>(store: &S) -> Result<(), StoreError> {
    store.sign_out().await
}

/// The signed-in user's profile row, if present.
///
/// # Errors
///
/// Returns the store's read error.
pub async fn load_profile<S: RemoteStore>(store: &S, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
    store.fetch_optional(&Query::from(Table::Profiles).eq("id", user_id)).await
}
