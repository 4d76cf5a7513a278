//! Shared auth route guards.
//!
//! SYSTEM CONTEXT
//! ==============
//! The dashboard sends signed-out visitors to `/login`; the login page sends
//! signed-in users back to `/`. Both wait for the initial session check.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::SessionState;

#[must_use]
pub fn should_redirect_unauth(state: &SessionState) -> bool {
    !state.loading && state.user.is_none()
}

#[must_use]
pub fn should_leave_login(state: &SessionState) -> bool {
    !state.loading && state.user.is_some()
}

/// Redirect to `/login` whenever the session has loaded and no user is present.
pub fn install_unauth_redirect<F>(session: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session.get()) {
            navigate("/login", NavigateOptions::default());
        }
    });
}

/// Redirect to `/` once a user is signed in.
pub fn install_signed_in_redirect<F>(session: RwSignal<SessionState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_leave_login(&session.get()) {
            navigate("/", NavigateOptions::default());
        }
    });
}
