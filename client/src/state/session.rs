//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provided as an `RwSignal<SessionState>` context by the app root. Route
//! guards read `loading`/`user` to decide redirects; identity-dependent views
//! read `user` to scope their queries.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use store::{AuthEvent, AuthUser};
use uuid::Uuid;

/// Current identity and whether the initial session check is still pending.
///
/// `notice` carries a message that must outlive the page that raised it,
/// e.g. a sign-up whose profile write failed after the redirect away from
/// the form. It is cleared when the identity changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub loading: bool,
    pub notice: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { user: None, loading: true, notice: None }
    }
}

impl SessionState {
    /// State after the initial session check completed.
    #[must_use]
    pub fn resolved(user: Option<AuthUser>) -> Self {
        Self { user, loading: false, notice: None }
    }

    /// Follow an auth transition pushed by the store.
    pub fn apply(&mut self, event: &AuthEvent) {
        let user = event.user().cloned();
        if user.as_ref().map(|u| u.id) != self.user_id() {
            self.notice = None;
        }
        self.user = user;
        self.loading = false;
    }

    /// Signed in as `user`, with a problem the user still has to see.
    pub fn signed_in_with_notice(&mut self, user: AuthUser, notice: String) {
        self.user = Some(user);
        self.loading = false;
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    /// Short label for the signed-in user: the email's local part.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|u| u.email.split('@').next().unwrap_or_default().to_owned())
    }
}
