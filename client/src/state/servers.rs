//! Server list for the signed-in user.
//!
//! DESIGN
//! ======
//! Membership changes and edits to a listed server (rename, icon, delete)
//! trigger a full reload rather than incremental patches. Reloads may
//! overlap; each carries a [`ReloadSeq`] number and only the newest result
//! sticks.

#[cfg(test)]
#[path = "servers_test.rs"]
mod servers_test;

use store::{ChangeEvent, Server, StoreError};
use uuid::Uuid;

use super::feed::{ReloadSeq, ScopeToken};

#[derive(Clone, Debug, Default)]
pub struct ServerListState {
    pub items: Vec<Server>,
    pub loading: bool,
    pub error: Option<String>,
    active: Option<ScopeToken>,
    reloads: ReloadSeq,
}

impl ServerListState {
    /// Start showing the list for a new scope.
    pub fn begin(&mut self, token: ScopeToken) {
        self.items.clear();
        self.loading = true;
        self.error = None;
        self.active = Some(token);
        self.reloads = ReloadSeq::default();
    }

    /// Number the next reload request.
    pub fn issue_reload(&mut self) -> u64 {
        self.reloads.issue()
    }

    /// Apply reload `seq` unless the scope changed or a newer reload landed.
    pub fn apply_reload(&mut self, token: ScopeToken, seq: u64, result: Result<Vec<Server>, StoreError>) -> bool {
        if self.active != Some(token) || !self.reloads.accept(seq) {
            return false;
        }
        self.apply_snapshot(token, result)
    }

    /// No user; nothing to show.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace the list with a fresh read. Ignored for stale scopes.
    pub fn apply_snapshot(&mut self, token: ScopeToken, result: Result<Vec<Server>, StoreError>) -> bool {
        if self.active != Some(token) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    #[must_use]
    pub fn contains(&self, server_id: Uuid) -> bool {
        self.items.iter().any(|s| s.id == server_id)
    }

    /// Whether a `servers` table change touches a server on the rail.
    #[must_use]
    pub fn affected_by(&self, event: &ChangeEvent) -> bool {
        [&event.new, &event.old]
            .into_iter()
            .filter_map(|row| row.get("id").and_then(|v| serde_json::from_value::<Uuid>(v.clone()).ok()))
            .any(|id| self.contains(id))
    }
}
