//! Scope tokens and the slot that owns a view's live feed.
//!
//! DESIGN
//! ======
//! Every view that follows a parent id (user, server, channel) keeps one
//! [`FeedSlot`]. Activating a new parent drops the previous feed handle
//! before anything for the new parent is opened, and mints a fresh
//! [`ScopeToken`]. Snapshot results and feed events carry the token they
//! were started under; list state only accepts them while that token is
//! still the active one, so late arrivals for an old parent are discarded.

#[cfg(test)]
#[path = "feed_test.rs"]
mod feed_test;

use uuid::Uuid;

/// Identifies one activation of a view for one parent id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeToken {
    parent: Uuid,
    generation: u64,
}

impl ScopeToken {
    #[must_use]
    pub fn parent(self) -> Uuid {
        self.parent
    }
}

/// Owner of at most one live feed handle `H`.
#[derive(Debug)]
pub struct FeedSlot<H> {
    generation: u64,
    current: Option<ScopeToken>,
    handle: Option<H>,
}

impl<H> Default for FeedSlot<H> {
    fn default() -> Self {
        Self { generation: 0, current: None, handle: None }
    }
}

impl<H> FeedSlot<H> {
    /// Release the current feed and start a new scope for `parent`.
    pub fn activate(&mut self, parent: Uuid) -> ScopeToken {
        self.handle = None;
        self.generation += 1;
        let token = ScopeToken { parent, generation: self.generation };
        self.current = Some(token);
        token
    }

    /// Store the feed opened for `token`. A handle for a stale token is
    /// dropped immediately and `false` is returned.
    pub fn attach(&mut self, token: ScopeToken, handle: H) -> bool {
        if self.current == Some(token) {
            self.handle = Some(handle);
            true
        } else {
            false
        }
    }

    /// Release the feed and leave no scope active.
    pub fn deactivate(&mut self) {
        self.handle = None;
        self.current = None;
    }

    #[must_use]
    pub fn is_current(&self, token: ScopeToken) -> bool {
        self.current == Some(token)
    }

    #[must_use]
    pub fn current(&self) -> Option<ScopeToken> {
        self.current
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        self.handle.as_mut()
    }
}

/// Orders overlapping full reloads within one scope.
///
/// Each reload takes a number when it is requested. A result is accepted
/// only if no later-numbered result has been applied already.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReloadSeq {
    issued: u64,
    applied: u64,
}

impl ReloadSeq {
    pub fn issue(&mut self) -> u64 {
        self.issued = self.issued.saturating_add(1);
        self.issued
    }

    /// Record `seq` as applied unless a newer reload already landed.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }
}
