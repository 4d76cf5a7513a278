//! Channel sidebar state for the selected server.

#[cfg(test)]
#[path = "channels_test.rs"]
mod channels_test;

use store::{Channel, ChannelKind, Server, StoreError};
use uuid::Uuid;

use super::feed::{ReloadSeq, ScopeToken};

#[derive(Clone, Debug, Default)]
pub struct ChannelListState {
    pub server: Option<Server>,
    pub items: Vec<Channel>,
    pub loading: bool,
    pub error: Option<String>,
    active: Option<ScopeToken>,
    reloads: ReloadSeq,
}

impl ChannelListState {
    pub fn begin(&mut self, token: ScopeToken) {
        self.server = None;
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
    pub fn apply_reload(
        &mut self,
        token: ScopeToken,
        seq: u64,
        result: Result<(Option<Server>, Vec<Channel>), StoreError>,
    ) -> bool {
        if self.active != Some(token) || !self.reloads.accept(seq) {
            return false;
        }
        self.apply_snapshot(token, result)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace server header and channels. Ignored unless `token` is active
    /// and the rows belong to its server.
    pub fn apply_snapshot(
        &mut self,
        token: ScopeToken,
        result: Result<(Option<Server>, Vec<Channel>), StoreError>,
    ) -> bool {
        if self.active != Some(token) {
            return false;
        }
        self.loading = false;
        match result {
            Ok((server, channels)) => {
                self.server = server.filter(|s| s.id == token.parent());
                self.items = channels.into_iter().filter(|c| c.server_id == token.parent()).collect();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        true
    }

    pub fn text_channels(&self) -> impl Iterator<Item = &Channel> {
        self.items.iter().filter(|c| c.kind == ChannelKind::Text)
    }

    pub fn voice_channels(&self) -> impl Iterator<Item = &Channel> {
        self.items.iter().filter(|c| c.kind == ChannelKind::Voice)
    }

    /// Channel to select when none is: the first text channel, else the
    /// first channel of any kind.
    #[must_use]
    pub fn default_selection(&self, selected: Option<Uuid>) -> Option<Uuid> {
        if selected.is_some() {
            return None;
        }
        self.text_channels().next().or_else(|| self.items.first()).map(|c| c.id)
    }
}
