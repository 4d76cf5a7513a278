//! Dashboard navigation: selected server, selected channel, open modal.
//!
//! DESIGN
//! ======
//! Owned by the dashboard page and passed to children as derived signals.
//! Selecting a server always clears the channel so the sidebar can pick the
//! new server's default.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use uuid::Uuid;

/// Which creation dialog is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modal {
    CreateServer,
    CreateChannel,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavState {
    pub selected_server: Option<Uuid>,
    pub selected_channel: Option<Uuid>,
    pub modal: Option<Modal>,
}

impl NavState {
    pub fn select_server(&mut self, server_id: Uuid) {
        self.selected_server = Some(server_id);
        self.selected_channel = None;
    }

    pub fn select_channel(&mut self, channel_id: Uuid) {
        self.selected_channel = Some(channel_id);
    }

    pub fn open_create_server(&mut self) {
        self.modal = Some(Modal::CreateServer);
    }

    /// Channels can only be created inside a selected server.
    pub fn open_create_channel(&mut self) -> bool {
        if self.selected_server.is_none() {
            return false;
        }
        self.modal = Some(Modal::CreateChannel);
        true
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    /// A server was created: close the dialog and navigate into it.
    pub fn server_created(&mut self, server_id: Uuid) {
        self.modal = None;
        self.select_server(server_id);
    }

    /// The signed-in user changed; nothing selected survives.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
