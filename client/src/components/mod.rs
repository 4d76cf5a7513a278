//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the chat chrome (server rail, channel sidebar, chat
//! pane, dialogs) and read the session, theme and store handle from Leptos
//! context providers.

pub mod auth_form;
pub mod avatar;
pub mod channel_sidebar;
pub mod chat_area;
pub mod create_channel_modal;
pub mod create_server_modal;
pub mod message_input;
pub mod message_list;
pub mod server_list;
pub mod user_panel;
