//! Authenticated chat layout: server rail, channel sidebar, chat pane.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the `/` route. It owns the navigation state (selected server,
//! selected channel, open dialog) and hands each child a derived signal of
//! just the id it follows. Signed-out visitors are sent to `/login`.
//!
//! DESIGN
//! ======
//! Selection is cleared whenever the signed-in user changes so no ids from a
//! previous account leak into the next one.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use uuid::Uuid;

use crate::components::channel_sidebar::ChannelSidebar;
use crate::components::chat_area::ChatArea;
use crate::components::create_channel_modal::CreateChannelModal;
use crate::components::create_server_modal::CreateServerModal;
use crate::components::server_list::ServerList;
use crate::state::nav::{Modal, NavState};
use crate::state::session::SessionState;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    install_unauth_redirect(session, use_navigate());

    let nav = RwSignal::new(NavState::default());
    let user_id = Memo::new(move |_| session.get().user_id());
    Effect::new(move |prev: Option<Option<Uuid>>| {
        let current = user_id.get();
        if prev.is_some_and(|p| p != current) {
            nav.update(NavState::reset);
        }
        current
    });

    let server_id = Memo::new(move |_| nav.get().selected_server);
    let channel_id = Memo::new(move |_| nav.get().selected_channel);
    let modal = Memo::new(move |_| nav.get().modal);

    let on_select_server = Callback::new(move |id: Uuid| nav.update(|n| n.select_server(id)));
    let on_select_channel = Callback::new(move |id: Uuid| nav.update(|n| n.select_channel(id)));
    let on_create_server = Callback::new(move |()| nav.update(NavState::open_create_server));
    let on_create_channel = Callback::new(move |()| {
        nav.update(|n| {
            n.open_create_channel();
        });
    });
    let on_close = Callback::new(move |()| nav.update(NavState::close_modal));
    let on_server_created = Callback::new(move |id: Uuid| nav.update(|n| n.server_created(id)));

    view! {
        <Show
            when=move || { let s = session.get(); !s.loading && s.user.is_some() }
            fallback=move || {
                view! {
                    <div class="dashboard-page dashboard-page--pending">
                        <p>{move || if session.get().loading { "Loading..." } else { "Redirecting to login..." }}</p>
                    </div>
                }
            }
        >
            <Show when=move || session.get().notice.is_some()>
                <div class="dashboard-notice" role="alert">
                    <span>{move || session.get().notice.unwrap_or_default()}</span>
                    <button class="btn--link" on:click=move |_| session.update(SessionState::dismiss_notice)>
                        "Dismiss"
                    </button>
                </div>
            </Show>
            <div class="dashboard-page">
                <ServerList selected=server_id on_select=on_select_server on_create=on_create_server/>
                <ChannelSidebar
                    server_id=server_id
                    selected=channel_id
                    on_select=on_select_channel
                    on_create=on_create_channel
                />
                <ChatArea channel_id=channel_id/>
            </div>
            <Show when=move || modal.get() == Some(Modal::CreateServer)>
                <CreateServerModal on_close=on_close on_created=on_server_created/>
            </Show>
            {move || match (modal.get(), server_id.get()) {
                (Some(Modal::CreateChannel), Some(id)) => {
                    view! { <CreateChannelModal server_id=id on_close=on_close/> }.into_any()
                }
                _ => ().into_any(),
            }}
        </Show>
    }
}
