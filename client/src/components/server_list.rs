//! Vertical rail of the user's servers plus the create-server button.
//!
//! SYSTEM CONTEXT
//! ==============
//! Scoped to the signed-in user. Two feeds re-read the list: the user's
//! membership rows, and edits to any listed server (rename, icon, delete).
//! Both are released when the user changes or the rail unmounts.

#[cfg(test)]
#[path = "server_list_test.rs"]
mod server_list_test;

use leptos::prelude::*;
use store::Server;
use uuid::Uuid;

use crate::components::avatar::Avatar;
use crate::net::AppStore;
use crate::services::feed::FeedTask;
use crate::services::servers::{load_servers, membership_feed, server_feed};
use crate::state::feed::{FeedSlot, ScopeToken};
use crate::state::servers::ServerListState;
use crate::state::session::SessionState;

#[component]
pub fn ServerList(
    #[prop(into)] selected: Signal<Option<Uuid>>,
    on_select: Callback<Uuid>,
    on_create: Callback<()>,
) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<AppStore>();
    let servers = RwSignal::new(ServerListState::default());
    let slot = StoredValue::new(FeedSlot::<Vec<FeedTask>>::default());
    let user_id = Memo::new(move |_| session.get().user_id());

    Effect::new(move || {
        let Some(user_id) = user_id.get() else {
            slot.update_value(FeedSlot::deactivate);
            servers.update(ServerListState::reset);
            return;
        };
        let Some(token) = slot.try_update_value(|s| s.activate(user_id)) else {
            return;
        };
        servers.update(|s| s.begin(token));
        follow_servers(store.clone(), servers, slot, token);
    });
    on_cleanup(move || {
        slot.try_update_value(FeedSlot::deactivate);
    });

    view! {
        <nav class="server-list" aria-label="Servers">
            {move || {
                servers
                    .get()
                    .items
                    .into_iter()
                    .map(|server| {
                        let entry = RailEntry::from_server(server);
                        let id = entry.id;
                        let title = entry.name.clone();
                        view! {
                            <button
                                class=move || {
                                    if selected.get() == Some(id) {
                                        "server-list__item server-list__item--active"
                                    } else {
                                        "server-list__item"
                                    }
                                }
                                title=title
                                on:click=move |_| on_select.run(id)
                            >
                                <Avatar name=entry.name image_url=entry.icon_url/>
                            </button>
                        }
                    })
                    .collect::<Vec<_>>()
            }}
            <Show when=move || servers.get().error.is_some()>
                <span class="server-list__error" title=move || servers.get().error.unwrap_or_default()>
                    "!"
                </span>
            </Show>
            <button
                class="server-list__item server-list__item--create"
                title="Create a server"
                on:click=move |_| on_create.run(())
            >
                "+"
            </button>
        </nav>
    }
}

/// What one rail button shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RailEntry {
    pub id: Uuid,
    pub name: String,
    /// Blank when the server has no icon; the avatar then shows an initial.
    pub icon_url: String,
}

impl RailEntry {
    pub(crate) fn from_server(server: Server) -> Self {
        Self { id: server.id, name: server.name, icon_url: server.icon_url.unwrap_or_default() }
    }
}

/// Open the membership and server feeds, then read the list. Relevant feed
/// events re-read; only the newest read is kept.
fn follow_servers(
    store: AppStore,
    servers: RwSignal<ServerListState>,
    slot: StoredValue<FeedSlot<Vec<FeedTask>>>,
    token: ScopeToken,
) {
    use store::RemoteStore;

    let reload_store = store.clone();
    let reload = move || {
        let Some(seq) = servers.try_update(ServerListState::issue_reload) else {
            return;
        };
        let store = reload_store.clone();
        leptos::task::spawn_local(async move {
            let result = load_servers(&store, token.parent()).await;
            servers.update(|s| {
                s.apply_reload(token, seq, result);
            });
        });
    };

    let mut tasks = Vec::with_capacity(2);
    match store.subscribe(membership_feed(token.parent())) {
        Ok(subscription) => {
            let on_change = reload.clone();
            tasks.push(FeedTask::spawn(subscription, move |_event| {
                on_change();
                async {}
            }));
        }
        Err(e) => leptos::logging::warn!("membership feed unavailable: {e}"),
    }
    match store.subscribe(server_feed()) {
        Ok(subscription) => {
            let on_change = reload.clone();
            tasks.push(FeedTask::spawn(subscription, move |event| {
                if servers.try_with_untracked(|s| s.affected_by(&event)).unwrap_or(false) {
                    on_change();
                }
                async {}
            }));
        }
        Err(e) => leptos::logging::warn!("server feed unavailable: {e}"),
    }
    slot.update_value(|s| {
        s.attach(token, tasks);
    });
    reload();
}
