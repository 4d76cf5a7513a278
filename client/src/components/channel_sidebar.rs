//! Channel sidebar for the selected server.
//!
//! SYSTEM CONTEXT
//! ==============
//! Follows one server at a time. Any channel change in that server re-reads
//! the list. When no channel is selected the first text channel is picked
//! automatically.

use leptos::prelude::*;
use store::Channel;
use uuid::Uuid;

use crate::components::user_panel::UserPanel;
use crate::net::AppStore;
use crate::services::channels::{channel_feed, load_server_and_channels};
use crate::services::feed::FeedTask;
use crate::state::channels::ChannelListState;
use crate::state::feed::{FeedSlot, ScopeToken};

#[component]
pub fn ChannelSidebar(
    #[prop(into)] server_id: Signal<Option<Uuid>>,
    #[prop(into)] selected: Signal<Option<Uuid>>,
    on_select: Callback<Uuid>,
    on_create: Callback<()>,
) -> impl IntoView {
    let store = expect_context::<AppStore>();
    let channels = RwSignal::new(ChannelListState::default());
    let slot = StoredValue::new(FeedSlot::<FeedTask>::default());

    Effect::new(move || {
        let Some(server_id) = server_id.get() else {
            slot.update_value(FeedSlot::deactivate);
            channels.update(ChannelListState::reset);
            return;
        };
        let Some(token) = slot.try_update_value(|s| s.activate(server_id)) else {
            return;
        };
        channels.update(|c| c.begin(token));
        follow_channels(store.clone(), channels, slot, token);
    });
    on_cleanup(move || {
        slot.try_update_value(FeedSlot::deactivate);
    });

    Effect::new(move || {
        let state = channels.get();
        if let Some(first) = state.default_selection(selected.get_untracked()) {
            on_select.run(first);
        }
    });

    let channel_row = move |channel: Channel| {
        let id = channel.id;
        let glyph = if channel.kind == store::ChannelKind::Voice { "🔊" } else { "#" };
        view! {
            <li>
                <button
                    class=move || {
                        if selected.get() == Some(id) {
                            "channel-sidebar__channel channel-sidebar__channel--active"
                        } else {
                            "channel-sidebar__channel"
                        }
                    }
                    on:click=move |_| on_select.run(id)
                >
                    <span class="channel-sidebar__glyph">{glyph}</span>
                    {channel.name}
                </button>
            </li>
        }
    };

    view! {
        <aside class="channel-sidebar">
            <Show
                when=move || server_id.get().is_some()
                fallback=|| {
                    view! {
                        <div class="channel-sidebar__empty">"Select or create a server to get started."</div>
                    }
                }
            >
                <header class="channel-sidebar__header">
                    <h2>
                        {move || channels.get().server.map(|s| s.name).unwrap_or_default()}
                    </h2>
                </header>
                <Show when=move || channels.get().loading>
                    <p class="channel-sidebar__status">"Loading channels..."</p>
                </Show>
                <Show when=move || channels.get().error.is_some()>
                    <p class="channel-sidebar__error">{move || channels.get().error.unwrap_or_default()}</p>
                </Show>
                <section class="channel-sidebar__group">
                    <div class="channel-sidebar__group-title">
                        <span>"Text Channels"</span>
                        <button
                            class="channel-sidebar__add"
                            title="Create channel"
                            on:click=move |_| on_create.run(())
                        >
                            "+"
                        </button>
                    </div>
                    <ul>
                        {move || channels.get().text_channels().cloned().map(channel_row).collect::<Vec<_>>()}
                    </ul>
                </section>
                <Show when=move || channels.get().voice_channels().next().is_some()>
                    <section class="channel-sidebar__group">
                        <div class="channel-sidebar__group-title">
                            <span>"Voice Channels"</span>
                        </div>
                        <ul>
                            {move || channels.get().voice_channels().cloned().map(channel_row).collect::<Vec<_>>()}
                        </ul>
                    </section>
                </Show>
            </Show>
            <UserPanel/>
        </aside>
    }
}

/// Open the channel feed, then read the list. Every feed event re-reads;
/// only the newest read is kept.
fn follow_channels(
    store: AppStore,
    channels: RwSignal<ChannelListState>,
    slot: StoredValue<FeedSlot<FeedTask>>,
    token: ScopeToken,
) {
    use store::RemoteStore;

    let subscription = store.subscribe(channel_feed(token.parent()));
    let reload = move || {
        let Some(seq) = channels.try_update(ChannelListState::issue_reload) else {
            return;
        };
        let store = store.clone();
        leptos::task::spawn_local(async move {
            let result = load_server_and_channels(&store, token.parent()).await;
            channels.update(|c| {
                c.apply_reload(token, seq, result);
            });
        });
    };

    match subscription {
        Ok(subscription) => {
            let on_change = reload.clone();
            let task = FeedTask::spawn(subscription, move |_event| {
                on_change();
                async {}
            });
            slot.update_value(|s| {
                s.attach(token, task);
            });
        }
        Err(e) => leptos::logging::warn!("channel feed unavailable: {e}"),
    }
    reload();
}
