//! Main pane for the selected channel: header, message list, composer.

use leptos::prelude::*;
use store::Channel;
use uuid::Uuid;

use crate::components::message_input::MessageInput;
use crate::components::message_list::MessageList;
use crate::net::AppStore;
use crate::services::channels::load_channel;

#[component]
pub fn ChatArea(#[prop(into)] channel_id: Signal<Option<Uuid>>) -> impl IntoView {
    let store = expect_context::<AppStore>();
    let channel = RwSignal::new(None::<Channel>);

    Effect::new(move || {
        channel.set(None);
        let Some(id) = channel_id.get() else {
            return;
        };
        let store = store.clone();
        leptos::task::spawn_local(async move {
            match load_channel(&store, id).await {
                Ok(found) if channel_id.get_untracked() == Some(id) => channel.set(found),
                Ok(_) => {}
                Err(e) => leptos::logging::warn!("channel header load failed: {e}"),
            }
        });
    });

    let channel_name = Signal::derive(move || channel.get().map(|c| c.name).unwrap_or_default());

    view! {
        <main class="chat-area">
            <Show
                when=move || channel_id.get().is_some()
                fallback=|| {
                    view! {
                        <div class="chat-area__empty">
                            <h2>"No channel selected"</h2>
                            <p>"Pick a channel from the sidebar to start chatting."</p>
                        </div>
                    }
                }
            >
                <header class="chat-area__header">
                    <span class="chat-area__hash">"#"</span>
                    <h2>{move || channel_name.get()}</h2>
                </header>
                <MessageList channel_id=channel_id/>
                <MessageInput channel_id=channel_id channel_name=channel_name/>
            </Show>
        </main>
    }
}
