//! Scrolling message history for one channel with live inserts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The insert feed is opened before the history read. Each live insert
//! resolves its author with a point lookup before it is merged; inserts
//! whose author cannot be found are dropped. Switching channels releases the
//! previous feed and bumps the scope, so lookups still in flight for the old
//! channel cannot land in the new list.

use leptos::prelude::*;
use uuid::Uuid;

use crate::components::avatar::Avatar;
use crate::net::AppStore;
use crate::services::feed::FeedTask;
use crate::services::messages::{load_messages, message_feed, resolve_incoming};
use crate::state::feed::{FeedSlot, ScopeToken};
use crate::state::messages::{MessageListState, MessageView};
use crate::util::time_fmt::format_local;

#[component]
pub fn MessageList(#[prop(into)] channel_id: Signal<Option<Uuid>>) -> impl IntoView {
    let store = expect_context::<AppStore>();
    let messages = RwSignal::new(MessageListState::default());
    let slot = StoredValue::new(FeedSlot::<FeedTask>::default());
    let list_ref = NodeRef::<leptos::html::Div>::new();

    Effect::new(move || {
        let Some(channel_id) = channel_id.get() else {
            slot.update_value(FeedSlot::deactivate);
            messages.update(MessageListState::reset);
            return;
        };
        let Some(token) = slot.try_update_value(|s| s.activate(channel_id)) else {
            return;
        };
        messages.update(|m| m.begin(token));
        follow_messages(store.clone(), messages, slot, token);
    });
    on_cleanup(move || {
        slot.try_update_value(FeedSlot::deactivate);
    });

    // Keep the newest message in view.
    Effect::new(move || {
        let _ = messages.with(|m| m.scroll_seq);
        #[cfg(feature = "hydrate")]
        {
            if let Some(el) = list_ref.get() {
                el.set_scroll_top(el.scroll_height());
            }
        }
    });

    view! {
        <div class="message-list" node_ref=list_ref>
            <Show when=move || messages.get().loading>
                <p class="message-list__status">"Loading messages..."</p>
            </Show>
            <Show when=move || messages.get().error.is_some()>
                <p class="message-list__error">{move || messages.get().error.unwrap_or_default()}</p>
            </Show>
            <Show when=move || {
                let state = messages.get();
                !state.loading && state.error.is_none() && state.items.is_empty()
            }>
                <p class="message-list__status">"No messages yet. Say hello!"</p>
            </Show>
            {move || messages.get().items.into_iter().map(message_row).collect::<Vec<_>>()}
        </div>
    }
}

fn message_row(message: MessageView) -> impl IntoView {
    let time = format_local(message.created_at);
    let author = message.author.username;
    let avatar_name = author.clone();
    let avatar_url = message.author.avatar_url.unwrap_or_default();
    view! {
        <article class="message">
            <Avatar name=avatar_name image_url=avatar_url/>
            <div class="message__body">
                <header class="message__meta">
                    <span class="message__author">{author}</span>
                    <time class="message__time">{time}</time>
                </header>
                <p class="message__content">{message.content}</p>
            </div>
        </article>
    }
}

/// Open the insert feed, then read history and merge both.
fn follow_messages(
    store: AppStore,
    messages: RwSignal<MessageListState>,
    slot: StoredValue<FeedSlot<FeedTask>>,
    token: ScopeToken,
) {
    use store::RemoteStore;

    match store.subscribe(message_feed(token.parent())) {
        Ok(subscription) => {
            let feed_store = store.clone();
            let task = FeedTask::spawn(subscription, move |event| {
                let store = feed_store.clone();
                async move {
                    match resolve_incoming(&store, &event).await {
                        Ok(Some(view)) => messages.update(|m| {
                            m.apply_insert(token, view);
                        }),
                        Ok(None) => {}
                        Err(e) => leptos::logging::warn!("message event dropped: {e}"),
                    }
                }
            });
            slot.update_value(|s| {
                s.attach(token, task);
            });
        }
        Err(e) => leptos::logging::warn!("message feed unavailable: {e}"),
    }

    leptos::task::spawn_local(async move {
        let result = load_messages(&store, token.parent()).await;
        messages.update(|m| {
            m.apply_snapshot(token, result);
        });
    });
}
