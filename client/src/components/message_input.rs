//! Message composer for the selected channel.

use leptos::prelude::*;
use uuid::Uuid;

use crate::net::AppStore;
use crate::services::messages::{send_message, validate_message};
use crate::state::session::SessionState;

#[component]
pub fn MessageInput(
    #[prop(into)] channel_id: Signal<Option<Uuid>>,
    #[prop(into)] channel_name: Signal<String>,
) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<AppStore>();
    let draft = RwSignal::new(String::new());
    let sending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    // A draft error belongs to the channel it was typed in.
    Effect::new(move || {
        let _ = channel_id.get();
        error.set(None);
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if sending.get_untracked() {
            return;
        }
        let (Some(channel_id), Some(user_id)) = (channel_id.get_untracked(), session.get_untracked().user_id())
        else {
            return;
        };
        let content = match validate_message(&draft.get_untracked()) {
            Ok(content) => content,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        sending.set(true);
        error.set(None);
        let store = store.clone();
        leptos::task::spawn_local(async move {
            match send_message(&store, channel_id, user_id, &content).await {
                Ok(_) => draft.set(String::new()),
                Err(e) => error.set(Some(e.to_string())),
            }
            sending.set(false);
        });
    };

    view! {
        <form class="message-input" on:submit=on_submit>
            <Show when=move || error.get().is_some()>
                <p class="message-input__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <input
                class="message-input__field"
                type="text"
                placeholder=move || format!("Message #{}", channel_name.get())
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
                disabled=move || sending.get()
            />
            <button class="btn btn--primary" type="submit" disabled=move || sending.get()>
                "Send"
            </button>
        </form>
    }
}
