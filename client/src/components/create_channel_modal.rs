//! Modal dialog for creating a channel in the selected server.

use leptos::prelude::*;
use store::ChannelKind;
use uuid::Uuid;

use crate::net::AppStore;
use crate::services::channels::{create_channel, normalize_channel_name, validate_channel_name};

#[component]
pub fn CreateChannelModal(server_id: Uuid, on_close: Callback<()>) -> impl IntoView {
    let store = expect_context::<AppStore>();
    let name = RwSignal::new(String::new());
    let kind = RwSignal::new(ChannelKind::Text);
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let channel_name = match validate_channel_name(&name.get_untracked()) {
            Ok(channel_name) => channel_name,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        pending.set(true);
        error.set(None);
        let store = store.clone();
        let channel_kind = kind.get_untracked();
        leptos::task::spawn_local(async move {
            match create_channel(&store, server_id, &channel_name, channel_kind).await {
                // Unmounts the dialog; its signals are disposed after this call.
                Ok(_) => on_close.run(()),
                Err(e) => {
                    error.set(Some(e.to_string()));
                    pending.set(false);
                }
            }
        });
    };

    let kind_option = move |value: ChannelKind, label: &'static str| {
        view! {
            <label class="dialog__radio">
                <input
                    type="radio"
                    name="channel-kind"
                    prop:checked=move || kind.get() == value
                    on:change=move |_| kind.set(value)
                />
                {label}
            </label>
        }
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Create a channel"</h2>
                <form class="dialog__form" on:submit=on_submit>
                    <fieldset class="dialog__fieldset">
                        <legend>"Channel type"</legend>
                        {kind_option(ChannelKind::Text, "Text")}
                        {kind_option(ChannelKind::Voice, "Voice")}
                    </fieldset>
                    <label class="dialog__label">
                        "Channel name"
                        <input
                            class="dialog__input"
                            type="text"
                            maxlength="100"
                            placeholder="new-channel"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>
                    <Show when=move || !name.get().trim().is_empty()>
                        <p class="dialog__hint">"Will be created as #" {move || normalize_channel_name(&name.get())}</p>
                    </Show>
                    <Show when=move || error.get().is_some()>
                        <p class="dialog__error">{move || error.get().unwrap_or_default()}</p>
                    </Show>
                    <div class="dialog__actions">
                        <button class="btn" type="button" on:click=move |_| on_close.run(())>
                            "Cancel"
                        </button>
                        <button class="btn btn--primary" type="submit" disabled=move || pending.get()>
                            {move || if pending.get() { "Creating..." } else { "Create" }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
