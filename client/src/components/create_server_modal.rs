//! Modal dialog for creating a server.

use leptos::prelude::*;
use uuid::Uuid;

use crate::net::AppStore;
use crate::services::servers::{create_server, validate_server_input};
use crate::state::session::SessionState;

#[component]
pub fn CreateServerModal(on_close: Callback<()>, on_created: Callback<Uuid>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<AppStore>();
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let Some(owner_id) = session.get_untracked().user_id() else {
            return;
        };
        let input = match validate_server_input(&name.get_untracked(), &description.get_untracked()) {
            Ok(input) => input,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        pending.set(true);
        error.set(None);
        let store = store.clone();
        leptos::task::spawn_local(async move {
            match create_server(&store, owner_id, &input).await {
                // Unmounts the dialog; its signals are disposed after this call.
                Ok(created) => on_created.run(created.server.id),
                Err(e) => {
                    if let Some(orphan) = e.orphaned_server {
                        leptos::logging::warn!(
                            "server {orphan} left without its {}: {}",
                            e.step.as_str(),
                            e.source
                        );
                    }
                    error.set(Some(e.to_string()));
                    pending.set(false);
                }
            }
        });
    };

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_close.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Create a server"</h2>
                <form class="dialog__form" on:submit=on_submit>
                    <label class="dialog__label">
                        "Server name"
                        <input
                            class="dialog__input"
                            type="text"
                            maxlength="100"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="dialog__label">
                        "Description"
                        <textarea
                            class="dialog__input"
                            maxlength="500"
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        ></textarea>
                    </label>
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
