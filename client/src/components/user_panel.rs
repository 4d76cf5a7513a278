//! Signed-in user footer: avatar, name, presence, theme toggle, sign out.

use leptos::prelude::*;
use store::Profile;

use crate::components::avatar::Avatar;
use crate::net::AppStore;
use crate::services::session::{load_profile, sign_out};
use crate::state::session::SessionState;
use crate::state::theme::Theme;

#[component]
pub fn UserPanel() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let theme = expect_context::<RwSignal<Theme>>();
    let store = expect_context::<AppStore>();
    let profile = RwSignal::new(None::<Profile>);
    let user_id = Memo::new(move |_| session.get().user_id());

    let profile_store = store.clone();
    Effect::new(move || {
        profile.set(None);
        let Some(id) = user_id.get() else {
            return;
        };
        let store = profile_store.clone();
        leptos::task::spawn_local(async move {
            match load_profile(&store, id).await {
                Ok(found) if user_id.get_untracked() == Some(id) => profile.set(found),
                Ok(_) => {}
                Err(e) => leptos::logging::warn!("profile load failed: {e}"),
            }
        });
    });

    let name = move || {
        profile
            .get()
            .map(|p| p.username)
            .or_else(|| session.get().display_name())
            .unwrap_or_default()
    };
    let status = move || profile.get().map_or("online", |p| p.status.as_str());

    let on_sign_out = move |_| {
        let store = store.clone();
        leptos::task::spawn_local(async move {
            if let Err(e) = sign_out(&store).await {
                leptos::logging::warn!("sign out failed: {e}");
            }
        });
    };

    view! {
        <footer class="user-panel">
            {move || {
                let avatar_url = profile.get().and_then(|p| p.avatar_url).unwrap_or_default();
                view! { <Avatar name=name() image_url=avatar_url small=true/> }
            }}
            <div class="user-panel__identity">
                <span class="user-panel__name">{name}</span>
                <span class="user-panel__status">{status}</span>
            </div>
            <button
                class="btn user-panel__theme"
                title="Toggle theme"
                on:click=move |_| {
                    let next = crate::util::theme::toggle(theme.get_untracked());
                    theme.set(next);
                }
            >
                {move || if theme.get().is_dark() { "☀" } else { "☾" }}
            </button>
            <button class="btn user-panel__sign-out" title="Sign out" on:click=on_sign_out>
                "Sign out"
            </button>
        </footer>
    }
}
