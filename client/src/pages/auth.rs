//! Sign-in / sign-up page.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::auth_form::{SignInForm, SignUpForm};
use crate::state::session::SessionState;
use crate::util::auth::install_signed_in_redirect;

#[component]
pub fn AuthPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    install_signed_in_redirect(session, use_navigate());

    let registering = RwSignal::new(false);
    let on_switch = Callback::new(move |()| registering.update(|r| *r = !*r));

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <Show
                    when=move || registering.get()
                    fallback=move || view! { <SignInForm on_switch=on_switch/> }
                >
                    <SignUpForm on_switch=on_switch/>
                </Show>
            </div>
        </div>
    }
}
