//! Sign-in and sign-up forms shown on the auth page.
//!
//! ERROR HANDLING
//! ==============
//! Local validation messages and backend auth errors render in the same
//! slot under the form; the backend's text is shown verbatim. A sign-up
//! whose profile write fails has already signed the user in, so that error
//! is stored as the session notice and shown on the dashboard.

use leptos::prelude::*;

use crate::net::AppStore;
use crate::services::session::{sign_in, sign_up, validate_sign_in, validate_sign_up};
use crate::state::session::SessionState;

#[component]
pub fn SignInForm(on_switch: Callback<()>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<AppStore>();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let password_value = password.get_untracked();
        let email_value = match validate_sign_in(&email.get_untracked(), &password_value) {
            Ok(email_value) => email_value,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let store = store.clone();
        leptos::task::spawn_local(async move {
            match sign_in(&store, &email_value, &password_value).await {
                Ok(user) => session.set(SessionState::resolved(Some(user))),
                Err(e) => {
                    error.set(Some(e.to_string()));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h1>"Welcome back!"</h1>
            <p class="auth-form__subtitle">"We're so excited to see you again!"</p>
            <label class="auth-form__label">
                "Email"
                <input
                    class="auth-form__input"
                    type="email"
                    autocomplete="email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
            </label>
            <label class="auth-form__label">
                "Password"
                <input
                    class="auth-form__input"
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || error.get().is_some()>
                <p class="auth-form__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn btn--primary auth-form__submit" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Signing in..." } else { "Sign In" }}
            </button>
            <p class="auth-form__switch">
                "Need an account? "
                <button class="btn--link" type="button" on:click=move |_| on_switch.run(())>
                    "Register"
                </button>
            </p>
        </form>
    }
}

#[component]
pub fn SignUpForm(on_switch: Callback<()>) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let store = expect_context::<AppStore>();
    let email = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let input = match validate_sign_up(&email.get_untracked(), &password.get_untracked(), &username.get_untracked())
        {
            Ok(input) => input,
            Err(msg) => {
                error.set(Some(msg.to_owned()));
                return;
            }
        };
        busy.set(true);
        error.set(None);
        let store = store.clone();
        leptos::task::spawn_local(async move {
            match sign_up(&store, &input).await {
                Ok(user) => session.set(SessionState::resolved(Some(user))),
                // Signed in already, so this form is on its way out; the
                // notice travels with the session instead.
                Err(e) if e.account.is_some() => {
                    let notice = e.incomplete_notice();
                    if let Some(user) = e.account {
                        session.update(|s| s.signed_in_with_notice(user, notice));
                    }
                }
                Err(e) => {
                    error.set(Some(e.to_string()));
                    busy.set(false);
                }
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=on_submit>
            <h1>"Create an account"</h1>
            <label class="auth-form__label">
                "Email"
                <input
                    class="auth-form__input"
                    type="email"
                    autocomplete="email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
            </label>
            <label class="auth-form__label">
                "Username"
                <input
                    class="auth-form__input"
                    type="text"
                    maxlength="32"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
            </label>
            <label class="auth-form__label">
                "Password"
                <input
                    class="auth-form__input"
                    type="password"
                    autocomplete="new-password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
            </label>
            <Show when=move || error.get().is_some()>
                <p class="auth-form__error">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <button class="btn btn--primary auth-form__submit" type="submit" disabled=move || busy.get()>
                {move || if busy.get() { "Creating account..." } else { "Continue" }}
            </button>
            <p class="auth-form__switch">
                <button class="btn--link" type="button" on:click=move |_| on_switch.run(())>
                    "Already have an account?"
                </button>
            </p>
        </form>
    }
}
