//! Root application component with routing and context providers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Provides three app-wide contexts: the store handle (`AppStore`), the
//! session (`RwSignal<SessionState>`) and the theme (`RwSignal<Theme>`).
//! Everything else is owned by the component that renders it.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::StoreConfig;
use crate::net::AppStore;
use crate::pages::{auth::AuthPage, dashboard::DashboardPage};
use crate::state::session::SessionState;
use crate::state::theme::Theme;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let session = RwSignal::new(SessionState::default());
    let theme = RwSignal::new(Theme::default());
    provide_context(session);
    provide_context(theme);

    // Stored preference is only readable in the browser, after hydration.
    Effect::new(move || theme.set(crate::util::theme::read_preference()));
    Effect::new(move || crate::util::theme::apply(theme.get()));

    let body = match StoreConfig::from_build_env() {
        Ok(config) => {
            let store = AppStore::new(config);
            provide_context(store.clone());
            follow_session(store, session);
            view! {
                <Router>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("login") view=AuthPage/>
                        <Route path=StaticSegment("") view=DashboardPage/>
                    </Routes>
                </Router>
            }
            .into_any()
        }
        Err(e) => view! {
            <div class="config-error">
                <h1>"Parley is not configured"</h1>
                <p>{e.to_string()}</p>
            </div>
        }
        .into_any(),
    };

    view! {
        <Stylesheet id="leptos" href="/pkg/parley.css"/>
        <Title text="Parley"/>
        {body}
    }
}

/// Restore the persisted session, then follow auth transitions for the
/// lifetime of the app.
fn follow_session(store: AppStore, session: RwSignal<SessionState>) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        use store::RemoteStore;

        let mut events = store.auth_events();
        session.set(crate::services::session::restore(&store).await);
        while let Some(event) = events.next_event().await {
            session.update(|s| s.apply(&event));
        }
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (store, session);
    }
}
