//! Round avatar: image when a URL is set, else the name's initial.

use leptos::prelude::*;

use crate::util::avatar::{AvatarKind, avatar_kind};

#[component]
pub fn Avatar(
    #[prop(into)] name: String,
    #[prop(optional)] image_url: Option<String>,
    #[prop(optional)] small: bool,
) -> impl IntoView {
    let class = if small { "avatar avatar--small" } else { "avatar" };
    match avatar_kind(&name, image_url.as_deref()) {
        AvatarKind::Image(url) => view! { <img class=class src=url alt=name/> }.into_any(),
        AvatarKind::Initial(letter) => view! {
            <span class=format!("{class} avatar--initial") title=name>
                {letter}
            </span>
        }
        .into_any(),
    }
}
