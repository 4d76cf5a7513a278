//! Avatar rendering decision: image when a URL exists, else an initial.

#[cfg(test)]
#[path = "avatar_test.rs"]
mod avatar_test;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarKind {
    Image(String),
    Initial(String),
}

/// Decide how to render a user's avatar.
///
/// Blank URLs count as absent. The initial is the upper-cased first
/// character of the username, or `?` when the username is empty.
#[must_use]
pub fn avatar_kind(username: &str, avatar_url: Option<&str>) -> AvatarKind {
    match avatar_url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => AvatarKind::Image(url.to_owned()),
        None => AvatarKind::Initial(initial(username)),
    }
}

#[must_use]
pub fn initial(name: &str) -> String {
    name.trim().chars().next().map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
}
