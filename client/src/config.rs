//! Hosted backend connection settings.
//!
//! The project URL and public anon key are baked in at build time from
//! `PARLEY_STORE_URL` and `PARLEY_STORE_ANON_KEY`, the same way the bundle is
//! built for every environment. They are validated once when the app mounts.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Errors raised while validating backend settings.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing build setting: {0}")]
    Missing(&'static str),
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

/// Validated backend connection settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Project base URL without a trailing slash.
    pub url: String,
    /// Public anon key sent as `apikey` on every request.
    pub anon_key: String,
}

impl StoreConfig {
    /// Read settings captured at build time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a setting is absent or malformed.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_parts(option_env!("PARLEY_STORE_URL"), option_env!("PARLEY_STORE_ANON_KEY"))
    }

    /// Validate raw settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] for absent/blank values and
    /// [`ConfigError::InvalidUrl`] for non-http(s) URLs.
    pub fn from_parts(url: Option<&str>, anon_key: Option<&str>) -> Result<Self, ConfigError> {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::Missing("PARLEY_STORE_URL"))?;
        let anon_key = anon_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("PARLEY_STORE_ANON_KEY"))?;
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(url.to_owned()));
        }
        Ok(Self { url: url.trim_end_matches('/').to_owned(), anon_key: anon_key.to_owned() })
    }

    /// REST endpoint for one table.
    #[must_use]
    pub fn rest_url(&self, table: store::Table) -> String {
        format!("{}/rest/v1/{}", self.url, table.as_str())
    }

    /// Auth endpoint, e.g. `auth_url("signup")`.
    #[must_use]
    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.url)
    }

    /// Realtime websocket endpoint (http scheme swapped for ws).
    #[must_use]
    pub fn realtime_url(&self) -> String {
        let base = if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            self.url.clone()
        };
        format!("{base}/realtime/v1/websocket?apikey={}&vsn=1.0.0", self.anon_key)
    }
}
