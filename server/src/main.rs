//! Parley web host.
//!
//! Serves the server-rendered app shell, the compiled WASM bundle under
//! `/pkg` and a `/healthz` health check. All chat data lives in the hosted backend;
//! this process holds no state beyond its configuration.

mod config;
mod routes;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let app = routes::leptos_app(&config)?;
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    tracing::info!(port = config.port, site_root = %config.site_root.display(), "parley listening");
    axum::serve(listener, app).await?;
    Ok(())
}
