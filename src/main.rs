use anyhow::Context;
use tracing_subscriber::EnvFilter;

use menu_admin::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up MENU_SERVER_TOKEN, MENU_SERVER_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = menu_admin::config::config();
    tracing::info!("Starting menu store in {:?} mode", config.environment);
    if config.server.auth_token.is_none() {
        if menu_admin::is_development!() {
            tracing::info!("No MENU_SERVER_TOKEN set, /api routes are open");
        } else {
            tracing::warn!("No MENU_SERVER_TOKEN set outside development, /api routes are open");
        }
    }

    let state = AppState::from_config(&config.server);
    let app = server::app(state, &config.server);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Menu store listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
