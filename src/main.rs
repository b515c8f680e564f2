use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mitra_relay::{config::Config, routes, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mitra_relay=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env().context("loading configuration")?;
    info!(upstream = %config.upstream_base_url, user_lang = %config.user_lang, "configuration loaded");

    let state = Arc::new(AppState::from_config(&config));

    let sessions = state.sessions.clone();
    let purge_interval = config.purge_interval;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(purge_interval);
        loop {
            ticker.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                let remaining = sessions.len().await;
                debug!(removed, remaining, "purged idle sessions");
            }
        }
    });

    let app = routes::create_router(&config.static_dir).with_state(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!("Mind Mitra relay running at http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
