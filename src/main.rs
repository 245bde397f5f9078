// This is the entry point of the Slack moderation webhook.
//
// **Architecture Overview:**
// - `core/` = Business logic (event classification, filter matching, dispatch)
// - `infra/` = Implementations of core traits (Slack Web API, signatures, config)
// - `web/` = HTTP adapter (axum router and the Events API handler)
//
// This file's job is to:
// 1. Load configuration and filter rules
// 2. Initialize services (dependency injection)
// 3. Serve the Events API endpoint until shutdown

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::core::moderation::{ModerationService, SlackApi};
use crate::infra::config::{load_filters, AppConfig};
use crate::infra::slack::{SignatureVerifier, SlackApiClient};
use crate::web::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("slack_moderator=info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let filters = load_filters(&config.filter_config_path).with_context(|| {
        format!(
            "Failed to load filters from {}",
            config.filter_config_path.display()
        )
    })?;
    if filters.is_empty() {
        tracing::warn!("No filters configured; messages will be acknowledged but not moderated");
    }
    tracing::info!(filter_count = filters.len(), "Filters loaded");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // The filter set and the API client are built once and shared read-only
    // by every delivery.

    let slack_client = SlackApiClient::new(
        &config.access_token,
        config.api_base_url.clone(),
        config.api_timeout,
    )
    .context("Failed to create Slack API client")?;
    let api: Box<dyn SlackApi> = Box::new(slack_client);

    let state = AppState::new(
        SignatureVerifier::new(config.signing_secret.clone()),
        ModerationService::new(filters, api),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "Listening for Slack events");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Server shut down cleanly");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to register SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
