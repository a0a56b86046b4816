mod config;
mod llm;
mod pipeline;
mod routes;
mod sources;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use pipeline::Pipeline;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load env before the filter so RUST_LOG in .env applies
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("research_relay=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let creds = &config.credentials;
    info!(
        model = %config.model,
        youtube = creds.youtube.is_some(),
        news = creds.news.is_some(),
        stack_exchange_key = creds.stack_exchange.is_some(),
        twitter = creds.twitter_bearer.is_some(),
        facebook = creds.facebook_graph.is_some(),
        "Configuration loaded"
    );

    let pipeline = Arc::new(Pipeline::new(&config)?);
    if !pipeline.is_configured() {
        warn!("LLM_API_KEY is not set; every search will be rejected until it is");
    }

    let app = routes::router(AppState { pipeline });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    info!("Research relay listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
