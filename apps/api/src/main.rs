mod advising;
mod config;
mod errors;
mod llm_client;
mod recommendation;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::advising::advisor::{Advisor, LlmAdvisor};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::recommendation::catalog::FieldCatalog;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Advisor API v{}", env!("CARGO_PKG_VERSION"));

    // Field catalog is built once and shared read-only
    let catalog = FieldCatalog::builtin()?;
    info!(
        "Field catalog loaded: {} fields, {} bonus groups",
        catalog.len(),
        catalog.bonus_groups().len()
    );

    // Initialize LLM-backed advisor (optional: scoring works without it)
    let advisor: Option<Arc<dyn Advisor>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmAdvisor::new(llm)))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; advisor routes will answer 503");
            None
        }
    };

    let state = AppState::new(config.clone(), catalog, advisor);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
