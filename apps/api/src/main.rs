mod config;
mod errors;
mod layout;
mod llm_client;
mod render;
mod report;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::layout::{letter_page_config, weekly_report_template};
use crate::llm_client::GeminiClient;
use crate::report::session::SessionStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Weekly Report API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the generation client. A missing key is not fatal: every
    // generate request will fail with a clear message until one is configured.
    if config.google_api_key.is_none() {
        warn!("GOOGLE_API_KEY is not set; report generation will fail");
    }
    let generator = GeminiClient::new(config.google_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let page_config = letter_page_config();
    info!(
        "Reports will be written to {} ({}x{}pt pages)",
        config.output_dir.display(),
        page_config.width_pt,
        page_config.height_pt
    );
    info!("Unfinished sessions expire after {} minute(s)", config.session_ttl.num_minutes());

    // Build app state
    let state = AppState {
        generator: Arc::new(generator),
        sessions: SessionStore::with_ttl(config.session_ttl),
        config: config.clone(),
        template: Arc::new(weekly_report_template()),
        page_config,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS origins once the form is hosted

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
