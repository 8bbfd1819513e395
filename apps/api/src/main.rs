mod config;
mod cvs;
mod db;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod models;
mod ocr;
mod pipeline;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::GeminiClient;
use crate::ocr::{PageOcr, TextLayerOcr, VisionOcr};
use crate::pipeline::{CvPipeline, PipelineConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SmartCV API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;

    // Initialize LLM client
    let llm = GeminiClient::new(
        config.genai_api_key.clone(),
        config.llm_model.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .map_err(|e| anyhow::anyhow!("Failed to build LLM client: {e}"))?;
    info!("LLM client initialized (model: {})", llm.model());

    let ocr = build_ocr(&config)?;
    info!("OCR backend: {}", ocr.backend());

    let pipeline = CvPipeline::new(
        Arc::new(llm),
        ocr,
        PipelineConfig {
            missing_score_policy: config.missing_score_policy,
        },
    );
    info!("Missing score policy: {:?}", config.missing_score_policy);

    // Build app state
    let state = AppState {
        db,
        pipeline,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Cloud Vision when a key is configured, otherwise the embedded PDF text layer.
fn build_ocr(config: &Config) -> Result<Arc<dyn PageOcr>> {
    match &config.vision_api_key {
        Some(key) => {
            let vision = VisionOcr::new(key.clone(), Duration::from_secs(config.ocr_timeout_secs))
                .map_err(|e| anyhow::anyhow!("Failed to build OCR client: {e}"))?;
            Ok(Arc::new(vision))
        }
        None => Ok(Arc::new(TextLayerOcr)),
    }
}
