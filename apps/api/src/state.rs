use sqlx::PgPool;

use crate::config::Config;
use crate::pipeline::CvPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Extraction-and-scoring pipeline with its OCR and generative backends.
    pub pipeline: CvPipeline,
    pub config: Config,
}
