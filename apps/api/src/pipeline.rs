//! CV pipeline — orchestrates a single CV submission end to end.
//!
//! Flow: ocr_document → parse_candidate → five category scorers (concurrent)
//!       → aggregate → `ProcessedCv`.
//!
//! Persistence is the caller's job: the pipeline performs no writes, so a
//! failed run leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::info;

use crate::extraction::{parse_candidate, CandidateInfo};
use crate::llm_client::TextGenerator;
use crate::ocr::{ocr_document, PageOcr};
use crate::scoring::{aggregate, score_category, Category, MissingScorePolicy, ScoreBundle};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Could not extract text from CV. Please try a different file.")]
    EmptyText,

    #[error("Could not parse CV. Please try again.")]
    Unparseable,

    #[error("Scoring failed for: {}", join_categories(.0))]
    ScoringAborted(Vec<Category>),

    #[error("Scoring task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Knobs for the pipeline itself. Capabilities are passed separately.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineConfig {
    pub missing_score_policy: MissingScorePolicy,
}

/// Result of one successful run; also the response payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedCv {
    pub candidate_info: CandidateInfo,
    pub scores: BTreeMap<Category, u32>,
    pub reasons: BTreeMap<Category, String>,
    pub total_score: f64,
    pub failed_categories: Vec<Category>,
}

impl ProcessedCv {
    fn new(candidate_info: CandidateInfo, bundle: ScoreBundle) -> Self {
        Self {
            scores: bundle.scores(),
            reasons: bundle.reasons(),
            total_score: bundle.total,
            failed_categories: bundle.failed,
            candidate_info,
        }
    }
}

/// The extraction-and-scoring pipeline with its injected capabilities.
#[derive(Clone)]
pub struct CvPipeline {
    generator: Arc<dyn TextGenerator>,
    ocr: Arc<dyn PageOcr>,
    config: PipelineConfig,
}

impl CvPipeline {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        ocr: Arc<dyn PageOcr>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            generator,
            ocr,
            config,
        }
    }

    /// Runs OCR on `pdf_bytes`, then extraction and scoring against `jd_text`.
    pub async fn process(&self, pdf_bytes: &[u8], jd_text: &str) -> Result<ProcessedCv, PipelineError> {
        let cv_text = ocr_document(self.ocr.as_ref(), pdf_bytes).await;
        if cv_text.trim().is_empty() {
            return Err(PipelineError::EmptyText);
        }
        info!("OCR produced {} characters", cv_text.len());

        self.process_text(&cv_text, jd_text).await
    }

    /// Extraction and scoring over text that has already been OCR'd.
    pub async fn process_text(&self, cv_text: &str, jd_text: &str) -> Result<ProcessedCv, PipelineError> {
        let info = parse_candidate(cv_text, self.generator.as_ref())
            .await
            .ok_or(PipelineError::Unparseable)?;

        let bundle = self.score_all(&info, jd_text).await?;
        info!(
            "Scored candidate {}: total={:.1}, failed={:?}",
            info.name_text(),
            bundle.total,
            bundle.failed
        );

        Ok(ProcessedCv::new(info, bundle))
    }

    /// Scores every category concurrently and joins before aggregating.
    pub async fn score_all(&self, info: &CandidateInfo, jd_text: &str) -> Result<ScoreBundle, PipelineError> {
        let jd: Arc<str> = Arc::from(jd_text);
        let mut tasks = JoinSet::new();

        for category in Category::ALL {
            let generator = Arc::clone(&self.generator);
            let jd = Arc::clone(&jd);
            let excerpt = category.excerpt(info);
            tasks.spawn(async move {
                let outcome = score_category(&jd, &excerpt, category, generator.as_ref()).await;
                (category, outcome)
            });
        }

        let mut outcomes = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            let (category, outcome) = joined?;
            outcomes.insert(category, outcome);
        }

        aggregate(outcomes, self.config.missing_score_policy).map_err(PipelineError::ScoringAborted)
    }
}
