//! Axum route handlers for CV processing and ranking.

use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::cvs::store::{get_ranking, insert_analysis};
use crate::errors::AppError;
use crate::jobs::store::get_job;
use crate::models::analysis::RankingRow;
use crate::pipeline::ProcessedCv;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub job_id: Option<Uuid>,
}

/// The parts of a `POST /api/cvs/process` multipart form.
#[derive(Debug)]
struct CvUpload {
    filename: String,
    data: Bytes,
    job_id: Uuid,
}

impl CvUpload {
    async fn from_multipart(mut multipart: Multipart, max_bytes: usize) -> Result<Self, AppError> {
        let to_app_error = move |err: MultipartError| multipart_error(err, max_bytes);
        let mut file: Option<(String, Bytes)> = None;
        let mut job_id: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(to_app_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some("file") => {
                    let filename = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await.map_err(to_app_error)?;
                    file = Some((filename, data));
                }
                Some("job_id") => {
                    job_id = Some(field.text().await.map_err(to_app_error)?);
                }
                _ => {}
            }
        }

        let (filename, data) =
            file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
        let job_id = job_id
            .ok_or_else(|| AppError::Validation("Missing 'job_id' field".to_string()))?;
        let job_id = Uuid::parse_str(job_id.trim())
            .map_err(|_| AppError::Validation(format!("Invalid job_id '{job_id}'")))?;

        Ok(Self {
            filename,
            data,
            job_id,
        })
    }

    fn validate(&self) -> Result<(), AppError> {
        if !self.filename.to_ascii_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation("Only PDF files are allowed".to_string()));
        }
        if self.data.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        Ok(())
    }
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "Upload exceeds the maximum size of {max_bytes} bytes"
        ))
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cvs/process
///
/// Multipart form: `file` (PDF) and `job_id`. Runs the full pipeline against
/// the job's description and persists one analysis on success.
pub async fn handle_process_cv(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessedCv>, AppError> {
    let upload = CvUpload::from_multipart(multipart, state.config.max_upload_bytes).await?;
    upload.validate()?;

    let job = get_job(&state.db, upload.job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    info!(
        "Processing CV '{}' ({} bytes) for job {}",
        upload.filename,
        upload.data.len(),
        job.id
    );

    let result = state.pipeline.process(&upload.data, &job.description).await?;

    insert_analysis(
        &state.db,
        job.id,
        &result.candidate_info,
        &job.description,
        result.total_score,
    )
    .await?;

    Ok(Json(result))
}

/// GET /api/cvs/ranking?job_id=<uuid>
pub async fn handle_ranking(
    State(state): State<AppState>,
    Query(params): Query<RankingQuery>,
) -> Result<Json<Vec<RankingRow>>, AppError> {
    Ok(Json(get_ranking(&state.db, params.job_id).await?))
}
