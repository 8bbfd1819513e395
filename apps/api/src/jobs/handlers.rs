use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::store;
use crate::models::job::JobRow;
use crate::state::AppState;

/// Body for both create and update.
#[derive(Debug, Deserialize)]
pub struct JobPayload {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub message: String,
}

impl JobPayload {
    /// Trimmed `(title, description)`; both must be non-empty.
    fn validated(&self) -> Result<(&str, &str), AppError> {
        let title = self.title.trim();
        let description = self.description.trim();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if description.is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }
        Ok((title, description))
    }
}

fn job_not_found(job_id: Uuid) -> AppError {
    AppError::NotFound(format!("Job {job_id} not found"))
}

/// An unknown job is reported before any payload problem.
fn validate_update<'a>(
    existing: Option<&JobRow>,
    job_id: Uuid,
    payload: &'a JobPayload,
) -> Result<(&'a str, &'a str), AppError> {
    if existing.is_none() {
        return Err(job_not_found(job_id));
    }
    payload.validated()
}

/// GET /api/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(store::list_jobs(&state.db).await?))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    store::get_job(&state.db, job_id)
        .await?
        .map(Json)
        .ok_or_else(|| job_not_found(job_id))
}

/// POST /api/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(payload): Json<JobPayload>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let (title, description) = payload.validated()?;
    let job = store::create_job(&state.db, title, description).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<JobRow>, AppError> {
    let existing = store::get_job(&state.db, job_id).await?;
    let (title, description) = validate_update(existing.as_ref(), job_id, &payload)?;
    store::update_job(&state.db, job_id, title, description)
        .await?
        .map(Json)
        .ok_or_else(|| job_not_found(job_id))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<DeleteJobResponse>, AppError> {
    if !store::delete_job(&state.db, job_id).await? {
        return Err(job_not_found(job_id));
    }
    Ok(Json(DeleteJobResponse {
        message: "Job deleted successfully".to_string(),
    }))
}
