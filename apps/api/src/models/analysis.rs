use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted pipeline run. Written once, never updated; removed only
/// when its job is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub score: f64,
    pub jd_text: String,
    /// `{"info": CandidateInfo, "jd": jd_text}`
    pub cv_data: Value,
    pub created_at: DateTime<Utc>,
}

/// A ranking entry joined with its job title.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RankingRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
