use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::extraction::CandidateInfo;
use crate::models::analysis::{AnalysisRow, RankingRow};

/// Appends one analysis record. This is the only write a pipeline run makes.
pub async fn insert_analysis(
    pool: &PgPool,
    job_id: Uuid,
    info: &CandidateInfo,
    jd_text: &str,
    score: f64,
) -> Result<AnalysisRow, sqlx::Error> {
    let payload = json!({
        "info": info,
        "jd": jd_text,
    });

    let row = sqlx::query_as::<_, AnalysisRow>(
        r#"
        INSERT INTO analyses (id, job_id, name, email, phone, score, jd_text, cv_data, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job_id)
    .bind(info.name_text())
    .bind(info.email_text())
    .bind(info.phone_text())
    .bind(score)
    .bind(jd_text)
    .bind(&payload)
    .fetch_one(pool)
    .await?;

    info!(
        "Saved analysis {} for candidate: {}",
        row.id,
        if row.name.is_empty() { "Unknown" } else { &row.name }
    );
    Ok(row)
}

/// Ranking by score, newest first among ties. `job_id = None` ranks across all jobs.
pub async fn get_ranking(pool: &PgPool, job_id: Option<Uuid>) -> Result<Vec<RankingRow>, sqlx::Error> {
    sqlx::query_as::<_, RankingRow>(
        r#"
        SELECT a.id, a.job_id, j.title AS job_title, a.name, a.email, a.phone,
               a.score, a.created_at
        FROM analyses a
        JOIN jobs j ON a.job_id = j.id
        WHERE ($1::uuid IS NULL OR a.job_id = $1)
        ORDER BY a.score DESC, a.created_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await
}
