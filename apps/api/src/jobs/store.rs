use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::job::JobRow;

/// All jobs, newest first.
pub async fn list_jobs(pool: &PgPool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_job(pool: &PgPool, job_id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

pub async fn create_job(pool: &PgPool, title: &str, description: &str) -> Result<JobRow, sqlx::Error> {
    let job = sqlx::query_as::<_, JobRow>(
        r#"
        INSERT INTO jobs (id, title, description, created_at, updated_at)
        VALUES ($1, $2, $3, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(title)
    .bind(description)
    .fetch_one(pool)
    .await?;

    info!("Created job {} ({})", job.id, job.title);
    Ok(job)
}

/// Returns `None` when no job has this id.
pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    title: &str,
    description: &str,
) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        UPDATE jobs
        SET title = $1, description = $2, updated_at = NOW()
        WHERE id = $3
        RETURNING *
        "#,
    )
    .bind(title)
    .bind(description)
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

/// Deletes the job and, by cascade, its analyses. Returns whether a row was removed.
pub async fn delete_job(pool: &PgPool, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(job_id)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        info!("Deleted job {job_id} and its analyses");
    }
    Ok(result.rows_affected() > 0)
}
