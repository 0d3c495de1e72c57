use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::{conflict_on_unique, AppError};
use crate::models::application::{Application, ApplicationAnswer};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationWithJob {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
}

/// Inserts the application and its answers in one transaction. A second
/// application by the same candidate to the same job is a conflict.
pub async fn create_application_with_answers(
    pool: &PgPool,
    candidate_id: Uuid,
    job_id: Uuid,
    answers: &[(Uuid, String)],
) -> Result<Application, AppError> {
    let mut tx = pool.begin().await?;

    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications (job_id, candidate_id, status)
        VALUES ($1, $2, 'submitted')
        RETURNING *
        "#,
    )
    .bind(job_id)
    .bind(candidate_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| conflict_on_unique(e, "You have already applied to this job"))?;

    for (question_id, answer) in answers {
        sqlx::query(
            r#"
            INSERT INTO application_answers (application_id, question_id, answer)
            VALUES ($1, $2, $3)
            ON CONFLICT (application_id, question_id) DO UPDATE SET answer = EXCLUDED.answer
            "#,
        )
        .bind(application.id)
        .bind(question_id)
        .bind(answer)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(application)
}

/// A candidate's applications, newest first.
pub async fn get_candidate_applications(
    pool: &PgPool,
    candidate_id: Uuid,
) -> Result<Vec<ApplicationWithJob>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationWithJob>(
        r#"
        SELECT a.*, j.title AS job_title
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.candidate_id = $1
        ORDER BY a.submitted_at DESC
        "#,
    )
    .bind(candidate_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<Option<Application>, AppError> {
    Ok(
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_application_answers(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<ApplicationAnswer>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationAnswer>(
        "SELECT * FROM application_answers WHERE application_id = $1",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await?)
}
