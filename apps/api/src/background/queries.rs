use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::BackgroundQuestion;

pub async fn get_background_questions(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<BackgroundQuestion>, AppError> {
    Ok(sqlx::query_as::<_, BackgroundQuestion>(
        "SELECT * FROM background_questions WHERE user_id = $1 ORDER BY question_number ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// Upsert on (user_id, question_number).
pub async fn upsert_background_question(
    pool: &PgPool,
    user_id: Uuid,
    question_number: i32,
    answer: bool,
    explanation: Option<&str>,
) -> Result<BackgroundQuestion, AppError> {
    Ok(sqlx::query_as::<_, BackgroundQuestion>(
        r#"
        INSERT INTO background_questions (user_id, question_number, answer, explanation)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, question_number) DO UPDATE
            SET answer = EXCLUDED.answer,
                explanation = EXCLUDED.explanation,
                updated_at = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(question_number)
    .bind(answer)
    .bind(explanation)
    .fetch_one(pool)
    .await?)
}
