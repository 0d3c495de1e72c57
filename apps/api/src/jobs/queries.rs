use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::editor::{DraftKind, JobForm, PlannedQuestion};
use crate::models::job::{encode_options, Job, JobQuestion, JobQuestionRow};

/// Newest first. Inactive postings only when asked for.
pub async fn list_jobs(pool: &PgPool, include_inactive: bool) -> Result<Vec<Job>, AppError> {
    Ok(sqlx::query_as::<_, Job>(
        "SELECT * FROM jobs WHERE is_active OR $1 ORDER BY created_at DESC",
    )
    .bind(include_inactive)
    .fetch_all(pool)
    .await?)
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<Job>, AppError> {
    Ok(sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

pub async fn get_job_questions(pool: &PgPool, job_id: Uuid) -> Result<Vec<JobQuestion>, AppError> {
    let rows = sqlx::query_as::<_, JobQuestionRow>(
        r#"SELECT * FROM job_questions WHERE job_id = $1 ORDER BY "order" ASC"#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(JobQuestion::from).collect())
}

async fn insert_job(
    tx: &mut Transaction<'_, Postgres>,
    created_by: Uuid,
    form: &JobForm,
) -> Result<Job, AppError> {
    Ok(sqlx::query_as::<_, Job>(
        r#"
        INSERT INTO jobs (title, description, requirements, created_by, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(form.title.trim())
    .bind(&form.description)
    .bind(form.requirements())
    .bind(created_by)
    .bind(form.is_active)
    .fetch_one(&mut **tx)
    .await?)
}

async fn update_job(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    form: &JobForm,
) -> Result<Option<Job>, AppError> {
    Ok(sqlx::query_as::<_, Job>(
        r#"
        UPDATE jobs SET
            title = $2,
            description = $3,
            requirements = $4,
            is_active = $5,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(form.title.trim())
    .bind(&form.description)
    .bind(form.requirements())
    .bind(form.is_active)
    .fetch_optional(&mut **tx)
    .await?)
}

async fn save_question(
    tx: &mut Transaction<'_, Postgres>,
    job_id: Uuid,
    planned: &PlannedQuestion,
) -> Result<(), AppError> {
    let options = planned.options.as_deref().map(encode_options);
    match planned.kind {
        DraftKind::New => {
            sqlx::query(
                r#"
                INSERT INTO job_questions (job_id, question, question_type, required, "order", options)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(job_id)
            .bind(&planned.question)
            .bind(planned.question_type)
            .bind(planned.required)
            .bind(planned.order)
            .bind(options)
            .execute(&mut **tx)
            .await?;
        }
        DraftKind::Existing(id) => {
            let result = sqlx::query(
                r#"
                UPDATE job_questions SET
                    question = $3,
                    question_type = $4,
                    required = $5,
                    "order" = $6,
                    options = $7
                WHERE id = $1 AND job_id = $2
                "#,
            )
            .bind(id)
            .bind(job_id)
            .bind(&planned.question)
            .bind(planned.question_type)
            .bind(planned.required)
            .bind(planned.order)
            .bind(options)
            .execute(&mut **tx)
            .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::not_found("Question", id));
            }
        }
    }
    Ok(())
}

/// Creates (`job_id = None`) or updates a posting and saves its questions in
/// one transaction. Returns the job with its questions in order.
pub async fn save_job_with_questions(
    pool: &PgPool,
    job_id: Option<Uuid>,
    created_by: Uuid,
    form: &JobForm,
    questions: &[PlannedQuestion],
) -> Result<(Job, Vec<JobQuestion>), AppError> {
    let mut tx = pool.begin().await?;

    let job = match job_id {
        None => insert_job(&mut tx, created_by, form).await?,
        Some(id) => update_job(&mut tx, id, form)
            .await?
            .ok_or_else(|| AppError::not_found("Job", id))?,
    };

    for planned in questions {
        save_question(&mut tx, job.id, planned).await?;
    }

    tx.commit().await?;

    let questions = get_job_questions(pool, job.id).await?;
    Ok((job, questions))
}

/// Questions, applications and answers go with the job.
pub async fn delete_job(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_job_question(
    pool: &PgPool,
    job_id: Uuid,
    question_id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM job_questions WHERE id = $1 AND job_id = $2")
        .bind(question_id)
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_question_orders(
    pool: &PgPool,
    job_id: Uuid,
    orders: &[(Uuid, i32)],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (id, order) in orders {
        sqlx::query(r#"UPDATE job_questions SET "order" = $3 WHERE id = $1 AND job_id = $2"#)
            .bind(id)
            .bind(job_id)
            .bind(order)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::editor::{plan_question_saves, QuestionDraft};
    use crate::models::job::QuestionType;

    fn form(title: &str, is_active: bool) -> JobForm {
        JobForm {
            title: title.to_string(),
            description: "Regional flatbed, home weekends".to_string(),
            requirements: Some("  ".to_string()),
            is_active,
        }
    }

    fn draft(id: &str, question_type: QuestionType, options: Option<Vec<&str>>) -> QuestionDraft {
        QuestionDraft {
            id: id.to_string(),
            question: "Which endorsements do you hold?".to_string(),
            question_type,
            required: true,
            options: options.map(|o| o.into_iter().map(str::to_string).collect()),
        }
    }

    #[sqlx::test]
    async fn test_inactive_jobs_listed_only_on_request(pool: PgPool) {
        let manager = Uuid::new_v4();
        let (open, _) = save_job_with_questions(&pool, None, manager, &form("Open", true), &[])
            .await
            .unwrap();
        let (closed, _) =
            save_job_with_questions(&pool, None, manager, &form("Closed", false), &[])
                .await
                .unwrap();
        assert_eq!(closed.requirements, None);

        let visible: Vec<Uuid> = list_jobs(&pool, false)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.id)
            .collect();
        assert_eq!(visible, vec![open.id]);

        let all = list_jobs(&pool, true).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|j| j.id == closed.id));
    }

    #[sqlx::test]
    async fn test_options_survive_jsonb_storage(pool: PgPool) {
        let drafts = vec![
            draft("new-1", QuestionType::Checkbox, Some(vec![" Hazmat ", "Tanker", ""])),
            draft("new-2", QuestionType::Text, Some(vec!["ignored"])),
        ];
        let planned = plan_question_saves(&drafts).unwrap();
        let (job, questions) =
            save_job_with_questions(&pool, None, Uuid::new_v4(), &form("Tanker", true), &planned)
                .await
                .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(
            questions[0].options,
            Some(vec!["Hazmat".to_string(), "Tanker".to_string()])
        );
        assert_eq!(questions[0].order, 0);
        assert_eq!(questions[1].options, None);

        // Rows written by the older client hold the list as a JSON string.
        sqlx::query(
            r#"
            INSERT INTO job_questions (job_id, question, question_type, required, "order", options)
            VALUES ($1, 'Preferred lane?', 'select', false, 2, to_jsonb($2::text))
            "#,
        )
        .bind(job.id)
        .bind(r#"["East","West"]"#)
        .execute(&pool)
        .await
        .unwrap();

        let reloaded = get_job_questions(&pool, job.id).await.unwrap();
        assert_eq!(
            reloaded[2].options,
            Some(vec!["East".to_string(), "West".to_string()])
        );
    }

    #[sqlx::test]
    async fn test_update_saves_existing_and_new_questions(pool: PgPool) {
        let manager = Uuid::new_v4();
        let first = plan_question_saves(&[draft("new-a", QuestionType::Text, None)]).unwrap();
        let (job, saved) =
            save_job_with_questions(&pool, None, manager, &form("Local", true), &first)
                .await
                .unwrap();

        let existing_id = saved[0].id.to_string();
        let second = plan_question_saves(&[
            draft("new-b", QuestionType::Textarea, None),
            draft(&existing_id, QuestionType::Text, None),
        ])
        .unwrap();
        let (_, questions) =
            save_job_with_questions(&pool, Some(job.id), manager, &form("Local", true), &second)
                .await
                .unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].id, saved[0].id);
        assert_eq!(questions[1].order, 1);

        // A question from another posting is not updated through this one.
        let foreign = plan_question_saves(&[draft(
            &Uuid::new_v4().to_string(),
            QuestionType::Text,
            None,
        )])
        .unwrap();
        let result =
            save_job_with_questions(&pool, Some(job.id), manager, &form("Local", true), &foreign)
                .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
