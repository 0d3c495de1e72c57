use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::review::dashboards::ApplicationRow;
use crate::review::transition::NotesUpdate;

/// Every application with its job title and candidate name/email, newest first.
pub async fn get_application_rows(pool: &PgPool) -> Result<Vec<ApplicationRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT a.*,
               j.title AS job_title,
               p.full_name AS candidate_name,
               p.email AS candidate_email
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        LEFT JOIN profiles p ON p.user_id = a.candidate_id
        ORDER BY a.submitted_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?)
}

pub async fn get_all_applications(pool: &PgPool) -> Result<Vec<Application>, AppError> {
    Ok(sqlx::query_as::<_, Application>(
        "SELECT * FROM applications ORDER BY submitted_at DESC",
    )
    .fetch_all(pool)
    .await?)
}

/// Sets the status and stamps the reviewer and time.
pub async fn record_review(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
    reviewer: Uuid,
    notes: &NotesUpdate,
) -> Result<Option<Application>, AppError> {
    let (replace_notes, new_notes) = notes.as_bind();
    Ok(sqlx::query_as::<_, Application>(
        r#"
        UPDATE applications SET
            status = $2,
            reviewed_by = $3,
            reviewed_at = now(),
            notes = CASE WHEN $4 THEN $5 ELSE notes END,
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(reviewer)
    .bind(replace_notes)
    .bind(new_notes)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::queries::create_application_with_answers;

    async fn seed_application(pool: &PgPool) -> Application {
        let job_id: Uuid = sqlx::query_scalar(
            "INSERT INTO jobs (title, description, created_by) VALUES ('OTR', 'Long haul', $1) RETURNING id",
        )
        .bind(Uuid::new_v4())
        .fetch_one(pool)
        .await
        .unwrap();
        create_application_with_answers(pool, Uuid::new_v4(), job_id, &[])
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn test_review_stamps_reviewer_and_time(pool: PgPool) {
        let application = seed_application(&pool).await;
        assert_eq!(application.status, ApplicationStatus::Submitted);
        assert_eq!(application.reviewed_at, None);

        let reviewer = Uuid::new_v4();
        let reviewed = record_review(
            &pool,
            application.id,
            ApplicationStatus::MoreInfoRequested,
            reviewer,
            &NotesUpdate::Set("Need medical card".into()),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(reviewed.status, ApplicationStatus::MoreInfoRequested);
        assert_eq!(reviewed.reviewed_by, Some(reviewer));
        assert!(reviewed.reviewed_at.is_some());
        assert_eq!(reviewed.notes.as_deref(), Some("Need medical card"));
    }

    #[sqlx::test]
    async fn test_review_without_notes_keeps_stored_notes(pool: PgPool) {
        let application = seed_application(&pool).await;
        let reviewer = Uuid::new_v4();
        record_review(
            &pool,
            application.id,
            ApplicationStatus::UnderReview,
            reviewer,
            &NotesUpdate::Set("Called previous employer".into()),
        )
        .await
        .unwrap();

        let approved = record_review(
            &pool,
            application.id,
            ApplicationStatus::Approved,
            reviewer,
            &NotesUpdate::Keep,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);
        assert_eq!(approved.notes.as_deref(), Some("Called previous employer"));

        let cleared = record_review(
            &pool,
            application.id,
            ApplicationStatus::UnderReview,
            reviewer,
            &NotesUpdate::Clear,
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(cleared.notes, None);
    }

    #[sqlx::test]
    async fn test_review_of_missing_application(pool: PgPool) {
        let result = record_review(
            &pool,
            Uuid::new_v4(),
            ApplicationStatus::Rejected,
            Uuid::new_v4(),
            &NotesUpdate::Keep,
        )
        .await
        .unwrap();
        assert!(result.is_none());
    }
}
