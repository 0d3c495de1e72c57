use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::queries::{
    create_application_with_answers, get_application, get_application_answers,
    get_candidate_applications, ApplicationWithJob,
};
use crate::applications::submission::{
    answers_to_store, missing_required, MISSING_ANSWERS_MESSAGE,
};
use crate::auth::session::Session;
use crate::errors::AppError;
use crate::jobs::queries::{get_job, get_job_questions};
use crate::models::application::{Application, ApplicationAnswer};
use crate::models::job::{Job, JobQuestion};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ApplyRequest {
    /// Answers keyed by question id.
    #[serde(default)]
    pub answers: HashMap<Uuid, String>,
}

#[derive(Serialize)]
pub struct ApplicationDetail {
    pub application: Application,
    pub job: Job,
    pub questions: Vec<JobQuestion>,
    pub answers: Vec<ApplicationAnswer>,
}

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    session: Session,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    if !session.capabilities.can_apply() {
        return Err(AppError::Forbidden(
            "Managers cannot apply to jobs".to_string(),
        ));
    }

    let job = get_job(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", job_id))?;
    if !job.is_active {
        return Err(AppError::Validation(
            "This job is no longer accepting applications".to_string(),
        ));
    }

    let questions = get_job_questions(&state.db, job_id).await?;
    if !missing_required(&questions, &req.answers).is_empty() {
        return Err(AppError::Validation(MISSING_ANSWERS_MESSAGE.to_string()));
    }

    let answers = answers_to_store(&questions, &req.answers);
    let application =
        create_application_with_answers(&state.db, session.user_id, job_id, &answers).await?;

    info!(
        application_id = %application.id,
        %job_id,
        candidate = %session.user_id,
        "Application submitted"
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
pub async fn handle_list_mine(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<ApplicationWithJob>>, AppError> {
    Ok(Json(
        get_candidate_applications(&state.db, session.user_id).await?,
    ))
}

/// GET /api/v1/applications/:id
/// Visible to the applicant and to managers.
pub async fn handle_get(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationDetail>, AppError> {
    let application = match get_application(&state.db, id).await? {
        Some(app) if app.candidate_id == session.user_id || session.capabilities.is_manager() => {
            app
        }
        _ => return Err(AppError::not_found("Application", id)),
    };

    let job = get_job(&state.db, application.job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", application.job_id))?;
    let questions = get_job_questions(&state.db, job.id).await?;
    let answers = get_application_answers(&state.db, application.id).await?;

    Ok(Json(ApplicationDetail {
        application,
        job,
        questions,
        answers,
    }))
}
