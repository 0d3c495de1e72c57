use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::session::{ManagerSession, Session};
use crate::errors::AppError;
use crate::jobs::editor::{
    plan_question_saves, swap_with_neighbour, JobForm, MoveDirection, QuestionDraft,
};
use crate::jobs::queries::{
    delete_job, delete_job_question, get_job, get_job_questions, list_jobs,
    save_job_with_questions, set_question_orders,
};
use crate::models::job::{Job, JobQuestion};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub questions: Vec<JobQuestion>,
}

#[derive(Deserialize)]
pub struct SaveJobRequest {
    #[serde(flatten)]
    pub job: JobForm,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[derive(Deserialize)]
pub struct MoveQuestionRequest {
    pub direction: MoveDirection,
}

async fn load_job_detail(state: &AppState, id: Uuid) -> Result<Option<JobDetail>, AppError> {
    let Some(job) = get_job(&state.db, id).await? else {
        return Ok(None);
    };
    let questions = get_job_questions(&state.db, id).await?;
    Ok(Some(JobDetail { job, questions }))
}

async fn save(
    state: &AppState,
    job_id: Option<Uuid>,
    manager: Uuid,
    req: SaveJobRequest,
) -> Result<JobDetail, AppError> {
    req.job.validate().map_err(AppError::Validation)?;
    let planned = plan_question_saves(&req.questions).map_err(AppError::Validation)?;
    let (job, questions) =
        save_job_with_questions(&state.db, job_id, manager, &req.job, &planned).await?;
    info!(job_id = %job.id, questions = questions.len(), "Job posting saved");
    Ok(JobDetail { job, questions })
}

/// GET /api/v1/jobs
/// `include_inactive` is honoured for managers only.
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let include_inactive = params.include_inactive && session.capabilities.is_manager();
    Ok(Json(list_jobs(&state.db, include_inactive).await?))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    match load_job_detail(&state, id).await? {
        Some(detail) if detail.job.is_active || session.capabilities.is_manager() => {
            Ok(Json(detail))
        }
        _ => Err(AppError::not_found("Job", id)),
    }
}

/// GET /api/v1/jobs/:id/public
/// Shareable posting view; no session required, active postings only.
pub async fn handle_get_public(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobDetail>, AppError> {
    match load_job_detail(&state, id).await? {
        Some(detail) if detail.job.is_active => Ok(Json(detail)),
        _ => Err(AppError::not_found("Job", id)),
    }
}

/// POST /api/v1/jobs
pub async fn handle_create(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Json(req): Json<SaveJobRequest>,
) -> Result<(StatusCode, Json<JobDetail>), AppError> {
    let detail = save(&state, None, session.user_id, req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Path(id): Path<Uuid>,
    Json(req): Json<SaveJobRequest>,
) -> Result<Json<JobDetail>, AppError> {
    Ok(Json(save(&state, Some(id), session.user_id, req).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    ManagerSession(session): ManagerSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_job(&state.db, id).await? {
        return Err(AppError::not_found("Job", id));
    }
    info!(job_id = %id, manager = %session.user_id, "Job posting deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/jobs/:id/questions/:question_id
pub async fn handle_delete_question(
    State(state): State<AppState>,
    _manager: ManagerSession,
    Path((job_id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    if !delete_job_question(&state.db, job_id, question_id).await? {
        return Err(AppError::not_found("Question", question_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/questions/:question_id/move
/// Moving past either end leaves the list unchanged.
pub async fn handle_move_question(
    State(state): State<AppState>,
    _manager: ManagerSession,
    Path((job_id, question_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MoveQuestionRequest>,
) -> Result<Json<Vec<JobQuestion>>, AppError> {
    let mut questions = get_job_questions(&state.db, job_id).await?;
    let index = questions
        .iter()
        .position(|q| q.id == question_id)
        .ok_or_else(|| AppError::not_found("Question", question_id))?;

    if let Some(changed) = swap_with_neighbour(&mut questions, index, req.direction) {
        set_question_orders(&state.db, job_id, &changed).await?;
    }
    Ok(Json(questions))
}
