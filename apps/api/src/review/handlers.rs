use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::queries::{
    get_application, get_candidate_applications, ApplicationWithJob,
};
use crate::auth::session::ManagerSession;
use crate::authorizations::catalog::{all_signed, merge_signatures, AuthorizationView};
use crate::authorizations::queries::get_authorizations;
use crate::background::bank::{is_complete, merge_answers, QuestionView};
use crate::background::queries::get_background_questions;
use crate::contacts::queries::get_emergency_contacts;
use crate::documents::queries::get_documents;
use crate::employment::buckets::{partition_history, EmploymentBuckets};
use crate::employment::queries::get_employment_history;
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::candidate::{AddressHistory, Document, EmergencyContact};
use crate::models::profile::Profile;
use crate::profile::address_history::get_address_history;
use crate::profile::queries::{get_all_profiles, get_profile};
use crate::review::dashboards::{
    distinct_jobs, filter_applications, filter_candidates, parse_status_filter,
    summarize_candidates, ApplicationFilter, ApplicationRow, CandidateSummary, JobOption,
};
use crate::review::queries::{get_all_applications, get_application_rows, record_review};
use crate::review::transition::{check_transition, NotesUpdate};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub status: ApplicationStatus,
    /// Omit to keep the stored notes; send `""` to clear them.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ApplicationsQuery {
    #[serde(default)]
    pub search: String,
    pub status: Option<String>,
    pub job_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct CandidatesQuery {
    #[serde(default)]
    pub search: String,
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct ApplicationsDashboard {
    pub applications: Vec<ApplicationRow>,
    /// Filter choices, drawn from all applications regardless of filters.
    pub jobs: Vec<JobOption>,
}

#[derive(Serialize)]
pub struct CandidateBackground {
    pub questions: Vec<QuestionView>,
    pub complete: bool,
}

#[derive(Serialize)]
pub struct CandidateAuthorizations {
    pub authorizations: Vec<AuthorizationView>,
    pub all_signed: bool,
}

#[derive(Serialize)]
pub struct CandidateDetail {
    pub profile: Profile,
    pub address_history: Vec<AddressHistory>,
    pub employment: EmploymentBuckets,
    pub background: CandidateBackground,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub documents: Vec<Document>,
    pub authorizations: CandidateAuthorizations,
    pub applications: Vec<ApplicationWithJob>,
}

/// POST /api/v1/manager/applications/:id/review
pub async fn handle_review(
    State(state): State<AppState>,
    ManagerSession(manager): ManagerSession,
    Path(id): Path<Uuid>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<Application>, AppError> {
    let current = get_application(&state.db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))?;
    check_transition(current.status, req.status)?;

    let notes = NotesUpdate::from_request(req.notes);
    let updated = record_review(&state.db, id, req.status, manager.user_id, &notes)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))?;

    info!(
        application_id = %id,
        from = current.status.as_str(),
        to = updated.status.as_str(),
        reviewer = %manager.user_id,
        "Application reviewed"
    );
    Ok(Json(updated))
}

/// GET /api/v1/manager/applications
pub async fn handle_applications_dashboard(
    State(state): State<AppState>,
    _manager: ManagerSession,
    Query(params): Query<ApplicationsQuery>,
) -> Result<Json<ApplicationsDashboard>, AppError> {
    let filter = ApplicationFilter {
        search: params.search,
        status: parse_status_filter(params.status.as_deref())?,
        job_id: params.job_id,
    };
    let rows = get_application_rows(&state.db).await?;
    Ok(Json(ApplicationsDashboard {
        jobs: distinct_jobs(&rows),
        applications: filter_applications(&rows, &filter),
    }))
}

/// GET /api/v1/manager/candidates
pub async fn handle_candidates_dashboard(
    State(state): State<AppState>,
    _manager: ManagerSession,
    Query(params): Query<CandidatesQuery>,
) -> Result<Json<Vec<CandidateSummary>>, AppError> {
    let profiles = get_all_profiles(&state.db).await?;
    let applications = get_all_applications(&state.db).await?;
    let summaries = summarize_candidates(profiles, &applications);
    Ok(Json(filter_candidates(
        summaries,
        &params.search,
        params.status.as_deref(),
    )))
}

/// GET /api/v1/manager/candidates/:user_id
pub async fn handle_candidate_detail(
    State(state): State<AppState>,
    _manager: ManagerSession,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CandidateDetail>, AppError> {
    let profile = get_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Candidate", user_id))?;

    let db = &state.db;
    let (
        address_history,
        employment,
        background,
        contacts,
        documents,
        authorizations,
        applications,
    ) = tokio::try_join!(
        get_address_history(db, user_id),
        get_employment_history(db, user_id),
        get_background_questions(db, user_id),
        get_emergency_contacts(db, user_id),
        get_documents(db, user_id),
        get_authorizations(db, user_id),
        get_candidate_applications(db, user_id),
    )?;

    Ok(Json(CandidateDetail {
        profile,
        address_history,
        employment: partition_history(employment),
        background: CandidateBackground {
            complete: is_complete(background.iter().map(|b| b.question_number)),
            questions: merge_answers(&background),
        },
        emergency_contacts: contacts,
        documents,
        authorizations: CandidateAuthorizations {
            all_signed: all_signed(&authorizations),
            authorizations: merge_signatures(&authorizations),
        },
        applications,
    }))
}
