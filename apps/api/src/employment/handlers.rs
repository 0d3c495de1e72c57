use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::session::Session;
use crate::employment::buckets::{partition_history, EmploymentBuckets};
use crate::employment::queries::{
    add_employment_history, delete_employment_history, get_cdl_employment_history,
    get_employment_history, get_employment_record, update_employment_history, EmploymentPatch,
    NewEmployment,
};
use crate::errors::AppError;
use crate::models::candidate::EmploymentHistory;
use crate::profile::address_history::validate_range;
use crate::state::AppState;

/// GET /api/v1/employment-history
/// Fetched once and split into the two lists by flag.
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<EmploymentBuckets>, AppError> {
    let history = get_employment_history(&state.db, session.user_id).await?;
    Ok(Json(partition_history(history)))
}

/// GET /api/v1/employment-history/cdl
pub async fn handle_list_cdl(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<EmploymentHistory>>, AppError> {
    Ok(Json(
        get_cdl_employment_history(&state.db, session.user_id).await?,
    ))
}

/// POST /api/v1/employment-history
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<NewEmployment>,
) -> Result<(StatusCode, Json<EmploymentHistory>), AppError> {
    if req.company_name.trim().is_empty() {
        return Err(AppError::Validation("company_name is required".to_string()));
    }
    validate_range(req.start_date, req.end_date)?;
    let record = add_employment_history(&state.db, session.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PATCH /api/v1/employment-history/:id
pub async fn handle_update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<EmploymentPatch>,
) -> Result<Json<EmploymentHistory>, AppError> {
    let existing = get_employment_record(&state.db, session.user_id, id)
        .await?
        .ok_or_else(|| AppError::not_found("Employment record", id))?;
    req.check_against(&existing)?;

    update_employment_history(&state.db, session.user_id, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Employment record", id))
}

/// DELETE /api/v1/employment-history/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_employment_history(&state.db, session.user_id, id).await? {
        return Err(AppError::not_found("Employment record", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
