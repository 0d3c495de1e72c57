use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::session::Session;
use crate::contacts::queries::{
    add_emergency_contact, delete_emergency_contact, get_emergency_contacts,
    update_emergency_contact, ContactPatch, NewContact,
};
use crate::errors::AppError;
use crate::models::candidate::EmergencyContact;
use crate::profile::completion::refresh_profile_completion;
use crate::state::AppState;

fn validate_new(contact: &NewContact) -> Result<(), AppError> {
    let required = [
        ("full_name", &contact.full_name),
        ("address_city", &contact.address_city),
        ("address_state", &contact.address_state),
        ("address_zip", &contact.address_zip),
        ("relationship", &contact.relationship),
        ("phone", &contact.phone),
    ];
    match required.iter().find(|(_, v)| v.trim().is_empty()) {
        Some((field, _)) => Err(AppError::Validation(format!("{field} is required"))),
        None => Ok(()),
    }
}

/// Sent fields may not blank out a required value; `address_street` is optional.
fn validate_patch(patch: &ContactPatch) -> Result<(), AppError> {
    let required = [
        ("full_name", &patch.full_name),
        ("address_city", &patch.address_city),
        ("address_state", &patch.address_state),
        ("address_zip", &patch.address_zip),
        ("relationship", &patch.relationship),
        ("phone", &patch.phone),
    ];
    match required
        .iter()
        .find(|(_, v)| v.as_deref().is_some_and(|v| v.trim().is_empty()))
    {
        Some((field, _)) => Err(AppError::Validation(format!("{field} is required"))),
        None => Ok(()),
    }
}

/// GET /api/v1/emergency-contacts
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<EmergencyContact>>, AppError> {
    Ok(Json(
        get_emergency_contacts(&state.db, session.user_id).await?,
    ))
}

/// POST /api/v1/emergency-contacts
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<NewContact>,
) -> Result<(StatusCode, Json<EmergencyContact>), AppError> {
    validate_new(&req)?;
    let contact = add_emergency_contact(&state.db, session.user_id, &req).await?;

    refresh_profile_completion(&state.db, session.user_id).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// PATCH /api/v1/emergency-contacts/:id
pub async fn handle_update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<ContactPatch>,
) -> Result<Json<EmergencyContact>, AppError> {
    validate_patch(&req)?;
    update_emergency_contact(&state.db, session.user_id, id, &req)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Emergency contact", id))
}

/// DELETE /api/v1/emergency-contacts/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !delete_emergency_contact(&state.db, session.user_id, id).await? {
        return Err(AppError::not_found("Emergency contact", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
