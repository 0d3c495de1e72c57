use axum::{extract::State, Json};
use serde::Deserialize;

use crate::auth::session::Session;
use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileForm, ProfilePatch};
use crate::profile::completion::{
    load_completion_report, refresh_profile_completion, CompletionReport,
};
use crate::profile::queries::{get_profile, save_profile, update_profile};
use crate::profile::wizard::{advance, validate_form, validate_patch, StepOutcome, WizardStep};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ValidateStepRequest {
    pub step: u8,
    #[serde(default)]
    pub form: ProfileForm,
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Profile>, AppError> {
    get_profile(&state.db, session.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Profile for user", session.user_id))
}

/// POST /api/v1/profile/wizard/validate-step
pub async fn handle_validate_step(
    session: Session,
    Json(req): Json<ValidateStepRequest>,
) -> Result<Json<StepOutcome>, AppError> {
    let step = WizardStep::from_number(req.step)
        .ok_or_else(|| AppError::Validation(format!("Unknown wizard step {}", req.step)))?;
    let outcome = advance(step, &req.form);
    if !outcome.valid {
        tracing::debug!("Wizard step {} invalid for user {}", req.step, session.user_id);
    }
    Ok(Json(outcome))
}

/// PUT /api/v1/profile
/// Final wizard submission: the whole form is validated and stored in one update.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<ProfileForm>,
) -> Result<Json<Profile>, AppError> {
    if let Err((step, err)) = validate_form(&form) {
        return Err(AppError::Validation(format!(
            "Step {} ({}): {}: {}",
            step.number(),
            step.title(),
            err.field,
            err.message
        )));
    }

    let email = form.email.clone();
    let mut profile =
        save_profile(&state.db, session.user_id, &email, &ProfilePatch::from(form)).await?;
    tracing::info!("Profile saved for user {}", session.user_id);

    profile.profile_completed_at = refresh_profile_completion(&state.db, session.user_id).await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile
/// Fields that are sent must still satisfy the wizard's rules.
pub async fn handle_patch_profile(
    State(state): State<AppState>,
    session: Session,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, AppError> {
    validate_patch(&patch)
        .map_err(|err| AppError::Validation(format!("{}: {}", err.field, err.message)))?;

    let mut profile = update_profile(&state.db, session.user_id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Profile for user", session.user_id))?;

    profile.profile_completed_at = refresh_profile_completion(&state.db, session.user_id).await?;
    Ok(Json(profile))
}

/// GET /api/v1/profile/completion
pub async fn handle_completion(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CompletionReport>, AppError> {
    Ok(Json(
        load_completion_report(&state.db, session.user_id).await?,
    ))
}
