use axum::{
    extract::{Path, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use serde::Serialize;

use crate::auth::session::Session;
use crate::authorizations::catalog::{all_signed, merge_signatures, AuthorizationView};
use crate::authorizations::queries::{get_authorizations, sign_authorization, SignatureAudit};
use crate::errors::AppError;
use crate::models::candidate::{Authorization, AuthorizationType};
use crate::profile::completion::refresh_profile_completion;
use crate::state::AppState;

#[derive(Serialize)]
pub struct AuthorizationsResponse {
    pub authorizations: Vec<AuthorizationView>,
    pub all_signed: bool,
}

#[derive(Serialize)]
pub struct SignResponse {
    pub authorization: Authorization,
    pub all_signed: bool,
    pub profile_completed: bool,
}

/// First hop of `X-Forwarded-For`, falling back to `X-Real-IP`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::to_string)
}

/// GET /api/v1/authorizations
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<AuthorizationsResponse>, AppError> {
    let rows = get_authorizations(&state.db, session.user_id).await?;
    Ok(Json(AuthorizationsResponse {
        all_signed: all_signed(&rows),
        authorizations: merge_signatures(&rows),
    }))
}

/// POST /api/v1/authorizations/:authorization_type/sign
pub async fn handle_sign(
    State(state): State<AppState>,
    session: Session,
    Path(authorization_type): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SignResponse>, AppError> {
    let authorization_type: AuthorizationType = authorization_type
        .parse()
        .map_err(AppError::Validation)?;

    let ip_address = client_ip(&headers);
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    let authorization = sign_authorization(
        &state.db,
        session.user_id,
        authorization_type,
        SignatureAudit {
            ip_address: ip_address.as_deref(),
            user_agent,
        },
    )
    .await?;
    tracing::info!(
        "User {} signed {}",
        session.user_id,
        authorization_type.as_str()
    );

    let rows = get_authorizations(&state.db, session.user_id).await?;
    let completed_at = refresh_profile_completion(&state.db, session.user_id).await?;

    Ok(Json(SignResponse {
        authorization,
        all_signed: all_signed(&rows),
        profile_completed: completed_at.is_some(),
    }))
}
