use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::capabilities::Capabilities;
use crate::auth::{bearer_token, verify_token};
use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

/// The authenticated caller of one request.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub capabilities: Capabilities,
}

/// A session whose capabilities include `manager`.
#[derive(Debug, Clone)]
pub struct ManagerSession(pub Session);

pub async fn get_user_roles(pool: &PgPool, user_id: Uuid) -> Result<Vec<Role>, AppError> {
    Ok(
        sqlx::query_scalar::<_, Role>("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(pool)
            .await?,
    )
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;
        let token = bearer_token(header).ok_or(AppError::Unauthorized)?;
        let claims = verify_token(token, &state.config.jwt_secret)?;

        let roles = get_user_roles(&state.db, claims.sub).await?;

        Ok(Session {
            user_id: claims.sub,
            email: claims.email,
            capabilities: Capabilities::from_roles(&roles),
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ManagerSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let session = Session::from_request_parts(parts, state).await?;
        if !session.capabilities.is_manager() {
            return Err(AppError::Forbidden("Manager access required".to_string()));
        }
        Ok(ManagerSession(session))
    }
}
