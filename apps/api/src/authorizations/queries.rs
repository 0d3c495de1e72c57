use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Authorization, AuthorizationType};

pub async fn get_authorizations(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Authorization>, AppError> {
    Ok(sqlx::query_as::<_, Authorization>(
        "SELECT * FROM authorizations WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub struct SignatureAudit<'a> {
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

/// Upsert on (user_id, authorization_type). A row that is already signed keeps
/// its original timestamp and audit fields.
pub async fn sign_authorization(
    pool: &PgPool,
    user_id: Uuid,
    authorization_type: AuthorizationType,
    audit: SignatureAudit<'_>,
) -> Result<Authorization, AppError> {
    Ok(sqlx::query_as::<_, Authorization>(
        r#"
        INSERT INTO authorizations
            (user_id, authorization_type, signed, signed_at, ip_address, user_agent)
        VALUES ($1, $2, true, now(), $3, $4)
        ON CONFLICT (user_id, authorization_type) DO UPDATE
            SET signed = true,
                signed_at = COALESCE(authorizations.signed_at, EXCLUDED.signed_at),
                ip_address = CASE WHEN authorizations.signed
                                  THEN authorizations.ip_address
                                  ELSE EXCLUDED.ip_address END,
                user_agent = CASE WHEN authorizations.signed
                                  THEN authorizations.user_agent
                                  ELSE EXCLUDED.user_agent END,
                updated_at = CASE WHEN authorizations.signed
                                  THEN authorizations.updated_at
                                  ELSE now() END
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(authorization_type)
    .bind(audit.ip_address)
    .bind(audit.user_agent)
    .fetch_one(pool)
    .await?)
}
