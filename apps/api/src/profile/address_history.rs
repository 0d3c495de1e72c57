//! Prior residential addresses of a candidate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::session::Session;
use crate::errors::AppError;
use crate::models::candidate::AddressHistory;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NewAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddressPatch {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

pub(crate) fn validate_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), AppError> {
    match end {
        Some(end) if end < start => Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        )),
        _ => Ok(()),
    }
}

pub async fn get_address_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AddressHistory>, AppError> {
    Ok(sqlx::query_as::<_, AddressHistory>(
        "SELECT * FROM address_history WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

/// GET /api/v1/address-history
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<AddressHistory>>, AppError> {
    Ok(Json(get_address_history(&state.db, session.user_id).await?))
}

/// POST /api/v1/address-history
pub async fn handle_create(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<NewAddress>,
) -> Result<(StatusCode, Json<AddressHistory>), AppError> {
    validate_range(req.start_date, req.end_date)?;
    let row = sqlx::query_as::<_, AddressHistory>(
        r#"
        INSERT INTO address_history (user_id, street, city, state, zip, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(session.user_id)
    .bind(&req.street)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.zip)
    .bind(req.start_date)
    .bind(req.end_date)
    .fetch_one(&state.db)
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/address-history/:id
pub async fn handle_update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
    Json(req): Json<AddressPatch>,
) -> Result<Json<AddressHistory>, AppError> {
    let existing = sqlx::query_as::<_, AddressHistory>(
        "SELECT * FROM address_history WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(session.user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::not_found("Address", id))?;
    validate_range(
        req.start_date.unwrap_or(existing.start_date),
        req.end_date.or(existing.end_date),
    )?;

    let row = sqlx::query_as::<_, AddressHistory>(
        r#"
        UPDATE address_history SET
            street = COALESCE($3, street),
            city = COALESCE($4, city),
            state = COALESCE($5, state),
            zip = COALESCE($6, zip),
            start_date = COALESCE($7, start_date),
            end_date = COALESCE($8, end_date),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(session.user_id)
    .bind(&req.street)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.zip)
    .bind(req.start_date)
    .bind(req.end_date)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::not_found("Address", id))?;
    Ok(Json(row))
}

/// DELETE /api/v1/address-history/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM address_history WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(session.user_id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Address", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_range() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert!(validate_range(start, None).is_ok());
        assert!(validate_range(start, Some(start)).is_ok());
        assert!(validate_range(start, NaiveDate::from_ymd_opt(2019, 12, 31)).is_err());
    }
}
