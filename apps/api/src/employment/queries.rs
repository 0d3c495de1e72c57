use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::EmploymentHistory;
use crate::profile::address_history::validate_range;

#[derive(Debug, Deserialize)]
pub struct NewEmployment {
    pub company_name: String,
    pub company_address_street: Option<String>,
    pub company_address_city: Option<String>,
    pub company_address_state: Option<String>,
    pub company_address_zip: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_phone: Option<String>,
    pub supervisor_email: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub reason_for_leaving: Option<String>,
    #[serde(default)]
    pub cdl_required: bool,
    #[serde(default)]
    pub is_cdl_employment: bool,
}

/// Update payload. `is_cdl_employment` is deliberately absent: the bucket is
/// fixed when the record is created.
#[derive(Debug, Default, Deserialize)]
pub struct EmploymentPatch {
    pub company_name: Option<String>,
    pub company_address_street: Option<String>,
    pub company_address_city: Option<String>,
    pub company_address_state: Option<String>,
    pub company_address_zip: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_phone: Option<String>,
    pub supervisor_email: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason_for_leaving: Option<String>,
    pub cdl_required: Option<bool>,
}

impl EmploymentPatch {
    /// Validates the patch merged over the stored record, so a lone `end_date`
    /// is still compared with the stored `start_date`.
    pub fn check_against(&self, existing: &EmploymentHistory) -> Result<(), AppError> {
        if self
            .company_name
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(AppError::Validation("company_name is required".to_string()));
        }
        validate_range(
            self.start_date.unwrap_or(existing.start_date),
            self.end_date.or(existing.end_date),
        )
    }
}

pub async fn get_employment_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmploymentHistory>, AppError> {
    Ok(sqlx::query_as::<_, EmploymentHistory>(
        "SELECT * FROM employment_history WHERE user_id = $1 ORDER BY start_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_cdl_employment_history(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmploymentHistory>, AppError> {
    Ok(sqlx::query_as::<_, EmploymentHistory>(
        r#"
        SELECT * FROM employment_history
        WHERE user_id = $1 AND is_cdl_employment = true
        ORDER BY start_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_employment_record(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<EmploymentHistory>, AppError> {
    Ok(sqlx::query_as::<_, EmploymentHistory>(
        "SELECT * FROM employment_history WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

pub async fn add_employment_history(
    pool: &PgPool,
    user_id: Uuid,
    new: &NewEmployment,
) -> Result<EmploymentHistory, AppError> {
    Ok(sqlx::query_as::<_, EmploymentHistory>(
        r#"
        INSERT INTO employment_history
            (user_id, company_name, company_address_street, company_address_city,
             company_address_state, company_address_zip, supervisor_name, supervisor_phone,
             supervisor_email, start_date, end_date, reason_for_leaving, cdl_required,
             is_cdl_employment)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new.company_name)
    .bind(&new.company_address_street)
    .bind(&new.company_address_city)
    .bind(&new.company_address_state)
    .bind(&new.company_address_zip)
    .bind(&new.supervisor_name)
    .bind(&new.supervisor_phone)
    .bind(&new.supervisor_email)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(&new.reason_for_leaving)
    .bind(new.cdl_required)
    .bind(new.is_cdl_employment)
    .fetch_one(pool)
    .await?)
}

pub async fn update_employment_history(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: &EmploymentPatch,
) -> Result<Option<EmploymentHistory>, AppError> {
    Ok(sqlx::query_as::<_, EmploymentHistory>(
        r#"
        UPDATE employment_history SET
            company_name = COALESCE($3, company_name),
            company_address_street = COALESCE($4, company_address_street),
            company_address_city = COALESCE($5, company_address_city),
            company_address_state = COALESCE($6, company_address_state),
            company_address_zip = COALESCE($7, company_address_zip),
            supervisor_name = COALESCE($8, supervisor_name),
            supervisor_phone = COALESCE($9, supervisor_phone),
            supervisor_email = COALESCE($10, supervisor_email),
            start_date = COALESCE($11, start_date),
            end_date = COALESCE($12, end_date),
            reason_for_leaving = COALESCE($13, reason_for_leaving),
            cdl_required = COALESCE($14, cdl_required),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&patch.company_name)
    .bind(&patch.company_address_street)
    .bind(&patch.company_address_city)
    .bind(&patch.company_address_state)
    .bind(&patch.company_address_zip)
    .bind(&patch.supervisor_name)
    .bind(&patch.supervisor_phone)
    .bind(&patch.supervisor_email)
    .bind(patch.start_date)
    .bind(patch.end_date)
    .bind(&patch.reason_for_leaving)
    .bind(patch.cdl_required)
    .fetch_optional(pool)
    .await?)
}

/// Returns false when no row matched.
pub async fn delete_employment_history(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM employment_history WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employment::buckets::tests::record;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_lone_end_date_checked_against_stored_start() {
        let existing = record("Acme Freight", 2020, true);

        let backwards = EmploymentPatch {
            end_date: Some(date(2010, 1, 1)),
            ..EmploymentPatch::default()
        };
        assert!(matches!(
            backwards.check_against(&existing),
            Err(AppError::Validation(_))
        ));

        let forwards = EmploymentPatch {
            end_date: Some(date(2022, 6, 30)),
            ..EmploymentPatch::default()
        };
        assert!(forwards.check_against(&existing).is_ok());
    }

    #[test]
    fn test_lone_start_date_checked_against_stored_end() {
        let mut existing = record("Acme Freight", 2020, false);
        existing.end_date = Some(date(2021, 1, 1));

        let patch = EmploymentPatch {
            start_date: Some(date(2023, 1, 1)),
            ..EmploymentPatch::default()
        };
        assert!(patch.check_against(&existing).is_err());
    }

    #[test]
    fn test_blank_company_name_rejected() {
        let patch = EmploymentPatch {
            company_name: Some(" ".into()),
            ..EmploymentPatch::default()
        };
        assert!(patch
            .check_against(&record("Acme Freight", 2020, false))
            .is_err());
    }

    #[sqlx::test]
    async fn test_update_keeps_cdl_flag_and_merges_fields(pool: PgPool) {
        let user = Uuid::new_v4();
        let created = add_employment_history(
            &pool,
            user,
            &NewEmployment {
                company_name: "Acme Freight".into(),
                company_address_street: None,
                company_address_city: Some("Joliet".into()),
                company_address_state: Some("IL".into()),
                company_address_zip: None,
                supervisor_name: None,
                supervisor_phone: None,
                supervisor_email: None,
                start_date: date(2020, 1, 1),
                end_date: None,
                reason_for_leaving: None,
                cdl_required: true,
                is_cdl_employment: true,
            },
        )
        .await
        .unwrap();

        let patch = EmploymentPatch {
            end_date: Some(date(2022, 3, 1)),
            ..EmploymentPatch::default()
        };
        let stored = get_employment_record(&pool, user, created.id)
            .await
            .unwrap()
            .unwrap();
        patch.check_against(&stored).unwrap();

        let updated = update_employment_history(&pool, user, created.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.start_date, date(2020, 1, 1));
        assert_eq!(updated.end_date, Some(date(2022, 3, 1)));
        assert_eq!(updated.company_address_city.as_deref(), Some("Joliet"));
        assert!(updated.is_cdl_employment);

        // Another user cannot see the record.
        assert!(get_employment_record(&pool, Uuid::new_v4(), created.id)
            .await
            .unwrap()
            .is_none());
    }
}
