use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfilePatch};

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, AppError> {
    Ok(
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// All profiles, newest first. Every user with a profile row is listed as a candidate.
pub async fn get_all_profiles(pool: &PgPool) -> Result<Vec<Profile>, AppError> {
    Ok(
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY created_at DESC")
            .fetch_all(pool)
            .await?,
    )
}

/// Applies a partial update. Fields that are `None` keep their stored value.
/// Returns `None` when the user has no profile row.
pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> Result<Option<Profile>, AppError> {
    Ok(sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET
            full_name = COALESCE($2, full_name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            ssn = COALESCE($5, ssn),
            date_of_birth = COALESCE($6, date_of_birth),
            present_address_street = COALESCE($7, present_address_street),
            present_address_city = COALESCE($8, present_address_city),
            present_address_state = COALESCE($9, present_address_state),
            present_address_zip = COALESCE($10, present_address_zip),
            cdl_number = COALESCE($11, cdl_number),
            cdl_state = COALESCE($12, cdl_state),
            cdl_expiration_date = COALESCE($13, cdl_expiration_date),
            driving_experience_years = COALESCE($14, driving_experience_years),
            driving_experience_miles = COALESCE($15, driving_experience_miles),
            driving_experience_equipment = COALESCE($16, driving_experience_equipment),
            updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&patch.full_name)
    .bind(&patch.email)
    .bind(&patch.phone)
    .bind(&patch.ssn)
    .bind(patch.date_of_birth)
    .bind(&patch.present_address_street)
    .bind(&patch.present_address_city)
    .bind(&patch.present_address_state)
    .bind(&patch.present_address_zip)
    .bind(&patch.cdl_number)
    .bind(&patch.cdl_state)
    .bind(patch.cdl_expiration_date)
    .bind(patch.driving_experience_years)
    .bind(patch.driving_experience_miles)
    .bind(&patch.driving_experience_equipment)
    .fetch_optional(pool)
    .await?)
}

/// Creates the profile row if the auth provider has not, then applies the patch.
pub async fn save_profile(
    pool: &PgPool,
    user_id: Uuid,
    email: &str,
    patch: &ProfilePatch,
) -> Result<Profile, AppError> {
    sqlx::query(
        "INSERT INTO profiles (user_id, email) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(email)
    .execute(pool)
    .await?;

    update_profile(pool, user_id, patch)
        .await?
        .ok_or_else(|| AppError::not_found("Profile for user", user_id))
}

/// Sets `profile_completed_at` once; later calls keep the first timestamp.
pub async fn mark_profile_completed(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<Profile>, AppError> {
    Ok(sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles
        SET profile_completed_at = COALESCE(profile_completed_at, now()),
            updated_at = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    async fn test_completion_timestamp_set_once(pool: PgPool) {
        let user = Uuid::new_v4();
        assert!(mark_profile_completed(&pool, user).await.unwrap().is_none());

        save_profile(&pool, user, "dana@example.com", &ProfilePatch::default())
            .await
            .unwrap();
        let first = mark_profile_completed(&pool, user)
            .await
            .unwrap()
            .and_then(|p| p.profile_completed_at)
            .unwrap();
        let second = mark_profile_completed(&pool, user)
            .await
            .unwrap()
            .and_then(|p| p.profile_completed_at)
            .unwrap();
        assert_eq!(first, second);
    }

    #[sqlx::test]
    async fn test_patch_keeps_unsent_fields(pool: PgPool) {
        let user = Uuid::new_v4();
        let patch = ProfilePatch {
            full_name: Some("Dana Hauler".into()),
            cdl_state: Some("IL".into()),
            ..ProfilePatch::default()
        };
        save_profile(&pool, user, "dana@example.com", &patch).await.unwrap();

        let updated = update_profile(
            &pool,
            user,
            &ProfilePatch {
                cdl_state: Some("WI".into()),
                ..ProfilePatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(updated.full_name.as_deref(), Some("Dana Hauler"));
        assert_eq!(updated.cdl_state.as_deref(), Some("WI"));
        assert_eq!(updated.email, "dana@example.com");
    }
}
