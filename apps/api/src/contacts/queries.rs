use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::contacts::roster::next_order;
use crate::errors::AppError;
use crate::models::candidate::EmergencyContact;

#[derive(Debug, Deserialize)]
pub struct NewContact {
    pub full_name: String,
    pub address_street: Option<String>,
    pub address_city: String,
    pub address_state: String,
    pub address_zip: String,
    pub relationship: String,
    pub phone: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactPatch {
    pub full_name: Option<String>,
    pub address_street: Option<String>,
    pub address_city: Option<String>,
    pub address_state: Option<String>,
    pub address_zip: Option<String>,
    pub relationship: Option<String>,
    pub phone: Option<String>,
}

pub async fn get_emergency_contacts(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmergencyContact>, AppError> {
    Ok(sqlx::query_as::<_, EmergencyContact>(
        r#"SELECT * FROM emergency_contacts WHERE user_id = $1 ORDER BY "order" ASC"#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn count_emergency_contacts(pool: &PgPool, user_id: Uuid) -> Result<i64, AppError> {
    Ok(
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM emergency_contacts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?,
    )
}

/// Adds a contact unless the user already has the maximum. The count and the
/// insert run under a per-user advisory lock so concurrent adds cannot overshoot.
pub async fn add_emergency_contact(
    pool: &PgPool,
    user_id: Uuid,
    new: &NewContact,
) -> Result<EmergencyContact, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM emergency_contacts WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
    let order = next_order(count).map_err(AppError::Conflict)?;

    let contact = sqlx::query_as::<_, EmergencyContact>(
        r#"
        INSERT INTO emergency_contacts
            (user_id, full_name, address_street, address_city, address_state, address_zip,
             relationship, phone, "order")
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&new.full_name)
    .bind(&new.address_street)
    .bind(&new.address_city)
    .bind(&new.address_state)
    .bind(&new.address_zip)
    .bind(&new.relationship)
    .bind(&new.phone)
    .bind(order)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(contact)
}

pub async fn update_emergency_contact(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
    patch: &ContactPatch,
) -> Result<Option<EmergencyContact>, AppError> {
    Ok(sqlx::query_as::<_, EmergencyContact>(
        r#"
        UPDATE emergency_contacts SET
            full_name = COALESCE($3, full_name),
            address_street = COALESCE($4, address_street),
            address_city = COALESCE($5, address_city),
            address_state = COALESCE($6, address_state),
            address_zip = COALESCE($7, address_zip),
            relationship = COALESCE($8, relationship),
            phone = COALESCE($9, phone),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&patch.full_name)
    .bind(&patch.address_street)
    .bind(&patch.address_city)
    .bind(&patch.address_state)
    .bind(&patch.address_zip)
    .bind(&patch.relationship)
    .bind(&patch.phone)
    .fetch_optional(pool)
    .await?)
}

/// Remaining contacts keep their `order` values.
pub async fn delete_emergency_contact(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM emergency_contacts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str) -> NewContact {
        NewContact {
            full_name: name.to_string(),
            address_street: None,
            address_city: "Joliet".into(),
            address_state: "IL".into(),
            address_zip: "60431".into(),
            relationship: "Sibling".into(),
            phone: "555-0101".into(),
        }
    }

    #[sqlx::test]
    async fn test_fourth_contact_rejected(pool: PgPool) {
        let user = Uuid::new_v4();
        for (i, name) in ["Ana", "Ben", "Cy"].into_iter().enumerate() {
            let added = add_emergency_contact(&pool, user, &contact(name)).await.unwrap();
            assert_eq!(added.order, i as i32);
        }

        let fourth = add_emergency_contact(&pool, user, &contact("Dee")).await;
        assert!(matches!(fourth, Err(AppError::Conflict(_))));
        assert_eq!(count_emergency_contacts(&pool, user).await.unwrap(), 3);
    }

    #[sqlx::test]
    async fn test_concurrent_adds_respect_cap(pool: PgPool) {
        let user = Uuid::new_v4();
        let tasks: Vec<_> = (0..6)
            .map(|i| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    add_emergency_contact(&pool, user, &contact(&format!("Contact {i}"))).await
                })
            })
            .collect();

        let mut added = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                added += 1;
            }
        }
        assert_eq!(added, 3);
        assert_eq!(count_emergency_contacts(&pool, user).await.unwrap(), 3);
    }

    #[sqlx::test]
    async fn test_delete_leaves_order_gap(pool: PgPool) {
        let user = Uuid::new_v4();
        let first = add_emergency_contact(&pool, user, &contact("Ana")).await.unwrap();
        add_emergency_contact(&pool, user, &contact("Ben")).await.unwrap();

        assert!(delete_emergency_contact(&pool, user, first.id).await.unwrap());
        let third = add_emergency_contact(&pool, user, &contact("Cy")).await.unwrap();

        let orders: Vec<i32> = get_emergency_contacts(&pool, user)
            .await
            .unwrap()
            .iter()
            .map(|c| c.order)
            .collect();
        // New contacts take the current count as their order.
        assert_eq!(third.order, 1);
        assert_eq!(orders, vec![1, 1]);
    }
}
