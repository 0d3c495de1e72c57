use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Document, DocumentType};

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub mime_type: String,
}

/// Newest first.
pub async fn get_documents(pool: &PgPool, user_id: Uuid) -> Result<Vec<Document>, AppError> {
    Ok(sqlx::query_as::<_, Document>(
        "SELECT * FROM documents WHERE user_id = $1 ORDER BY uploaded_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_document(pool: &PgPool, id: Uuid) -> Result<Option<Document>, AppError> {
    Ok(
        sqlx::query_as::<_, Document>("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn insert_document(pool: &PgPool, new: &NewDocument) -> Result<Document, AppError> {
    Ok(sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (user_id, document_type, file_name, file_path, file_size, mime_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(new.user_id)
    .bind(new.document_type)
    .bind(&new.file_name)
    .bind(&new.file_path)
    .bind(new.file_size)
    .bind(&new.mime_type)
    .fetch_one(pool)
    .await?)
}

pub async fn delete_document_row(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
