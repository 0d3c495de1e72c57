use std::time::Duration;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::session::Session;
use crate::documents::queries::{delete_document_row, get_document, get_documents, insert_document};
use crate::documents::service::{remove_document, upload_document, UploadedFile};
use crate::errors::AppError;
use crate::models::candidate::{Document, DocumentType};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DocumentUrlResponse {
    pub url: String,
    pub expires_in_secs: u64,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Owners see their own documents; managers may see any candidate's.
async fn load_visible_document(
    state: &AppState,
    session: &Session,
    id: Uuid,
) -> Result<Document, AppError> {
    match get_document(&state.db, id).await? {
        Some(doc) if doc.user_id == session.user_id || session.capabilities.is_manager() => Ok(doc),
        _ => Err(AppError::not_found("Document", id)),
    }
}

/// GET /api/v1/documents
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(get_documents(&state.db, session.user_id).await?))
}

/// POST /api/v1/documents  (multipart: `file`, `document_type`)
pub async fn handle_upload(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut document_type: Option<DocumentType> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some(UploadedFile {
                    file_name,
                    mime_type,
                    bytes,
                });
            }
            Some("document_type") => {
                let raw = field.text().await.map_err(multipart_error)?;
                document_type = Some(raw.trim().parse().map_err(AppError::Validation)?);
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("file is required".to_string()))?;
    let document_type = document_type
        .ok_or_else(|| AppError::Validation("document_type is required".to_string()))?;

    let pool = &state.db;
    let document = upload_document(
        state.store.as_ref(),
        session.user_id,
        document_type,
        file,
        Utc::now().timestamp_millis(),
        |new| async move { insert_document(pool, &new).await },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let document = match get_document(&state.db, id).await? {
        Some(doc) if doc.user_id == session.user_id => doc,
        _ => return Err(AppError::not_found("Document", id)),
    };

    let pool = &state.db;
    let removed = remove_document(state.store.as_ref(), &document, |id| async move {
        delete_document_row(pool, id).await
    })
    .await?;

    if !removed {
        return Err(AppError::not_found("Document", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/documents/:id/url
pub async fn handle_url(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentUrlResponse>, AppError> {
    let document = load_visible_document(&state, &session, id).await?;
    let ttl = state.config.document_url_ttl_secs;
    let url = state
        .store
        .presigned_url(&document.file_path, Duration::from_secs(ttl))
        .await?;
    Ok(Json(DocumentUrlResponse {
        url,
        expires_in_secs: ttl,
    }))
}
