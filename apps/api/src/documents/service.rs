//! Upload and removal workflows. The blob store and the metadata table are
//! separate systems, so each workflow orders its two writes and cleans up
//! after a partial failure.

use std::future::Future;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::documents::queries::NewDocument;
use crate::documents::store::DocumentStore;
use crate::documents::validation::{storage_path, validate_upload};
use crate::errors::AppError;
use crate::models::candidate::{Document, DocumentType};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Validates, stores the blob, then records metadata via `record`. If recording
/// fails the blob is deleted again so no orphan is left behind. A storage path
/// that is already taken fails at `put`, so cleanup only ever removes the blob
/// this call wrote.
pub async fn upload_document<F, Fut>(
    store: &dyn DocumentStore,
    user_id: Uuid,
    document_type: DocumentType,
    file: UploadedFile,
    unix_millis: i64,
    record: F,
) -> Result<Document, AppError>
where
    F: FnOnce(NewDocument) -> Fut,
    Fut: Future<Output = Result<Document, AppError>>,
{
    validate_upload(file.bytes.len(), &file.mime_type)?;

    let path = storage_path(user_id, unix_millis, &file.file_name, &file.mime_type);
    let file_size = file.bytes.len() as i64;
    store.put(&path, file.bytes, &file.mime_type).await?;

    let new = NewDocument {
        user_id,
        document_type,
        file_name: file.file_name,
        file_path: path.clone(),
        file_size,
        mime_type: file.mime_type,
    };

    match record(new).await {
        Ok(document) => {
            info!(%user_id, path = %document.file_path, "Document uploaded");
            Ok(document)
        }
        Err(err) => {
            if let Err(cleanup) = store.delete(&path).await {
                warn!(%path, "Failed to remove orphaned document blob: {cleanup}");
            }
            Err(err)
        }
    }
}

/// Removes the blob then the metadata row. A blob failure is logged and the
/// row is still removed.
pub async fn remove_document<F, Fut>(
    store: &dyn DocumentStore,
    document: &Document,
    delete_row: F,
) -> Result<bool, AppError>
where
    F: FnOnce(Uuid) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    if let Err(err) = store.delete(&document.file_path).await {
        warn!(path = %document.file_path, "Failed to delete document blob: {err}");
    }
    delete_row(document.id).await
}
