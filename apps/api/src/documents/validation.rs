use uuid::Uuid;

use crate::errors::AppError;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// Size is checked before type, so an oversized file of the wrong type reports
/// the size problem.
pub fn validate_upload(size: usize, mime_type: &str) -> Result<(), AppError> {
    if size > MAX_DOCUMENT_BYTES {
        return Err(AppError::PayloadTooLarge(format!(
            "File size must be less than {}MB",
            MAX_DOCUMENT_BYTES / 1024 / 1024
        )));
    }
    if !ALLOWED_MIME_TYPES.contains(&mime_type) {
        return Err(AppError::UnsupportedMediaType(
            "File type not supported. Please upload PDF or image files.".to_string(),
        ));
    }
    Ok(())
}

/// Extension taken from the original file name, falling back to the MIME type
/// when the name has none.
fn extension(file_name: &str, mime_type: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => match mime_type {
            "application/pdf" => "pdf",
            "image/jpeg" => "jpg",
            "image/png" => "png",
            _ => "bin",
        }
        .to_string(),
    }
}

/// `{user_id}/{unix_millis}.{ext}`
pub fn storage_path(user_id: Uuid, unix_millis: i64, file_name: &str, mime_type: &str) -> String {
    format!(
        "{user_id}/{unix_millis}.{}",
        extension(file_name, mime_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types_at_limit() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_upload(MAX_DOCUMENT_BYTES, mime).is_ok());
        }
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = validate_upload(MAX_DOCUMENT_BYTES + 1, "application/pdf").unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(ref m) if m == "File size must be less than 10MB"));
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = validate_upload(1024, "image/gif").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_size_reported_before_type() {
        let err = validate_upload(MAX_DOCUMENT_BYTES * 2, "text/plain").unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_storage_path_uses_file_extension() {
        let user = Uuid::nil();
        assert_eq!(
            storage_path(user, 1_700_000_000_000, "CDL Front.PNG", "image/png"),
            format!("{user}/1700000000000.png")
        );
        assert_eq!(
            storage_path(user, 5, "license.scan.pdf", "application/pdf"),
            format!("{user}/5.pdf")
        );
    }

    #[test]
    fn test_storage_path_without_extension_uses_mime() {
        let user = Uuid::nil();
        assert_eq!(
            storage_path(user, 5, "scan", "image/jpeg"),
            format!("{user}/5.jpg")
        );
        assert_eq!(
            storage_path(user, 5, ".hidden", "application/pdf"),
            format!("{user}/5.pdf")
        );
    }
}
