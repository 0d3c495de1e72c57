use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;

/// Blob storage for uploaded candidate documents, keyed by storage path.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new object. An existing object under `key` is never replaced;
    /// that case is a `Conflict`.
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Time-limited download URL for a stored object.
    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError>;
}

const PRECONDITION_FAILED: u16 = 412;

fn key_taken(key: &str) -> String {
    format!("A document is already stored at {key}; retry the upload")
}

pub struct S3DocumentStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Builds a client for MinIO (local) or AWS (production) from `Config`.
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "env",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        let s3 = aws_sdk_s3::config::Builder::from(&s3_config)
            .force_path_style(true)
            .build();

        info!(bucket = %config.s3_bucket, "S3 document store initialized");
        Self::new(aws_sdk_s3::Client::from_conf(s3), config.s3_bucket.clone())
    }
}

#[async_trait]
impl DocumentStore for S3DocumentStore {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .cache_control("max-age=3600")
            .if_none_match("*")
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                if status == Some(PRECONDITION_FAILED) {
                    AppError::Conflict(key_taken(key))
                } else {
                    AppError::Storage(format!("S3 upload of {key} failed: {e}"))
                }
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("S3 delete of {key} failed: {e}")))?;
        Ok(())
    }

    async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| AppError::Storage(format!("Invalid presign duration: {e}")))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::Storage(format!("Presigning {key} failed: {e}")))?;
        Ok(request.uri().to_string())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// In-process store with switchable failures for exercising error paths.
    #[derive(Default)]
    pub struct MemoryDocumentStore {
        objects: Mutex<HashMap<String, Bytes>>,
        pub fail_put: AtomicBool,
        pub fail_delete: AtomicBool,
        pub put_calls: AtomicUsize,
        pub delete_calls: AtomicUsize,
    }

    impl MemoryDocumentStore {
        pub fn contains(&self, key: &str) -> bool {
            self.objects.lock().unwrap().contains_key(key)
        }

        pub fn len(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryDocumentStore {
        async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), AppError> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_put.load(Ordering::SeqCst) {
                return Err(AppError::Storage("put failed".into()));
            }
            let mut objects = self.objects.lock().unwrap();
            if objects.contains_key(key) {
                return Err(AppError::Conflict(key_taken(key)));
            }
            objects.insert(key.to_string(), body);
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), AppError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(AppError::Storage("delete failed".into()));
            }
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }

        async fn presigned_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
            Ok(format!(
                "memory://documents/{key}?expires={}",
                expires_in.as_secs()
            ))
        }
    }
}
