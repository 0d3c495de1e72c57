use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::documents::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Object storage for uploaded documents. S3 in production, in-memory in tests.
    pub store: Arc<dyn DocumentStore>,
    pub config: Config,
}
