pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::documents::validation::MAX_DOCUMENT_BYTES;
use crate::state::AppState;
use crate::{
    applications, auth, authorizations, background, contacts, dashboard, documents, employment,
    jobs, profile, review,
};

/// Room for the multipart framing and the `document_type` field on top of the file.
const UPLOAD_BODY_LIMIT: usize = MAX_DOCUMENT_BYTES + 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/me", get(auth::handlers::handle_me))
        .route("/api/v1/dashboard", get(dashboard::handle_dashboard))
        // Candidate profile
        .route(
            "/api/v1/profile",
            get(profile::handlers::handle_get_profile)
                .put(profile::handlers::handle_submit_profile)
                .patch(profile::handlers::handle_patch_profile),
        )
        .route(
            "/api/v1/profile/wizard/validate-step",
            post(profile::handlers::handle_validate_step),
        )
        .route(
            "/api/v1/profile/completion",
            get(profile::handlers::handle_completion),
        )
        .route(
            "/api/v1/address-history",
            get(profile::address_history::handle_list)
                .post(profile::address_history::handle_create),
        )
        .route(
            "/api/v1/address-history/:id",
            patch(profile::address_history::handle_update)
                .delete(profile::address_history::handle_delete),
        )
        .route(
            "/api/v1/employment-history",
            get(employment::handlers::handle_list).post(employment::handlers::handle_create),
        )
        .route(
            "/api/v1/employment-history/cdl",
            get(employment::handlers::handle_list_cdl),
        )
        .route(
            "/api/v1/employment-history/:id",
            patch(employment::handlers::handle_update)
                .delete(employment::handlers::handle_delete),
        )
        .route(
            "/api/v1/background-questions",
            get(background::handlers::handle_list),
        )
        .route(
            "/api/v1/background-questions/:number",
            put(background::handlers::handle_answer),
        )
        .route(
            "/api/v1/emergency-contacts",
            get(contacts::handlers::handle_list).post(contacts::handlers::handle_create),
        )
        .route(
            "/api/v1/emergency-contacts/:id",
            patch(contacts::handlers::handle_update)
                .delete(contacts::handlers::handle_delete),
        )
        .route(
            "/api/v1/documents",
            get(documents::handlers::handle_list)
                .post(documents::handlers::handle_upload)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/documents/:id",
            delete(documents::handlers::handle_delete),
        )
        .route(
            "/api/v1/documents/:id/url",
            get(documents::handlers::handle_url),
        )
        .route(
            "/api/v1/authorizations",
            get(authorizations::handlers::handle_list),
        )
        .route(
            "/api/v1/authorizations/:authorization_type/sign",
            post(authorizations::handlers::handle_sign),
        )
        // Jobs
        .route(
            "/api/v1/jobs",
            get(jobs::handlers::handle_list).post(jobs::handlers::handle_create),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handlers::handle_get)
                .put(jobs::handlers::handle_update)
                .delete(jobs::handlers::handle_delete),
        )
        .route(
            "/api/v1/jobs/:id/public",
            get(jobs::handlers::handle_get_public),
        )
        .route(
            "/api/v1/jobs/:id/questions/:question_id",
            delete(jobs::handlers::handle_delete_question),
        )
        .route(
            "/api/v1/jobs/:id/questions/:question_id/move",
            post(jobs::handlers::handle_move_question),
        )
        .route(
            "/api/v1/jobs/:id/apply",
            post(applications::handlers::handle_apply),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handlers::handle_list_mine),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handlers::handle_get),
        )
        // Manager
        .route(
            "/api/v1/manager/applications",
            get(review::handlers::handle_applications_dashboard),
        )
        .route(
            "/api/v1/manager/applications/:id/review",
            post(review::handlers::handle_review),
        )
        .route(
            "/api/v1/manager/candidates",
            get(review::handlers::handle_candidates_dashboard),
        )
        .route(
            "/api/v1/manager/candidates/:id",
            get(review::handlers::handle_candidate_detail),
        )
        .with_state(state)
}
