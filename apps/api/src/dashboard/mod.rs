//! Landing data for a signed-in user: which sections to show and whether to
//! nudge a candidate to finish their profile.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::applications::queries::get_candidate_applications;
use crate::auth::capabilities::Capabilities;
use crate::auth::session::Session;
use crate::errors::AppError;
use crate::profile::queries::get_profile;
use crate::state::AppState;

const CANDIDATE_SECTIONS: [&str; 8] = [
    "profile",
    "employment_history",
    "background_questions",
    "emergency_contacts",
    "documents",
    "authorizations",
    "jobs",
    "applications",
];

const MANAGER_SECTIONS: [&str; 3] = [
    "job_postings",
    "applications_dashboard",
    "candidates_dashboard",
];

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub capabilities: Capabilities,
    pub profile_complete: bool,
    pub show_complete_profile_prompt: bool,
    pub sections: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_application_count: Option<usize>,
}

/// Shown only to candidates whose profile has no completion timestamp.
pub fn show_complete_profile_prompt(capabilities: Capabilities, profile_complete: bool) -> bool {
    capabilities.is_candidate() && !profile_complete
}

/// Candidate sections first, then manager sections. No role, no sections.
pub fn sections_for(capabilities: Capabilities) -> Vec<&'static str> {
    let mut sections = Vec::new();
    if capabilities.is_candidate() {
        sections.extend(CANDIDATE_SECTIONS);
    }
    if capabilities.is_manager() {
        sections.extend(MANAGER_SECTIONS);
    }
    sections
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<DashboardResponse>, AppError> {
    let capabilities = session.capabilities;
    let profile_complete = get_profile(&state.db, session.user_id)
        .await?
        .is_some_and(|p| p.is_completed());

    let candidate_application_count = if capabilities.is_candidate() {
        Some(
            get_candidate_applications(&state.db, session.user_id)
                .await?
                .len(),
        )
    } else {
        None
    };

    Ok(Json(DashboardResponse {
        capabilities,
        profile_complete,
        show_complete_profile_prompt: show_complete_profile_prompt(capabilities, profile_complete),
        sections: sections_for(capabilities),
        candidate_application_count,
    }))
}
