//! Profile completion gate.
//!
//! `profile_completed_at` is stamped the first time every required section is
//! satisfied: wizard fields, all background questions, at least one emergency
//! contact and all four authorizations. Employment history and documents are
//! reported but do not gate completion.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::authorizations::catalog::all_signed;
use crate::authorizations::queries::get_authorizations;
use crate::background::bank::is_complete;
use crate::background::queries::get_background_questions;
use crate::contacts::queries::count_emergency_contacts;
use crate::documents::queries::get_documents;
use crate::employment::queries::get_employment_history;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::queries::{get_profile, mark_profile_completed};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CompletionReport {
    pub personal_information: bool,
    pub background_questions: bool,
    pub emergency_contacts: bool,
    pub authorizations: bool,
    pub employment_history_count: usize,
    pub document_count: usize,
    /// All gating sections satisfied.
    pub ready: bool,
    pub profile_completed_at: Option<DateTime<Utc>>,
}

/// Inputs gathered from the candidate's rows.
pub struct CompletionInputs<'a> {
    pub profile: Option<&'a Profile>,
    pub background_complete: bool,
    pub emergency_contact_count: i64,
    pub authorizations_signed: bool,
    pub employment_history_count: usize,
    pub document_count: usize,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// The wizard's required fields are all stored.
pub fn wizard_fields_present(profile: &Profile) -> bool {
    filled(&profile.full_name)
        && !profile.email.trim().is_empty()
        && filled(&profile.phone)
        && filled(&profile.ssn)
        && profile.date_of_birth.is_some()
        && filled(&profile.present_address_street)
        && filled(&profile.present_address_city)
        && filled(&profile.present_address_state)
        && filled(&profile.present_address_zip)
        && filled(&profile.cdl_number)
        && filled(&profile.cdl_state)
        && profile.cdl_expiration_date.is_some()
        && profile.driving_experience_years.is_some()
        && profile.driving_experience_miles.is_some()
}

pub fn evaluate(inputs: &CompletionInputs<'_>) -> CompletionReport {
    let personal_information = inputs.profile.map(wizard_fields_present).unwrap_or(false);
    let emergency_contacts = inputs.emergency_contact_count > 0;
    let ready = personal_information
        && inputs.background_complete
        && emergency_contacts
        && inputs.authorizations_signed;

    CompletionReport {
        personal_information,
        background_questions: inputs.background_complete,
        emergency_contacts,
        authorizations: inputs.authorizations_signed,
        employment_history_count: inputs.employment_history_count,
        document_count: inputs.document_count,
        ready,
        profile_completed_at: inputs.profile.and_then(|p| p.profile_completed_at),
    }
}

pub async fn load_completion_report(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<CompletionReport, AppError> {
    let profile = get_profile(pool, user_id).await?;
    let background = get_background_questions(pool, user_id).await?;
    let contacts = count_emergency_contacts(pool, user_id).await?;
    let authorizations = get_authorizations(pool, user_id).await?;
    let employment = get_employment_history(pool, user_id).await?;
    let documents = get_documents(pool, user_id).await?;

    Ok(evaluate(&CompletionInputs {
        profile: profile.as_ref(),
        background_complete: is_complete(background.iter().map(|b| b.question_number)),
        emergency_contact_count: contacts,
        authorizations_signed: all_signed(&authorizations),
        employment_history_count: employment.len(),
        document_count: documents.len(),
    }))
}

/// Stamps `profile_completed_at` when the gate is satisfied for the first time.
/// Returns the completion timestamp, if any.
pub async fn refresh_profile_completion(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let report = load_completion_report(pool, user_id).await?;
    if report.profile_completed_at.is_some() || !report.ready {
        return Ok(report.profile_completed_at);
    }

    let profile = mark_profile_completed(pool, user_id).await?;
    info!("Profile completed for user {user_id}");
    Ok(profile.and_then(|p| p.profile_completed_at))
}
