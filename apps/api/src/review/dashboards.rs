//! Manager dashboards. Rows are loaded in full and filtered in memory; there
//! is no pagination.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{Application, ApplicationStatus};
use crate::models::profile::Profile;

pub const NO_APPLICATIONS: &str = "no_applications";

/// One application joined with its job title and the candidate's profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApplicationRow {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub application: Application,
    pub job_title: String,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobOption {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFilter {
    pub search: String,
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    #[serde(flatten)]
    pub profile: Profile,
    /// Status of the most recent application, or `no_applications`.
    pub application_status: String,
    pub application_count: usize,
}

/// Status query value: `all` or empty means no filter.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
            .map(Some)
            .map_err(|_| AppError::Validation(format!("Unknown status '{value}'"))),
    }
}

/// Case-insensitive substring match across the given fields. An empty term
/// matches everything.
pub fn matches_search(term: &str, fields: &[Option<&str>]) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

pub fn filter_applications(
    rows: &[ApplicationRow],
    filter: &ApplicationFilter,
) -> Vec<ApplicationRow> {
    rows.iter()
        .filter(|row| {
            matches_search(
                &filter.search,
                &[
                    row.candidate_name.as_deref(),
                    row.candidate_email.as_deref(),
                    Some(row.job_title.as_str()),
                ],
            )
        })
        .filter(|row| filter.status.map_or(true, |s| row.application.status == s))
        .filter(|row| filter.job_id.map_or(true, |j| row.application.job_id == j))
        .cloned()
        .collect()
}

/// Jobs that have at least one application, in first-seen order.
pub fn distinct_jobs(rows: &[ApplicationRow]) -> Vec<JobOption> {
    let mut jobs: Vec<JobOption> = Vec::new();
    for row in rows {
        if !jobs.iter().any(|j| j.id == row.application.job_id) {
            jobs.push(JobOption {
                id: row.application.job_id,
                title: row.job_title.clone(),
            });
        }
    }
    jobs
}

/// Pairs each profile with the status of its newest application.
pub fn summarize_candidates(
    profiles: Vec<Profile>,
    applications: &[Application],
) -> Vec<CandidateSummary> {
    let mut by_candidate: HashMap<Uuid, Vec<&Application>> = HashMap::new();
    for app in applications {
        by_candidate.entry(app.candidate_id).or_default().push(app);
    }

    profiles
        .into_iter()
        .map(|profile| {
            let apps = by_candidate.get(&profile.user_id);
            let latest = apps.and_then(|a| a.iter().max_by_key(|app| app.submitted_at));
            CandidateSummary {
                application_status: latest
                    .map_or(NO_APPLICATIONS, |app| app.status.as_str())
                    .to_string(),
                application_count: apps.map_or(0, Vec::len),
                profile,
            }
        })
        .collect()
}

/// `status` is an application status, `no_applications`, or `all`/empty.
pub fn filter_candidates(
    summaries: Vec<CandidateSummary>,
    search: &str,
    status: Option<&str>,
) -> Vec<CandidateSummary> {
    let status = status.map(str::trim).filter(|s| !s.is_empty() && *s != "all");
    summaries
        .into_iter()
        .filter(|c| {
            matches_search(
                search,
                &[
                    c.profile.full_name.as_deref(),
                    Some(c.profile.email.as_str()),
                    c.profile.phone.as_deref(),
                ],
            )
        })
        .filter(|c| status.map_or(true, |s| c.application_status == s))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn profile(name: &str, email: &str, phone: Option<&str>) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: Some(name.to_string()),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            ssn: None,
            date_of_birth: None,
            present_address_street: None,
            present_address_city: None,
            present_address_state: None,
            present_address_zip: None,
            cdl_number: None,
            cdl_state: None,
            cdl_expiration_date: None,
            driving_experience_years: None,
            driving_experience_miles: None,
            driving_experience_equipment: None,
            profile_completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn application(
        candidate: Uuid,
        job: Uuid,
        status: ApplicationStatus,
        days_ago: i64,
    ) -> Application {
        let at = Utc::now() - Duration::days(days_ago);
        Application {
            id: Uuid::new_v4(),
            job_id: job,
            candidate_id: candidate,
            status,
            submitted_at: at,
            reviewed_at: None,
            reviewed_by: None,
            notes: None,
            created_at: at,
            updated_at: at,
        }
    }

    fn row(app: Application, job_title: &str, name: &str, email: &str) -> ApplicationRow {
        ApplicationRow {
            application: app,
            job_title: job_title.to_string(),
            candidate_name: Some(name.to_string()),
            candidate_email: Some(email.to_string()),
        }
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("under_review")).unwrap(),
            Some(ApplicationStatus::UnderReview)
        );
        assert!(parse_status_filter(Some("hired")).is_err());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        assert!(matches_search("SMI", &[Some("Jo Smith"), None]));
        assert!(matches_search("", &[None]));
        assert!(!matches_search("zed", &[Some("Jo Smith"), Some("jo@x.io")]));
    }

    #[test]
    fn test_filter_applications_by_search_status_and_job() {
        let otr = Uuid::new_v4();
        let local = Uuid::new_v4();
        let rows = vec![
            row(
                application(Uuid::new_v4(), otr, ApplicationStatus::Submitted, 1),
                "OTR Driver",
                "Jo Smith",
                "jo@example.com",
            ),
            row(
                application(Uuid::new_v4(), local, ApplicationStatus::Approved, 2),
                "Local Delivery",
                "Sam Reyes",
                "sam@example.com",
            ),
        ];

        let by_title = filter_applications(
            &rows,
            &ApplicationFilter {
                search: "otr".into(),
                ..Default::default()
            },
        );
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].job_title, "OTR Driver");

        let by_status = filter_applications(
            &rows,
            &ApplicationFilter {
                status: Some(ApplicationStatus::Approved),
                ..Default::default()
            },
        );
        assert_eq!(by_status.len(), 1);
        assert_eq!(by_status[0].application.job_id, local);

        let by_job_and_email = filter_applications(
            &rows,
            &ApplicationFilter {
                search: "sam@".into(),
                job_id: Some(otr),
                ..Default::default()
            },
        );
        assert!(by_job_and_email.is_empty());

        assert_eq!(
            distinct_jobs(&rows),
            vec![
                JobOption {
                    id: otr,
                    title: "OTR Driver".into()
                },
                JobOption {
                    id: local,
                    title: "Local Delivery".into()
                },
            ]
        );
    }

    #[test]
    fn test_candidate_status_is_latest_application() {
        let jo = profile("Jo Smith", "jo@example.com", Some("555-0100"));
        let sam = profile("Sam Reyes", "sam@example.com", None);
        let job = Uuid::new_v4();
        let apps = vec![
            application(jo.user_id, job, ApplicationStatus::Rejected, 30),
            application(jo.user_id, Uuid::new_v4(), ApplicationStatus::UnderReview, 1),
        ];

        let summaries = summarize_candidates(vec![jo.clone(), sam.clone()], &apps);
        assert_eq!(summaries[0].application_status, "under_review");
        assert_eq!(summaries[0].application_count, 2);
        assert_eq!(summaries[1].application_status, NO_APPLICATIONS);
        assert_eq!(summaries[1].application_count, 0);

        let none = filter_candidates(summaries.clone(), "", Some(NO_APPLICATIONS));
        assert_eq!(none.len(), 1);
        assert_eq!(none[0].profile.user_id, sam.user_id);

        let by_phone = filter_candidates(summaries, "0100", Some("all"));
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].profile.user_id, jo.user_id);
    }
}
