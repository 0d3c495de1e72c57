use crate::errors::AppError;
use crate::models::application::ApplicationStatus;

/// Outcomes a manager can record. `submitted` is only ever set on creation.
pub const REVIEW_OUTCOMES: [ApplicationStatus; 4] = [
    ApplicationStatus::UnderReview,
    ApplicationStatus::Approved,
    ApplicationStatus::Rejected,
    ApplicationStatus::MoreInfoRequested,
];

/// Any outcome may follow any status, except re-applying the current one.
pub fn check_transition(
    current: ApplicationStatus,
    target: ApplicationStatus,
) -> Result<(), AppError> {
    if !REVIEW_OUTCOMES.contains(&target) {
        return Err(AppError::Validation(format!(
            "'{}' is not a review outcome",
            target.as_str()
        )));
    }
    if current == target {
        return Err(AppError::Conflict(format!(
            "Application is already {}",
            target.label()
        )));
    }
    Ok(())
}

/// What a review does to the stored notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesUpdate {
    Keep,
    Clear,
    Set(String),
}

impl NotesUpdate {
    /// Absent notes keep what is stored; a blank string clears it.
    pub fn from_request(notes: Option<String>) -> Self {
        match notes {
            None => NotesUpdate::Keep,
            Some(n) if n.trim().is_empty() => NotesUpdate::Clear,
            Some(n) => NotesUpdate::Set(n),
        }
    }

    /// `(replace, value)` for the `CASE WHEN` in the update statement.
    pub fn as_bind(&self) -> (bool, Option<&str>) {
        match self {
            NotesUpdate::Keep => (false, None),
            NotesUpdate::Clear => (true, None),
            NotesUpdate::Set(n) => (true, Some(n.as_str())),
        }
    }
}
