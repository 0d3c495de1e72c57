//! Four-step profile wizard.
//!
//! Advancing validates only the required inputs of the current step and reports
//! the first one that fails, with the message a browser would show for it.
//! Moving back never validates. Nothing is stored until the final submission,
//! which checks every step and persists the whole form at once.

use serde::Serialize;

use crate::models::profile::{ProfileForm, ProfilePatch};

pub const EQUIPMENT_TYPES: [&str; 8] = [
    "Straight Truck",
    "Tractor-Trailer",
    "Flatbed",
    "Refrigerated",
    "Tanker",
    "Doubles/Triples",
    "Hazmat",
    "Other",
];

const MSG_REQUIRED: &str = "Please fill out this field.";
const MSG_EMAIL: &str = "Please include an '@' in the email address.";
const MSG_NON_NEGATIVE: &str = "Value must be greater than or equal to 0.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    PersonalInformation,
    PresentAddress,
    CdlInformation,
    DrivingExperience,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::PersonalInformation,
        WizardStep::PresentAddress,
        WizardStep::CdlInformation,
        WizardStep::DrivingExperience,
    ];

    pub fn from_number(n: u8) -> Option<Self> {
        n.checked_sub(1)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    pub fn number(&self) -> u8 {
        match self {
            WizardStep::PersonalInformation => 1,
            WizardStep::PresentAddress => 2,
            WizardStep::CdlInformation => 3,
            WizardStep::DrivingExperience => 4,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::PersonalInformation => "Personal Information",
            WizardStep::PresentAddress => "Present Address",
            WizardStep::CdlInformation => "CDL Information",
            WizardStep::DrivingExperience => "Driving Experience",
        }
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn progress_percent(&self) -> u8 {
        ((self.number() as f32 / Self::ALL.len() as f32) * 100.0).round() as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        FieldError {
            field,
            message: message.to_string(),
        }
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        Err(FieldError::new(field, MSG_REQUIRED))
    } else {
        Ok(())
    }
}

fn require_present<T>(field: &'static str, value: &Option<T>) -> Result<(), FieldError> {
    value
        .as_ref()
        .map(|_| ())
        .ok_or_else(|| FieldError::new(field, MSG_REQUIRED))
}

fn check_equipment(equipment: &[String]) -> Result<(), FieldError> {
    match equipment
        .iter()
        .find(|e| !EQUIPMENT_TYPES.contains(&e.as_str()))
    {
        Some(unknown) => Err(FieldError {
            field: "driving_experience_equipment",
            message: format!("Unknown equipment type '{unknown}'"),
        }),
        None => Ok(()),
    }
}

fn require_non_negative(field: &'static str, value: Option<i64>) -> Result<(), FieldError> {
    match value {
        None => Err(FieldError::new(field, MSG_REQUIRED)),
        Some(v) if v < 0 => Err(FieldError::new(field, MSG_NON_NEGATIVE)),
        Some(_) => Ok(()),
    }
}

/// Checks the required inputs of one step, in display order, stopping at the
/// first failure.
pub fn validate_step(step: WizardStep, form: &ProfileForm) -> Result<(), FieldError> {
    match step {
        WizardStep::PersonalInformation => {
            require_text("full_name", &form.full_name)?;
            require_text("email", &form.email)?;
            if !form.email.contains('@') {
                return Err(FieldError::new("email", MSG_EMAIL));
            }
            require_text("phone", &form.phone)?;
            require_text("ssn", &form.ssn)?;
            require_present("date_of_birth", &form.date_of_birth)
        }
        WizardStep::PresentAddress => {
            require_text("present_address_street", &form.present_address_street)?;
            require_text("present_address_city", &form.present_address_city)?;
            require_text("present_address_state", &form.present_address_state)?;
            require_text("present_address_zip", &form.present_address_zip)
        }
        WizardStep::CdlInformation => {
            require_text("cdl_number", &form.cdl_number)?;
            require_text("cdl_state", &form.cdl_state)?;
            require_present("cdl_expiration_date", &form.cdl_expiration_date)
        }
        WizardStep::DrivingExperience => {
            require_non_negative(
                "driving_experience_years",
                form.driving_experience_years.map(i64::from),
            )?;
            require_non_negative("driving_experience_miles", form.driving_experience_miles)?;
            check_equipment(&form.driving_experience_equipment)
        }
    }
}

/// Final submission check across all steps; reports the first failing step.
pub fn validate_form(form: &ProfileForm) -> Result<(), (WizardStep, FieldError)> {
    WizardStep::ALL
        .iter()
        .try_for_each(|step| validate_step(*step, form).map_err(|e| (*step, e)))
}

/// Checks the fields a partial update carries. Absent fields are skipped; a
/// field that is sent may not blank out a required wizard value.
pub fn validate_patch(patch: &ProfilePatch) -> Result<(), FieldError> {
    let text_fields = [
        ("full_name", &patch.full_name),
        ("email", &patch.email),
        ("phone", &patch.phone),
        ("ssn", &patch.ssn),
        ("present_address_street", &patch.present_address_street),
        ("present_address_city", &patch.present_address_city),
        ("present_address_state", &patch.present_address_state),
        ("present_address_zip", &patch.present_address_zip),
        ("cdl_number", &patch.cdl_number),
        ("cdl_state", &patch.cdl_state),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            require_text(field, value)?;
        }
    }
    if patch.email.as_deref().is_some_and(|e| !e.contains('@')) {
        return Err(FieldError::new("email", MSG_EMAIL));
    }
    if patch.driving_experience_years.is_some_and(|v| v < 0) {
        return Err(FieldError::new("driving_experience_years", MSG_NON_NEGATIVE));
    }
    if patch.driving_experience_miles.is_some_and(|v| v < 0) {
        return Err(FieldError::new("driving_experience_miles", MSG_NON_NEGATIVE));
    }
    match &patch.driving_experience_equipment {
        Some(equipment) => check_equipment(equipment),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: u8,
    pub title: &'static str,
    pub valid: bool,
    /// Field to focus, when the step is invalid.
    pub first_invalid: Option<FieldError>,
    /// Step to show next; unchanged when invalid, `None` after the last step.
    pub next_step: Option<u8>,
    /// Going back is always allowed and never validates.
    pub previous_step: Option<u8>,
    pub progress_percent: u8,
}

pub fn advance(step: WizardStep, form: &ProfileForm) -> StepOutcome {
    let result = validate_step(step, form);
    let valid = result.is_ok();
    StepOutcome {
        step: step.number(),
        title: step.title(),
        valid,
        first_invalid: result.err(),
        next_step: if valid {
            step.next().map(|s| s.number())
        } else {
            Some(step.number())
        },
        previous_step: step.previous().map(|s| s.number()),
        progress_percent: step.progress_percent(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete_form() -> ProfileForm {
        ProfileForm {
            full_name: "Dana Hauler".into(),
            email: "dana@example.com".into(),
            phone: "555-0100".into(),
            ssn: "123-45-6789".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1985, 4, 12),
            present_address_street: "1 Depot Rd".into(),
            present_address_city: "Joliet".into(),
            present_address_state: "IL".into(),
            present_address_zip: "60431".into(),
            cdl_number: "D123456".into(),
            cdl_state: "IL".into(),
            cdl_expiration_date: NaiveDate::from_ymd_opt(2028, 1, 1),
            driving_experience_years: Some(7),
            driving_experience_miles: Some(650_000),
            driving_experience_equipment: vec!["Flatbed".into(), "Tanker".into()],
        }
    }

    #[test]
    fn test_step_numbers_round_trip() {
        for step in WizardStep::ALL {
            assert_eq!(WizardStep::from_number(step.number()), Some(step));
        }
        assert_eq!(WizardStep::from_number(0), None);
        assert_eq!(WizardStep::from_number(5), None);
        assert_eq!(WizardStep::DrivingExperience.next(), None);
        assert_eq!(WizardStep::PersonalInformation.previous(), None);
    }

    #[test]
    fn test_only_current_step_is_validated() {
        let mut form = complete_form();
        form.cdl_number.clear();
        // Step 3 is broken, but step 1 advances.
        assert!(validate_step(WizardStep::PersonalInformation, &form).is_ok());
        let outcome = advance(WizardStep::CdlInformation, &form);
        assert!(!outcome.valid);
        assert_eq!(outcome.next_step, Some(3));
        assert_eq!(outcome.first_invalid.unwrap().field, "cdl_number");
    }

    #[test]
    fn test_first_invalid_field_is_reported() {
        let mut form = complete_form();
        form.phone.clear();
        form.ssn.clear();
        let err = validate_step(WizardStep::PersonalInformation, &form).unwrap_err();
        assert_eq!(err.field, "phone");
        assert_eq!(err.message, MSG_REQUIRED);
    }

    #[test]
    fn test_email_needs_at_sign() {
        let mut form = complete_form();
        form.email = "dana.example.com".into();
        let err = validate_step(WizardStep::PersonalInformation, &form).unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, MSG_EMAIL);
    }

    #[test]
    fn test_negative_experience_rejected() {
        let mut form = complete_form();
        form.driving_experience_miles = Some(-1);
        let err = validate_step(WizardStep::DrivingExperience, &form).unwrap_err();
        assert_eq!(err.field, "driving_experience_miles");
        assert_eq!(err.message, MSG_NON_NEGATIVE);
    }

    #[test]
    fn test_unknown_equipment_rejected() {
        let mut form = complete_form();
        form.driving_experience_equipment.push("Hovercraft".into());
        assert!(validate_step(WizardStep::DrivingExperience, &form).is_err());
    }

    #[test]
    fn test_advance_moves_forward_and_finishes() {
        let form = complete_form();
        let first = advance(WizardStep::PersonalInformation, &form);
        assert!(first.valid);
        assert_eq!(first.next_step, Some(2));
        assert_eq!(first.progress_percent, 25);

        let last = advance(WizardStep::DrivingExperience, &form);
        assert!(last.valid);
        assert_eq!(last.next_step, None);
        assert_eq!(last.progress_percent, 100);
    }

    #[test]
    fn test_validate_form_reports_failing_step() {
        let mut form = complete_form();
        assert!(validate_form(&form).is_ok());

        form.present_address_zip = "  ".into();
        let (step, err) = validate_form(&form).unwrap_err();
        assert_eq!(step, WizardStep::PresentAddress);
        assert_eq!(err.field, "present_address_zip");
    }

    #[test]
    fn test_patch_checks_only_sent_fields() {
        assert!(validate_patch(&ProfilePatch::default()).is_ok());

        let patch = ProfilePatch {
            phone: Some("555-0199".into()),
            driving_experience_equipment: Some(vec!["Hazmat".into()]),
            ..ProfilePatch::default()
        };
        assert!(validate_patch(&patch).is_ok());
    }

    #[test]
    fn test_patch_cannot_blank_required_field() {
        let patch = ProfilePatch {
            cdl_number: Some("   ".into()),
            ..ProfilePatch::default()
        };
        let err = validate_patch(&patch).unwrap_err();
        assert_eq!(err.field, "cdl_number");
        assert_eq!(err.message, MSG_REQUIRED);

        let patch = ProfilePatch {
            email: Some("nobody".into()),
            ..ProfilePatch::default()
        };
        assert_eq!(validate_patch(&patch).unwrap_err().message, MSG_EMAIL);

        let patch = ProfilePatch {
            driving_experience_years: Some(-2),
            ..ProfilePatch::default()
        };
        assert_eq!(
            validate_patch(&patch).unwrap_err().field,
            "driving_experience_years"
        );
    }
}
