use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub ssn: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub present_address_street: Option<String>,
    pub present_address_city: Option<String>,
    pub present_address_state: Option<String>,
    pub present_address_zip: Option<String>,
    pub cdl_number: Option<String>,
    pub cdl_state: Option<String>,
    pub cdl_expiration_date: Option<NaiveDate>,
    pub driving_experience_years: Option<i32>,
    pub driving_experience_miles: Option<i64>,
    pub driving_experience_equipment: Option<Vec<String>>,
    pub profile_completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_completed(&self) -> bool {
        self.profile_completed_at.is_some()
    }
}

/// The accumulated wizard form. Text inputs arrive as strings (possibly blank),
/// dates and numbers as optional values, mirroring what a form submits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    // Personal information
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub ssn: String,
    pub date_of_birth: Option<NaiveDate>,

    // Present address
    pub present_address_street: String,
    pub present_address_city: String,
    pub present_address_state: String,
    pub present_address_zip: String,

    // CDL information
    pub cdl_number: String,
    pub cdl_state: String,
    pub cdl_expiration_date: Option<NaiveDate>,

    // Driving experience
    pub driving_experience_years: Option<i32>,
    pub driving_experience_miles: Option<i64>,
    pub driving_experience_equipment: Vec<String>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ssn: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub present_address_street: Option<String>,
    pub present_address_city: Option<String>,
    pub present_address_state: Option<String>,
    pub present_address_zip: Option<String>,
    pub cdl_number: Option<String>,
    pub cdl_state: Option<String>,
    pub cdl_expiration_date: Option<NaiveDate>,
    pub driving_experience_years: Option<i32>,
    pub driving_experience_miles: Option<i64>,
    pub driving_experience_equipment: Option<Vec<String>>,
}

impl From<ProfileForm> for ProfilePatch {
    fn from(form: ProfileForm) -> Self {
        ProfilePatch {
            full_name: Some(form.full_name),
            email: Some(form.email),
            phone: Some(form.phone),
            ssn: Some(form.ssn),
            date_of_birth: form.date_of_birth,
            present_address_street: Some(form.present_address_street),
            present_address_city: Some(form.present_address_city),
            present_address_state: Some(form.present_address_state),
            present_address_zip: Some(form.present_address_zip),
            cdl_number: Some(form.cdl_number),
            cdl_state: Some(form.cdl_state),
            cdl_expiration_date: form.cdl_expiration_date,
            driving_experience_years: form.driving_experience_years,
            driving_experience_miles: form.driving_experience_miles,
            driving_experience_equipment: Some(form.driving_experience_equipment),
        }
    }
}
