//! Rows owned by a candidate's screening file: address and employment history,
//! background answers, emergency contacts, documents and signed authorizations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AddressHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmploymentHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub company_address_street: Option<String>,
    pub company_address_city: Option<String>,
    pub company_address_state: Option<String>,
    pub company_address_zip: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_phone: Option<String>,
    pub supervisor_email: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub reason_for_leaving: Option<String>,
    pub cdl_required: bool,
    /// Chosen when the record is created; never changed afterwards.
    pub is_cdl_employment: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BackgroundQuestion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question_number: i32,
    pub answer: bool,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmergencyContact {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub address_street: Option<String>,
    pub address_city: String,
    pub address_state: String,
    pub address_zip: String,
    pub relationship: String,
    pub phone: String,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Resume,
    CdlLicense,
    Certification,
    Other,
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocumentType::Resume),
            "cdl_license" => Ok(DocumentType::CdlLicense),
            "certification" => Ok(DocumentType::Certification),
            "other" => Ok(DocumentType::Other),
            other => Err(format!("Unknown document type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    pub document_type: DocumentType,
    pub file_name: String,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "authorization_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationType {
    ApplicantCertification,
    FmcsaClearinghouse,
    HirerightBackground,
    PspAuthorization,
}

impl AuthorizationType {
    pub const ALL: [AuthorizationType; 4] = [
        AuthorizationType::ApplicantCertification,
        AuthorizationType::FmcsaClearinghouse,
        AuthorizationType::HirerightBackground,
        AuthorizationType::PspAuthorization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorizationType::ApplicantCertification => "applicant_certification",
            AuthorizationType::FmcsaClearinghouse => "fmcsa_clearinghouse",
            AuthorizationType::HirerightBackground => "hireright_background",
            AuthorizationType::PspAuthorization => "psp_authorization",
        }
    }
}

impl std::str::FromStr for AuthorizationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthorizationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Unknown authorization type '{s}'"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Authorization {
    pub id: Uuid,
    pub user_id: Uuid,
    pub authorization_type: AuthorizationType,
    pub signed: bool,
    pub signed_at: Option<DateTime<Utc>>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
