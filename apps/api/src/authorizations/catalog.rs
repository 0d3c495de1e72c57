//! The four legal authorizations every candidate signs, and the all-signed rule.

use serde::Serialize;

use crate::models::candidate::{Authorization, AuthorizationType};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AuthorizationText {
    pub authorization_type: AuthorizationType,
    pub title: &'static str,
    pub description: &'static str,
    pub content: &'static str,
}

pub const AUTHORIZATION_TEXTS: [AuthorizationText; 4] = [
    AuthorizationText {
        authorization_type: AuthorizationType::ApplicantCertification,
        title: "Applicant Certification",
        description: "I certify that the information provided is true and complete.",
        content: "I certify that all information provided in this application is true and \
complete to the best of my knowledge. I understand that any false statements or omissions may \
result in rejection of my application or termination of employment if discovered later.",
    },
    AuthorizationText {
        authorization_type: AuthorizationType::FmcsaClearinghouse,
        title: "FMCSA Drug and Alcohol Clearinghouse Authorization",
        description:
            "Authorization for FMCSA Drug and Alcohol Clearinghouse queries (49 CFR 382.701).",
        content: "I hereby authorize the release of information from the Federal Motor Carrier \
Safety Administration (FMCSA) Drug and Alcohol Clearinghouse to the prospective employer. This \
authorization is in accordance with 49 CFR 382.701.\n\n\
I understand that:\n\
- The employer will query the Clearinghouse for information about my drug and alcohol violations\n\
- This authorization is required for employment consideration\n\
- I may review my own Clearinghouse record at any time",
    },
    AuthorizationText {
        authorization_type: AuthorizationType::HirerightBackground,
        title: "HireRight Background Check Authorization",
        description: "Authorization for HireRight to conduct a background check.",
        content: "I hereby authorize HireRight and its agents to conduct a comprehensive \
background check, which may include:\n\n\
- Criminal record searches\n\
- Employment history verification\n\
- Education verification\n\
- Motor vehicle record checks\n\
- Credit history (where permitted by law)\n\
- Other relevant background information\n\n\
I understand that this authorization is valid for the duration of the employment process and \
may be used for future employment decisions.",
    },
    AuthorizationText {
        authorization_type: AuthorizationType::PspAuthorization,
        title: "PSP Authorization",
        description: "Authorization for Pre-Employment Screening Program (PSP) records.",
        content: "I hereby authorize the release of my Pre-Employment Screening Program (PSP) \
records to the prospective employer.\n\n\
I understand that:\n\
- PSP records contain my commercial driver's license (CDL) violation history\n\
- This information will be used to evaluate my application for employment\n\
- I may request a copy of my PSP record at any time\n\
- This authorization is required for employment consideration",
    },
];

/// True iff every one of the four types has a row with `signed == true`.
pub fn all_signed(rows: &[Authorization]) -> bool {
    AuthorizationType::ALL.iter().all(|t| {
        rows.iter()
            .any(|r| r.authorization_type == *t && r.signed)
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationView {
    #[serde(flatten)]
    pub text: AuthorizationText,
    pub signed: bool,
    pub signed_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub fn merge_signatures(rows: &[Authorization]) -> Vec<AuthorizationView> {
    AUTHORIZATION_TEXTS
        .iter()
        .map(|text| {
            let row = rows
                .iter()
                .find(|r| r.authorization_type == text.authorization_type && r.signed);
            AuthorizationView {
                text: *text,
                signed: row.is_some(),
                signed_at: row.and_then(|r| r.signed_at),
            }
        })
        .collect()
}
