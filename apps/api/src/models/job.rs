use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    Textarea,
    Select,
    Checkbox,
}

impl QuestionType {
    /// Select and checkbox questions carry a list of options.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::Select | QuestionType::Checkbox)
    }
}

/// `job_questions` row as stored; `options` is raw JSONB.
#[derive(Debug, Clone, FromRow)]
pub struct JobQuestionRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub question: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub order: i32,
    pub options: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobQuestion {
    pub id: Uuid,
    pub job_id: Uuid,
    pub question: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub order: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl From<JobQuestionRow> for JobQuestion {
    fn from(row: JobQuestionRow) -> Self {
        JobQuestion {
            options: row.options.as_ref().and_then(decode_options),
            id: row.id,
            job_id: row.job_id,
            question: row.question,
            question_type: row.question_type,
            required: row.required,
            order: row.order,
            created_at: row.created_at,
        }
    }
}

/// Serializes an option list into the JSONB column value.
pub fn encode_options(options: &[String]) -> Value {
    Value::Array(options.iter().cloned().map(Value::String).collect())
}

/// Decodes a stored option list. Older rows hold the list as a JSON-encoded
/// string inside the JSONB column, so both shapes are accepted.
pub fn decode_options(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::String(encoded) => serde_json::from_str::<Vec<String>>(encoded).ok(),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    }
}
