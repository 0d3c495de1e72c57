use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::session::Session;
use crate::background::bank::{is_complete, merge_answers, validate_answer, QuestionView};
use crate::background::queries::{get_background_questions, upsert_background_question};
use crate::errors::AppError;
use crate::models::candidate::BackgroundQuestion;
use crate::profile::completion::refresh_profile_completion;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BackgroundQuestionsResponse {
    pub questions: Vec<QuestionView>,
    pub complete: bool,
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// GET /api/v1/background-questions
pub async fn handle_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<BackgroundQuestionsResponse>, AppError> {
    let rows = get_background_questions(&state.db, session.user_id).await?;
    Ok(Json(BackgroundQuestionsResponse {
        complete: is_complete(rows.iter().map(|r| r.question_number)),
        questions: merge_answers(&rows),
    }))
}

/// PUT /api/v1/background-questions/:number
pub async fn handle_answer(
    State(state): State<AppState>,
    session: Session,
    Path(number): Path<i32>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<BackgroundQuestion>, AppError> {
    let explanation = validate_answer(number, req.answer, req.explanation.as_deref())
        .map_err(AppError::Validation)?;
    let row = upsert_background_question(
        &state.db,
        session.user_id,
        number,
        req.answer,
        explanation.as_deref(),
    )
    .await?;

    refresh_profile_completion(&state.db, session.user_id).await?;
    Ok(Json(row))
}
