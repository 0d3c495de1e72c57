use std::collections::HashMap;

use uuid::Uuid;

use crate::models::job::JobQuestion;

pub const MISSING_ANSWERS_MESSAGE: &str = "Please answer all required questions before submitting.";

fn is_blank(answer: Option<&String>) -> bool {
    answer.map_or(true, |a| a.trim().is_empty())
}

/// Required questions whose answer is absent or whitespace only.
pub fn missing_required(questions: &[JobQuestion], answers: &HashMap<Uuid, String>) -> Vec<Uuid> {
    questions
        .iter()
        .filter(|q| q.required && is_blank(answers.get(&q.id)))
        .map(|q| q.id)
        .collect()
}

/// Non-blank answers to this job's questions, in question order. Answers keyed
/// by ids that are not questions of the job are dropped.
pub fn answers_to_store(
    questions: &[JobQuestion],
    answers: &HashMap<Uuid, String>,
) -> Vec<(Uuid, String)> {
    questions
        .iter()
        .filter_map(|q| {
            let answer = answers.get(&q.id)?;
            (!answer.trim().is_empty()).then(|| (q.id, answer.clone()))
        })
        .collect()
}
