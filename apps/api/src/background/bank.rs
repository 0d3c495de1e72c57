//! The fixed background question bank and its completeness rule.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::candidate::BackgroundQuestion;

pub const BACKGROUND_QUESTIONS: [&str; 9] = [
    "Have you ever been convicted of a felony or misdemeanor?",
    "Have you ever been denied a license, permit, or privilege to operate a motor vehicle?",
    "Has any license, permit, or privilege to operate a motor vehicle ever been suspended or revoked?",
    "Have you been convicted of DWI/DUI in the last 10 years?",
    "Have you tested positive for alcohol or drugs in the last 3 years?",
    "Have you refused to take an alcohol or drug test in the last 3 years?",
    "Have you been denied a job due to a failed alcohol or drug test in the last 3 years?",
    "Have you ever been discharged or asked to resign from a job?",
    "Are you able to perform the essential functions of the job for which you are applying?",
];

pub fn question_count() -> i32 {
    BACKGROUND_QUESTIONS.len() as i32
}

pub fn question_text(number: i32) -> Option<&'static str> {
    if number < 1 {
        return None;
    }
    BACKGROUND_QUESTIONS.get((number - 1) as usize).copied()
}

/// Complete iff the answered question numbers are exactly {1..=9}.
pub fn is_complete<I>(answered: I) -> bool
where
    I: IntoIterator<Item = i32>,
{
    let answered: BTreeSet<i32> = answered.into_iter().collect();
    let expected: BTreeSet<i32> = (1..=question_count()).collect();
    answered == expected
}

/// A "yes" answer needs a non-blank explanation. Returns the explanation to store.
pub fn validate_answer(
    number: i32,
    answer: bool,
    explanation: Option<&str>,
) -> Result<Option<String>, String> {
    if question_text(number).is_none() {
        return Err(format!(
            "Question number must be between 1 and {}",
            question_count()
        ));
    }
    let explanation = explanation.map(str::trim).filter(|e| !e.is_empty());
    match (answer, explanation) {
        (true, None) => Err(format!(
            "Question {number}: an explanation is required when answering yes"
        )),
        (true, Some(text)) => Ok(Some(text.to_string())),
        // A "no" answer keeps no explanation.
        (false, _) => Ok(None),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question_number: i32,
    pub question: &'static str,
    pub answer: Option<bool>,
    pub explanation: Option<String>,
}

/// Lays stored answers over the bank, in bank order.
pub fn merge_answers(rows: &[BackgroundQuestion]) -> Vec<QuestionView> {
    BACKGROUND_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let number = i as i32 + 1;
            let row = rows.iter().find(|r| r.question_number == number);
            QuestionView {
                question_number: number,
                question: text,
                answer: row.map(|r| r.answer),
                explanation: row.and_then(|r| r.explanation.clone()),
            }
        })
        .collect()
}
