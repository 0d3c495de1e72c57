//! Job posting editor rules: validating the posting, turning the editor's
//! question list into inserts and updates, and reordering questions.

use serde::Deserialize;
use uuid::Uuid;

use crate::models::job::{JobQuestion, QuestionType};

/// Client-side ids for questions not yet saved carry this prefix.
pub const NEW_QUESTION_PREFIX: &str = "new-";

#[derive(Debug, Clone, Deserialize)]
pub struct JobForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl JobForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description is required".to_string());
        }
        Ok(())
    }

    /// Blank requirements are stored as NULL.
    pub fn requirements(&self) -> Option<&str> {
        self.requirements
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// One question as the editor holds it. `id` is either a stored UUID or a
/// `new-...` placeholder.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    pub id: String,
    pub question: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftKind {
    New,
    Existing(Uuid),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuestion {
    pub kind: DraftKind,
    pub question: String,
    pub question_type: QuestionType,
    pub required: bool,
    pub order: i32,
    pub options: Option<Vec<String>>,
}

fn classify(id: &str) -> Result<DraftKind, String> {
    if id.starts_with(NEW_QUESTION_PREFIX) {
        return Ok(DraftKind::New);
    }
    Uuid::parse_str(id)
        .map(DraftKind::Existing)
        .map_err(|_| format!("Invalid question id '{id}'"))
}

/// Trims and drops blank entries. Select and checkbox questions need at least
/// one option; free-text questions never store options.
pub fn normalize_options(
    question_type: QuestionType,
    options: Option<&[String]>,
) -> Result<Option<Vec<String>>, String> {
    if !question_type.has_options() {
        return Ok(None);
    }
    let cleaned: Vec<String> = options
        .unwrap_or_default()
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        return Err("Select and checkbox questions need at least one option".to_string());
    }
    Ok(Some(cleaned))
}

/// Validates every draft and assigns `order` from its list position.
pub fn plan_question_saves(drafts: &[QuestionDraft]) -> Result<Vec<PlannedQuestion>, String> {
    drafts
        .iter()
        .enumerate()
        .map(|(position, draft)| {
            if draft.question.trim().is_empty() {
                return Err(format!("Question {} has no text", position + 1));
            }
            let options = normalize_options(draft.question_type, draft.options.as_deref())
                .map_err(|e| format!("Question {}: {e}", position + 1))?;
            Ok(PlannedQuestion {
                kind: classify(&draft.id)?,
                question: draft.question.trim().to_string(),
                question_type: draft.question_type,
                required: draft.required,
                order: position as i32,
                options,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Neighbour index for a move, or `None` at either end of the list.
pub fn move_target(index: usize, len: usize, direction: MoveDirection) -> Option<usize> {
    match direction {
        MoveDirection::Up if index > 0 && index < len => Some(index - 1),
        MoveDirection::Down if index + 1 < len => Some(index + 1),
        _ => None,
    }
}

/// Swaps the question at `index` with its neighbour and sets both `order`
/// values to their new positions. Returns the two `(id, order)` pairs that
/// changed, or `None` when the move is out of range.
pub fn swap_with_neighbour(
    questions: &mut [JobQuestion],
    index: usize,
    direction: MoveDirection,
) -> Option<[(Uuid, i32); 2]> {
    let target = move_target(index, questions.len(), direction)?;
    questions.swap(index, target);
    questions[index].order = index as i32;
    questions[target].order = target as i32;
    Some([
        (questions[index].id, questions[index].order),
        (questions[target].id, questions[target].order),
    ])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn draft(id: &str, question_type: QuestionType, options: Option<Vec<&str>>) -> QuestionDraft {
        QuestionDraft {
            id: id.to_string(),
            question: "Years hauling hazmat?".to_string(),
            question_type,
            required: false,
            options: options.map(|o| o.into_iter().map(str::to_string).collect()),
        }
    }

    fn stored(order: i32) -> JobQuestion {
        JobQuestion {
            id: Uuid::new_v4(),
            job_id: Uuid::nil(),
            question: format!("Q{order}"),
            question_type: QuestionType::Text,
            required: false,
            order,
            options: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_job_form_validation() {
        let form = JobForm {
            title: "OTR Driver".into(),
            description: " ".into(),
            requirements: Some("  ".into()),
            is_active: true,
        };
        assert_eq!(form.validate(), Err("description is required".to_string()));
        assert_eq!(form.requirements(), None);
    }

    #[test]
    fn test_plan_splits_new_and_existing_and_orders_by_position() {
        let existing = Uuid::new_v4();
        let drafts = vec![
            draft("new-1700000000000", QuestionType::Text, None),
            draft(&existing.to_string(), QuestionType::Textarea, None),
            draft("new-1700000000001", QuestionType::Select, Some(vec!["A", "B"])),
        ];

        let plan = plan_question_saves(&drafts).unwrap();
        assert_eq!(plan[0].kind, DraftKind::New);
        assert_eq!(plan[1].kind, DraftKind::Existing(existing));
        assert_eq!(plan[2].kind, DraftKind::New);
        let orders: Vec<i32> = plan.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_choice_questions_need_an_option() {
        let drafts = vec![draft("new-1", QuestionType::Checkbox, Some(vec![" ", ""]))];
        assert!(plan_question_saves(&drafts).is_err());

        let drafts = vec![draft("new-1", QuestionType::Select, None)];
        assert!(plan_question_saves(&drafts).is_err());
    }

    #[test]
    fn test_text_questions_drop_options_and_choice_options_are_trimmed() {
        let plan = plan_question_saves(&[
            draft("new-1", QuestionType::Text, Some(vec!["stray"])),
            draft("new-2", QuestionType::Select, Some(vec![" Class A ", "", "Class B"])),
        ])
        .unwrap();
        assert_eq!(plan[0].options, None);
        assert_eq!(
            plan[1].options,
            Some(vec!["Class A".to_string(), "Class B".to_string()])
        );
    }

    #[test]
    fn test_invalid_existing_id_rejected() {
        assert!(plan_question_saves(&[draft("abc", QuestionType::Text, None)]).is_err());
    }

    #[test]
    fn test_move_target_bounds() {
        assert_eq!(move_target(0, 3, MoveDirection::Up), None);
        assert_eq!(move_target(2, 3, MoveDirection::Down), None);
        assert_eq!(move_target(1, 3, MoveDirection::Up), Some(0));
        assert_eq!(move_target(1, 3, MoveDirection::Down), Some(2));
        assert_eq!(move_target(5, 3, MoveDirection::Up), None);
    }

    #[test]
    fn test_swap_reassigns_both_orders() {
        let mut questions = vec![stored(0), stored(1), stored(2)];
        let first = questions[0].id;
        let second = questions[1].id;

        let changed = swap_with_neighbour(&mut questions, 0, MoveDirection::Down).unwrap();

        assert_eq!(questions[0].id, second);
        assert_eq!(questions[1].id, first);
        assert_eq!(questions[0].order, 0);
        assert_eq!(questions[1].order, 1);
        assert_eq!(changed, [(second, 0), (first, 1)]);
    }

    #[test]
    fn test_swap_at_edge_is_noop() {
        let mut questions = vec![stored(0), stored(1)];
        let before: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        assert!(swap_with_neighbour(&mut questions, 1, MoveDirection::Down).is_none());
        let after: Vec<Uuid> = questions.iter().map(|q| q.id).collect();
        assert_eq!(before, after);
    }
}
