use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{AnswerOptionId, QuestionId, SurveyId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SurveyError {
    #[error("survey name cannot be empty")]
    EmptyName,

    #[error("question text cannot be empty")]
    EmptyQuestionText,

    #[error("answer option label cannot be empty")]
    EmptyOptionLabel,

    #[error("duplicate question id in survey: {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("duplicate question position in survey: {0}")]
    DuplicateQuestionPosition(u32),

    #[error("duplicate answer option id in question: {0}")]
    DuplicateOptionId(AnswerOptionId),

    #[error("duplicate answer option position in question: {0}")]
    DuplicateOptionPosition(u32),
}

//
// ─── SURVEY KIND ───────────────────────────────────────────────────────────────
//

/// The role a survey plays in the progression flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyKind {
    /// Scored questionnaire used for risk classification.
    RiskAssessment,
    /// Unscored feedback collected before program content is shown.
    PreFeedback,
    /// Unscored feedback collected after the program has been viewed.
    PostFeedback,
}

impl SurveyKind {
    /// Whether this survey must be completed before program content unlocks.
    ///
    /// Only pre-feedback surveys gate; risk assessments are scored
    /// independently of the progression flow.
    #[must_use]
    pub fn gates_program_entry(self) -> bool {
        matches!(self, Self::PreFeedback)
    }

    /// Whether this survey only becomes available after the program is viewed.
    #[must_use]
    pub fn follows_program(self) -> bool {
        matches!(self, Self::PostFeedback)
    }
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// A single selectable answer within a question.
///
/// `score` is present only on risk-assessment surveys; feedback surveys
/// carry unscored options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    id: AnswerOptionId,
    label: String,
    position: u32,
    score: Option<i32>,
}

impl AnswerOption {
    /// Creates a new answer option.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::EmptyOptionLabel` if the label is empty or
    /// whitespace-only.
    pub fn new(
        id: AnswerOptionId,
        label: impl Into<String>,
        position: u32,
        score: Option<i32>,
    ) -> Result<Self, SurveyError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(SurveyError::EmptyOptionLabel);
        }

        Ok(Self {
            id,
            label: label.trim().to_owned(),
            position,
            score,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> AnswerOptionId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[must_use]
    pub fn score(&self) -> Option<i32> {
        self.score
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A survey question with its ordered answer options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    position: u32,
    options: Vec<AnswerOption>,
}

impl Question {
    /// Creates a new question, sorting its options by position.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::EmptyQuestionText` if the text is empty, or a
    /// duplicate error if two options share an id or a position.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        position: u32,
        mut options: Vec<AnswerOption>,
    ) -> Result<Self, SurveyError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(SurveyError::EmptyQuestionText);
        }

        options.sort_by_key(AnswerOption::position);
        for pair in options.windows(2) {
            if pair[0].position() == pair[1].position() {
                return Err(SurveyError::DuplicateOptionPosition(pair[0].position()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for option in &options {
            if !seen.insert(option.id()) {
                return Err(SurveyError::DuplicateOptionId(option.id()));
            }
        }

        Ok(Self {
            id,
            text: text.trim().to_owned(),
            position,
            options,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Options in position order.
    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Looks up one of this question's options by id.
    #[must_use]
    pub fn option(&self, id: AnswerOptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id() == id)
    }
}

//
// ─── SURVEY ────────────────────────────────────────────────────────────────────
//

/// A questionnaire attached to a program.
///
/// Questions are held in position order regardless of input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Survey {
    id: SurveyId,
    name: String,
    kind: SurveyKind,
    questions: Vec<Question>,
}

impl Survey {
    /// Creates a new survey, sorting its questions by position.
    ///
    /// # Errors
    ///
    /// Returns `SurveyError::EmptyName` if the name is empty, or a duplicate
    /// error if two questions share an id or a position.
    pub fn new(
        id: SurveyId,
        name: impl Into<String>,
        kind: SurveyKind,
        mut questions: Vec<Question>,
    ) -> Result<Self, SurveyError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SurveyError::EmptyName);
        }

        questions.sort_by_key(Question::position);
        for pair in questions.windows(2) {
            if pair[0].position() == pair[1].position() {
                return Err(SurveyError::DuplicateQuestionPosition(pair[0].position()));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(SurveyError::DuplicateQuestionId(question.id()));
            }
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            kind,
            questions,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SurveyId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> SurveyKind {
        self.kind
    }

    /// Questions in position order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Ids of every question in this survey, in position order.
    pub fn question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.questions.iter().map(Question::id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: u64, position: u32, score: Option<i32>) -> AnswerOption {
        AnswerOption::new(AnswerOptionId::new(id), format!("option {id}"), position, score)
            .unwrap()
    }

    fn question(id: u64, position: u32) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("question {id}"),
            position,
            vec![option(id * 10, 0, Some(0)), option(id * 10 + 1, 1, Some(5))],
        )
        .unwrap()
    }

    #[test]
    fn survey_new_rejects_empty_name() {
        let err = Survey::new(SurveyId::new(1), "  ", SurveyKind::PreFeedback, vec![]).unwrap_err();
        assert_eq!(err, SurveyError::EmptyName);
    }

    #[test]
    fn survey_sorts_questions_by_position() {
        let survey = Survey::new(
            SurveyId::new(1),
            "Risk screening",
            SurveyKind::RiskAssessment,
            vec![question(2, 1), question(1, 0)],
        )
        .unwrap();

        let ids: Vec<_> = survey.question_ids().collect();
        assert_eq!(ids, vec![QuestionId::new(1), QuestionId::new(2)]);
    }

    #[test]
    fn survey_rejects_duplicate_question_position() {
        let err = Survey::new(
            SurveyId::new(1),
            "Risk screening",
            SurveyKind::RiskAssessment,
            vec![question(1, 3), question(2, 3)],
        )
        .unwrap_err();
        assert_eq!(err, SurveyError::DuplicateQuestionPosition(3));
    }

    #[test]
    fn survey_rejects_duplicate_question_id() {
        let err = Survey::new(
            SurveyId::new(1),
            "Risk screening",
            SurveyKind::RiskAssessment,
            vec![question(1, 0), question(1, 1)],
        )
        .unwrap_err();
        assert_eq!(err, SurveyError::DuplicateQuestionId(QuestionId::new(1)));
    }

    #[test]
    fn question_rejects_empty_text() {
        let err = Question::new(QuestionId::new(1), "   ", 0, vec![]).unwrap_err();
        assert_eq!(err, SurveyError::EmptyQuestionText);
    }

    #[test]
    fn question_sorts_options_and_rejects_duplicates() {
        let q = Question::new(
            QuestionId::new(1),
            "How often?",
            0,
            vec![option(2, 1, Some(5)), option(1, 0, Some(0))],
        )
        .unwrap();
        assert_eq!(q.options()[0].id(), AnswerOptionId::new(1));
        assert_eq!(q.options()[1].id(), AnswerOptionId::new(2));

        let err = Question::new(
            QuestionId::new(1),
            "How often?",
            0,
            vec![option(1, 0, None), option(2, 0, None)],
        )
        .unwrap_err();
        assert_eq!(err, SurveyError::DuplicateOptionPosition(0));
    }

    #[test]
    fn option_lookup_by_id() {
        let q = question(1, 0);
        assert!(q.option(AnswerOptionId::new(10)).is_some());
        assert!(q.option(AnswerOptionId::new(99)).is_none());
    }

    #[test]
    fn option_rejects_empty_label() {
        let err = AnswerOption::new(AnswerOptionId::new(1), " ", 0, None).unwrap_err();
        assert_eq!(err, SurveyError::EmptyOptionLabel);
    }

    #[test]
    fn kind_pre_post_split() {
        assert!(SurveyKind::PreFeedback.gates_program_entry());
        assert!(!SurveyKind::RiskAssessment.gates_program_entry());
        assert!(!SurveyKind::PostFeedback.gates_program_entry());
        assert!(SurveyKind::PostFeedback.follows_program());
        assert!(!SurveyKind::RiskAssessment.follows_program());
    }
}
