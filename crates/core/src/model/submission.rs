use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AnswerOptionId, LearnerId, QuestionId, SurveyId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("submission must contain at least one answer")]
    Empty,

    #[error("submission answers question {0} more than once")]
    DuplicateQuestion(QuestionId),
}

//
// ─── ANSWER ────────────────────────────────────────────────────────────────────
//

/// One selected option for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub question_id: QuestionId,
    pub option_id: AnswerOptionId,
}

impl Answer {
    #[must_use]
    pub fn new(question_id: QuestionId, option_id: AnswerOptionId) -> Self {
        Self {
            question_id,
            option_id,
        }
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// A learner's completed response to a survey, submitted as one atomic unit.
///
/// The upstream service may attach a risk label it computed itself; when
/// present that label takes precedence over local score classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveySubmission {
    survey_id: SurveyId,
    learner_id: LearnerId,
    answers: Vec<Answer>,
    submitted_at: DateTime<Utc>,
    reported_risk_label: Option<String>,
}

impl SurveySubmission {
    /// Creates a new submission.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::Empty` if there are no answers, or
    /// `SubmissionError::DuplicateQuestion` if any question is answered twice.
    pub fn new(
        survey_id: SurveyId,
        learner_id: LearnerId,
        answers: Vec<Answer>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionError> {
        if answers.is_empty() {
            return Err(SubmissionError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for answer in &answers {
            if !seen.insert(answer.question_id) {
                return Err(SubmissionError::DuplicateQuestion(answer.question_id));
            }
        }

        Ok(Self {
            survey_id,
            learner_id,
            answers,
            submitted_at,
            reported_risk_label: None,
        })
    }

    /// Attaches the risk label the upstream service reported for this
    /// submission.
    #[must_use]
    pub fn with_reported_risk_label(mut self, label: impl Into<String>) -> Self {
        self.reported_risk_label = Some(label.into());
        self
    }

    // Accessors
    #[must_use]
    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    #[must_use]
    pub fn reported_risk_label(&self) -> Option<&str> {
        self.reported_risk_label.as_deref()
    }

    /// The answer recorded for a question, if any.
    #[must_use]
    pub fn answer_for(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    /// Ids of every question this submission answered.
    pub fn answered_question_ids(&self) -> impl Iterator<Item = QuestionId> + '_ {
        self.answers.iter().map(|a| a.question_id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
