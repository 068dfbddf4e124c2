//! Survey completion checks.
//!
//! Completion is judged against the survey as it looks right now: a
//! submission counts as long as it answers every question the current
//! revision asks, and answers to since-removed questions are ignored.

use std::collections::HashSet;

use crate::model::{Survey, SurveyId, SurveySubmission};

/// Whether any of the given submissions completes the survey.
///
/// A submission completes a survey when it targets the same survey id and
/// its answered questions cover every question the survey currently has.
#[must_use]
pub fn is_completed(survey: &Survey, submissions: &[SurveySubmission]) -> bool {
    let required: HashSet<_> = survey.question_ids().collect();
    submissions
        .iter()
        .filter(|s| s.survey_id() == survey.id())
        .any(|s| {
            let answered: HashSet<_> = s.answered_question_ids().collect();
            required.is_subset(&answered)
        })
}

/// Whether every survey in the slice is completed.
///
/// An empty slice is trivially complete; a program with no pre-surveys
/// configured must not lock its learners out.
#[must_use]
pub fn all_completed(surveys: &[Survey], submissions: &[SurveySubmission]) -> bool {
    surveys.iter().all(|s| is_completed(s, submissions))
}

/// The surveys not yet completed, in input order.
#[must_use]
pub fn incomplete_surveys<'a>(
    surveys: &'a [Survey],
    submissions: &[SurveySubmission],
) -> Vec<&'a Survey> {
    surveys
        .iter()
        .filter(|s| !is_completed(s, submissions))
        .collect()
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Per-learner completion summary over a set of surveys, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStatus {
    pub total: usize,
    pub completed: usize,
    pub remaining: Vec<SurveyId>,
}

impl CompletionStatus {
    #[must_use]
    pub fn is_all_completed(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Evaluates the learner's submissions against the given surveys.
#[must_use]
pub fn completion_status(surveys: &[Survey], submissions: &[SurveySubmission]) -> CompletionStatus {
    let remaining: Vec<SurveyId> = incomplete_surveys(surveys, submissions)
        .into_iter()
        .map(Survey::id)
        .collect();

    CompletionStatus {
        total: surveys.len(),
        completed: surveys.len() - remaining.len(),
        remaining,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
