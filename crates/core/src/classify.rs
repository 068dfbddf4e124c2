//! Risk classification of assessment submissions.
//!
//! One code path for every submission: a recognizable server-reported
//! label wins, anything else falls through to local score thresholds.

use crate::model::{RiskLevel, RiskThresholds, Survey, SurveySubmission};

/// Total score of a submission against a survey's option scores.
///
/// Answers that no longer resolve (removed question, removed option, or
/// an unscored option) contribute zero rather than failing the whole
/// classification.
#[must_use]
pub fn total_score(survey: &Survey, submission: &SurveySubmission) -> i64 {
    submission
        .answers()
        .iter()
        .map(|answer| {
            survey
                .question(answer.question_id)
                .and_then(|q| q.option(answer.option_id))
                .and_then(|o| o.score())
                .map_or(0, i64::from)
        })
        .sum()
}

/// Classifies risk-assessment submissions against a threshold policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    #[must_use]
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// Classifier with the portal's shipped cutoffs.
    #[must_use]
    pub fn with_default_policy() -> Self {
        Self::new(RiskThresholds::default_policy())
    }

    #[must_use]
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Classifies one submission.
    ///
    /// A server-reported label is used when it parses as a known level;
    /// otherwise the summed option scores decide. Classification always
    /// produces a level, even for a submission whose answers no longer
    /// resolve against the survey.
    #[must_use]
    pub fn classify(&self, survey: &Survey, submission: &SurveySubmission) -> RiskLevel {
        if let Some(level) = submission.reported_risk_label().and_then(RiskLevel::from_label) {
            return level;
        }
        self.thresholds.level_for(total_score(survey, submission))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
