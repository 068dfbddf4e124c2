//! Risk assessment reporting.
//!
//! One service turns a learner's latest risk screening into a classified
//! level plus the catalog items recommended for it.

use std::sync::Arc;

use portal_core::classify::RiskClassifier;
use portal_core::ledger::EnrollmentLedger;
use portal_core::model::{LearnerId, RiskLevel, Survey, SurveySubmission};
use portal_core::recommend::{Recommendation, RecommendationMatcher};
use snapshots::{
    CatalogRepository, EnrollmentRepository, Snapshots, SubmissionRepository, SurveyRepository,
};
use tracing::warn;

use crate::error::AssessmentError;

/// Classified risk level plus the recommendations matched to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskReport {
    pub level: RiskLevel,
    pub recommendations: Vec<Recommendation>,
}

/// Classifies the learner's latest risk screening and recommends content.
#[derive(Clone)]
pub struct AssessmentService {
    classifier: RiskClassifier,
    matcher: RecommendationMatcher,
    surveys: Arc<dyn SurveyRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    catalog: Arc<dyn CatalogRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl AssessmentService {
    /// Service with the shipped threshold and cap policies.
    #[must_use]
    pub fn new(snapshots: &Snapshots) -> Self {
        Self {
            classifier: RiskClassifier::with_default_policy(),
            matcher: RecommendationMatcher::with_default_policy(),
            surveys: Arc::clone(&snapshots.surveys),
            submissions: Arc::clone(&snapshots.submissions),
            catalog: Arc::clone(&snapshots.catalog),
            enrollments: Arc::clone(&snapshots.enrollments),
        }
    }

    /// Replaces the classifier policy.
    #[must_use]
    pub fn with_classifier(mut self, classifier: RiskClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the matcher policy.
    #[must_use]
    pub fn with_matcher(mut self, matcher: RecommendationMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Classifies the learner's most recent risk-assessment submission.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::MissingSubmission` when the learner never
    /// finished a risk assessment, or `Snapshot` when a source fails.
    pub async fn classify_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<RiskLevel, AssessmentError> {
        let (survey, submission) = self.latest_assessment(learner_id).await?;
        Ok(self.classify(&survey, &submission))
    }

    /// Builds the learner's risk report: the classified level plus the
    /// catalog items recommended for it, each decorated with the
    /// learner's enrollment status.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::MissingSubmission` when the learner never
    /// finished a risk assessment, or `Snapshot` when a source fails.
    pub async fn risk_report(&self, learner_id: LearnerId) -> Result<RiskReport, AssessmentError> {
        let (survey, submission) = self.latest_assessment(learner_id).await?;
        let level = self.classify(&survey, &submission);

        let catalog = self.catalog.catalog().await?;
        let records = self.enrollments.enrollments_for_learner(learner_id).await?;
        let ledger = EnrollmentLedger::from_snapshot(learner_id, &records);

        Ok(RiskReport {
            level,
            recommendations: self.matcher.matches(level, &catalog, &ledger),
        })
    }

    /// The latest submission targeting any risk-assessment survey,
    /// paired with that survey. Latest by `submitted_at`.
    async fn latest_assessment(
        &self,
        learner_id: LearnerId,
    ) -> Result<(Survey, SurveySubmission), AssessmentError> {
        let surveys = self.surveys.risk_assessment_surveys().await?;
        let submissions = self.submissions.submissions_for_learner(learner_id).await?;

        let latest = submissions
            .into_iter()
            .filter(|sub| surveys.iter().any(|s| s.id() == sub.survey_id()))
            .max_by_key(SurveySubmission::submitted_at)
            .ok_or(AssessmentError::MissingSubmission)?;
        let survey = surveys
            .into_iter()
            .find(|s| s.id() == latest.survey_id())
            .ok_or(AssessmentError::MissingSubmission)?;
        Ok((survey, latest))
    }

    fn classify(&self, survey: &Survey, submission: &SurveySubmission) -> RiskLevel {
        if let Some(label) = submission.reported_risk_label() {
            if RiskLevel::from_label(label).is_none() {
                warn!(label, "unrecognized risk label, falling back to scores");
            }
        }
        self.classifier.classify(survey, submission)
    }
}
