use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use portal_core::model::{
    CatalogItem, Enrollment, LearnerId, Program, ProgramId, Survey, SurveyKind, SurveySubmission,
};
use thiserror::Error;

/// Errors surfaced by snapshot adapters.
///
/// `Unavailable` must be rendered as an error state by callers, never
/// collapsed into "zero results" or "fully locked".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("not found")]
    NotFound,

    #[error("snapshot source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed snapshot data: {0}")]
    Malformed(String),
}

/// Snapshot contract for surveys.
#[async_trait]
pub trait SurveyRepository: Send + Sync {
    /// Every survey attached to a program, pre- and post-feedback alike.
    ///
    /// An unknown program simply has no surveys; only transport problems
    /// are errors.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot cannot be fetched.
    async fn surveys_for_program(
        &self,
        program_id: ProgramId,
    ) -> Result<Vec<Survey>, SnapshotError>;

    /// Every risk-assessment survey, whether or not it hangs off a program.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot cannot be fetched.
    async fn risk_assessment_surveys(&self) -> Result<Vec<Survey>, SnapshotError>;
}

/// Snapshot contract for survey submissions.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// All submissions the learner ever made, across surveys.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot cannot be fetched.
    async fn submissions_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<SurveySubmission>, SnapshotError>;

    /// Persist a new submission.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the submission cannot be stored.
    async fn record_submission(
        &self,
        submission: &SurveySubmission,
    ) -> Result<(), SnapshotError>;
}

/// Snapshot contract for the recommendable catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// The full catalog of programs and courses, in display order.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot cannot be fetched.
    async fn catalog(&self) -> Result<Vec<CatalogItem>, SnapshotError>;

    /// Fetch one program by id.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::NotFound` if missing, or other snapshot errors.
    async fn get_program(&self, id: ProgramId) -> Result<Program, SnapshotError>;
}

/// Snapshot contract for enrollments.
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// The learner's enrollment records.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot cannot be fetched.
    async fn enrollments_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<Enrollment>, SnapshotError>;

    /// Persist a new enrollment.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the enrollment cannot be stored.
    async fn record_enrollment(&self, enrollment: &Enrollment) -> Result<(), SnapshotError>;
}

/// Simple in-memory snapshot source for testing and prototyping.
///
/// Surveys keep insertion order so fetches are deterministic.
#[derive(Clone, Default)]
pub struct InMemorySnapshots {
    surveys: Arc<Mutex<Vec<(Option<ProgramId>, Survey)>>>,
    submissions: Arc<Mutex<Vec<SurveySubmission>>>,
    catalog: Arc<Mutex<Vec<CatalogItem>>>,
    programs: Arc<Mutex<HashMap<ProgramId, Program>>>,
    enrollments: Arc<Mutex<Vec<Enrollment>>>,
}

impl InMemorySnapshots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a survey attached to a program.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Unavailable` if the store is poisoned.
    pub fn insert_program_survey(
        &self,
        program_id: ProgramId,
        survey: Survey,
    ) -> Result<(), SnapshotError> {
        let mut guard = self
            .surveys
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.push((Some(program_id), survey));
        Ok(())
    }

    /// Seed a survey that hangs off no program, like a standalone risk
    /// screening.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Unavailable` if the store is poisoned.
    pub fn insert_standalone_survey(&self, survey: Survey) -> Result<(), SnapshotError> {
        let mut guard = self
            .surveys
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.push((None, survey));
        Ok(())
    }

    /// Seed a catalog entry. Program entries also become fetchable through
    /// `get_program`.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Unavailable` if the store is poisoned.
    pub fn insert_catalog_item(&self, item: CatalogItem) -> Result<(), SnapshotError> {
        if let CatalogItem::Program(program) = &item {
            let mut guard = self
                .programs
                .lock()
                .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
            guard.insert(program.id(), program.clone());
        }
        let mut guard = self
            .catalog
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.push(item);
        Ok(())
    }

    /// Seed a program without listing it in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::Unavailable` if the store is poisoned.
    pub fn insert_program(&self, program: Program) -> Result<(), SnapshotError> {
        let mut guard = self
            .programs
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.insert(program.id(), program);
        Ok(())
    }
}

#[async_trait]
impl SurveyRepository for InMemorySnapshots {
    async fn surveys_for_program(
        &self,
        program_id: ProgramId,
    ) -> Result<Vec<Survey>, SnapshotError> {
        let guard = self
            .surveys
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(owner, _)| *owner == Some(program_id))
            .map(|(_, survey)| survey.clone())
            .collect())
    }

    async fn risk_assessment_surveys(&self) -> Result<Vec<Survey>, SnapshotError> {
        let guard = self
            .surveys
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|(_, survey)| survey.kind() == SurveyKind::RiskAssessment)
            .map(|(_, survey)| survey.clone())
            .collect())
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySnapshots {
    async fn submissions_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<SurveySubmission>, SnapshotError> {
        let guard = self
            .submissions
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|s| s.learner_id() == learner_id)
            .cloned()
            .collect())
    }

    async fn record_submission(
        &self,
        submission: &SurveySubmission,
    ) -> Result<(), SnapshotError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.push(submission.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemorySnapshots {
    async fn catalog(&self) -> Result<Vec<CatalogItem>, SnapshotError> {
        let guard = self
            .catalog
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn get_program(&self, id: ProgramId) -> Result<Program, SnapshotError> {
        let guard = self
            .programs
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.get(&id).cloned().ok_or(SnapshotError::NotFound)
    }
}

#[async_trait]
impl EnrollmentRepository for InMemorySnapshots {
    async fn enrollments_for_learner(
        &self,
        learner_id: LearnerId,
    ) -> Result<Vec<Enrollment>, SnapshotError> {
        let guard = self
            .enrollments
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .cloned()
            .collect())
    }

    async fn record_enrollment(&self, enrollment: &Enrollment) -> Result<(), SnapshotError> {
        let mut guard = self
            .enrollments
            .lock()
            .map_err(|e| SnapshotError::Unavailable(e.to_string()))?;
        guard.push(enrollment.clone());
        Ok(())
    }
}

/// Aggregates the snapshot sources behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Snapshots {
    pub surveys: Arc<dyn SurveyRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
}

impl Snapshots {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(&InMemorySnapshots::new())
    }

    /// Wraps an existing in-memory source, leaving the caller a handle for
    /// seeding.
    #[must_use]
    pub fn from_in_memory(repo: &InMemorySnapshots) -> Self {
        let surveys: Arc<dyn SurveyRepository> = Arc::new(repo.clone());
        let submissions: Arc<dyn SubmissionRepository> = Arc::new(repo.clone());
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(repo.clone());
        Self {
            surveys,
            submissions,
            catalog,
            enrollments,
        }
    }

    /// Backs every snapshot source with the portal's REST API.
    #[must_use]
    pub fn rest(client: crate::rest::RestClient) -> Self {
        let surveys: Arc<dyn SurveyRepository> = Arc::new(client.clone());
        let submissions: Arc<dyn SubmissionRepository> = Arc::new(client.clone());
        let catalog: Arc<dyn CatalogRepository> = Arc::new(client.clone());
        let enrollments: Arc<dyn EnrollmentRepository> = Arc::new(client);
        Self {
            surveys,
            submissions,
            catalog,
            enrollments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use portal_core::model::{
        Answer, AnswerOption, AnswerOptionId, Course, CourseId, Question, QuestionId, RiskLevel,
        SurveyId,
    };
    use portal_core::time::fixed_now;

    fn build_survey(id: u64, kind: SurveyKind) -> Survey {
        let question = Question::new(
            QuestionId::new(id * 10),
            "How often?",
            0,
            vec![
                AnswerOption::new(AnswerOptionId::new(id * 10), "never", 0, Some(0)).unwrap(),
                AnswerOption::new(AnswerOptionId::new(id * 10 + 1), "often", 1, Some(5)).unwrap(),
            ],
        )
        .unwrap();
        Survey::new(SurveyId::new(id), format!("survey {id}"), kind, vec![question]).unwrap()
    }

    fn build_program(id: u64, level: RiskLevel) -> Program {
        let now = fixed_now();
        Program::new(
            ProgramId::new(id),
            format!("program {id}"),
            None,
            level,
            None,
            now,
            now + Duration::days(30),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn program_surveys_round_trip_in_insertion_order() {
        let repo = InMemorySnapshots::new();
        let program = ProgramId::new(1);
        repo.insert_program_survey(program, build_survey(1, SurveyKind::PreFeedback))
            .unwrap();
        repo.insert_program_survey(program, build_survey(2, SurveyKind::PostFeedback))
            .unwrap();
        repo.insert_program_survey(ProgramId::new(2), build_survey(3, SurveyKind::PreFeedback))
            .unwrap();

        let fetched = repo.surveys_for_program(program).await.unwrap();
        let ids: Vec<_> = fetched.iter().map(Survey::id).collect();
        assert_eq!(ids, vec![SurveyId::new(1), SurveyId::new(2)]);

        assert!(repo
            .surveys_for_program(ProgramId::new(99))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn risk_assessments_are_found_regardless_of_attachment() {
        let repo = InMemorySnapshots::new();
        repo.insert_standalone_survey(build_survey(1, SurveyKind::RiskAssessment))
            .unwrap();
        repo.insert_program_survey(ProgramId::new(1), build_survey(2, SurveyKind::PreFeedback))
            .unwrap();
        repo.insert_program_survey(ProgramId::new(1), build_survey(3, SurveyKind::RiskAssessment))
            .unwrap();

        let fetched = repo.risk_assessment_surveys().await.unwrap();
        let ids: Vec<_> = fetched.iter().map(Survey::id).collect();
        assert_eq!(ids, vec![SurveyId::new(1), SurveyId::new(3)]);
    }

    #[tokio::test]
    async fn submissions_filter_by_learner() {
        let repo = InMemorySnapshots::new();
        let me = LearnerId::generate();
        let someone_else = LearnerId::generate();

        let mine = SurveySubmission::new(
            SurveyId::new(1),
            me,
            vec![Answer::new(QuestionId::new(1), AnswerOptionId::new(10))],
            fixed_now(),
        )
        .unwrap();
        let theirs = SurveySubmission::new(
            SurveyId::new(1),
            someone_else,
            vec![Answer::new(QuestionId::new(1), AnswerOptionId::new(11))],
            fixed_now(),
        )
        .unwrap();

        repo.record_submission(&mine).await.unwrap();
        repo.record_submission(&theirs).await.unwrap();

        let fetched = repo.submissions_for_learner(me).await.unwrap();
        assert_eq!(fetched, vec![mine]);
    }

    #[tokio::test]
    async fn catalog_round_trips_and_programs_are_fetchable() {
        let repo = InMemorySnapshots::new();
        let program = build_program(1, RiskLevel::High);
        repo.insert_catalog_item(CatalogItem::Program(program.clone()))
            .unwrap();
        repo.insert_catalog_item(CatalogItem::Course(
            Course::new(CourseId::new(2), "Refusal skills", None, RiskLevel::High).unwrap(),
        ))
        .unwrap();

        let catalog = repo.catalog().await.unwrap();
        assert_eq!(catalog.len(), 2);

        let fetched = repo.get_program(ProgramId::new(1)).await.unwrap();
        assert_eq!(fetched, program);

        let missing = repo.get_program(ProgramId::new(9)).await.unwrap_err();
        assert_eq!(missing, SnapshotError::NotFound);
    }

    #[tokio::test]
    async fn enrollments_round_trip_per_learner() {
        let repo = InMemorySnapshots::new();
        let me = LearnerId::generate();
        let record = Enrollment::new(me, ProgramId::new(1), fixed_now());
        repo.record_enrollment(&record).await.unwrap();
        repo.record_enrollment(&Enrollment::new(
            LearnerId::generate(),
            ProgramId::new(2),
            fixed_now(),
        ))
        .await
        .unwrap();

        let fetched = repo.enrollments_for_learner(me).await.unwrap();
        assert_eq!(fetched, vec![record]);
    }

    #[tokio::test]
    async fn aggregate_shares_one_backing_store() {
        let repo = InMemorySnapshots::new();
        let snapshots = Snapshots::from_in_memory(&repo);

        let me = LearnerId::generate();
        snapshots
            .enrollments
            .record_enrollment(&Enrollment::new(me, ProgramId::new(1), fixed_now()))
            .await
            .unwrap();

        let fetched = repo.enrollments_for_learner(me).await.unwrap();
        assert_eq!(fetched.len(), 1);
    }
}
