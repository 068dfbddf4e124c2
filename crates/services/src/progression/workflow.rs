//! Snapshot-backed progression orchestration.

use std::sync::Arc;

use portal_core::model::{LearnerId, ProgramId};
use snapshots::{
    CatalogRepository, EnrollmentRepository, Snapshots, SubmissionRepository, SurveyRepository,
};

use crate::error::ProgressionError;

use super::queries::{ProgressionQueries, ProgressionSnapshot};
use super::session::ProgressionSession;

/// Builds and refreshes progression sessions from the snapshot sources.
#[derive(Clone)]
pub struct ProgressionFlowService {
    surveys: Arc<dyn SurveyRepository>,
    submissions: Arc<dyn SubmissionRepository>,
    catalog: Arc<dyn CatalogRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl ProgressionFlowService {
    #[must_use]
    pub fn new(snapshots: &Snapshots) -> Self {
        Self {
            surveys: Arc::clone(&snapshots.surveys),
            submissions: Arc::clone(&snapshots.submissions),
            catalog: Arc::clone(&snapshots.catalog),
            enrollments: Arc::clone(&snapshots.enrollments),
        }
    }

    /// Starts a session for one learner and program.
    ///
    /// The session starts unviewed; a view recorded in an earlier session
    /// does not carry over.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Snapshot` when the program is unknown
    /// or a snapshot source fails.
    pub async fn start(
        &self,
        learner_id: LearnerId,
        program_id: ProgramId,
    ) -> Result<ProgressionSession, ProgressionError> {
        let program = self.catalog.get_program(program_id).await?;
        let snapshot = self.fetch(learner_id, program_id).await?;
        Ok(ProgressionSession::new(learner_id, program, snapshot))
    }

    /// Re-fetches the snapshots and re-evaluates the session's gate.
    ///
    /// A locally recorded view survives the refresh even when the fetched
    /// data does not reflect it yet.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Snapshot` when a source fails; the
    /// session keeps its previous state in that case.
    pub async fn refresh(&self, session: &mut ProgressionSession) -> Result<(), ProgressionError> {
        let snapshot = self
            .fetch(session.learner_id(), session.program().id())
            .await?;
        session.apply_snapshot(snapshot);
        Ok(())
    }

    /// Opens program content after re-checking against fresh snapshots.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Guard` with the learner-facing denial
    /// when the gate refuses, or `Snapshot` when refreshing fails.
    pub async fn open_program(
        &self,
        session: &mut ProgressionSession,
    ) -> Result<(), ProgressionError> {
        self.refresh(session).await?;
        session.open_program()?;
        Ok(())
    }

    async fn fetch(
        &self,
        learner_id: LearnerId,
        program_id: ProgramId,
    ) -> Result<ProgressionSnapshot, ProgressionError> {
        Ok(ProgressionQueries::fetch(
            learner_id,
            program_id,
            self.surveys.as_ref(),
            self.submissions.as_ref(),
            self.enrollments.as_ref(),
        )
        .await?)
    }
}
