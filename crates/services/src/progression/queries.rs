//! Snapshot assembly for progression sessions.

use portal_core::ledger::EnrollmentLedger;
use portal_core::model::{LearnerId, ProgramId, Survey, SurveySubmission};
use snapshots::{EnrollmentRepository, SnapshotError, SubmissionRepository, SurveyRepository};

/// Everything one gate evaluation needs, fetched in a single pass.
///
/// The three fetches are not transactionally joined; the session simply
/// re-evaluates whatever snapshot it is handed.
#[derive(Debug, Clone)]
pub(crate) struct ProgressionSnapshot {
    pub(crate) enrolled: bool,
    pub(crate) surveys: Vec<Survey>,
    pub(crate) submissions: Vec<SurveySubmission>,
}

pub(crate) struct ProgressionQueries;

impl ProgressionQueries {
    /// Fetches the learner's view of one program.
    pub(crate) async fn fetch(
        learner_id: LearnerId,
        program_id: ProgramId,
        surveys: &dyn SurveyRepository,
        submissions: &dyn SubmissionRepository,
        enrollments: &dyn EnrollmentRepository,
    ) -> Result<ProgressionSnapshot, SnapshotError> {
        let records = enrollments.enrollments_for_learner(learner_id).await?;
        let enrolled =
            EnrollmentLedger::from_snapshot(learner_id, &records).is_enrolled(program_id);
        let surveys = surveys.surveys_for_program(program_id).await?;
        let submissions = submissions.submissions_for_learner(learner_id).await?;
        Ok(ProgressionSnapshot {
            enrolled,
            surveys,
            submissions,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
