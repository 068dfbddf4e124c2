//! Per-(learner, program) evaluation session.

use portal_core::completion::{self, CompletionStatus};
use portal_core::gate::{GateSnapshot, GateState, ProgramGate};
use portal_core::model::{LearnerId, Program, Survey, SurveyId, SurveySubmission};
use snapshots::SnapshotError;
use tracing::warn;

use crate::error::ProgressionError;

use super::queries::ProgressionSnapshot;
use super::view::GateView;

/// One learner's position inside one program.
///
/// The session keeps the fetched surveys and submissions so every access
/// question is answered locally; the flow service swaps fresh snapshots
/// in via refresh. A new session always starts unviewed.
#[derive(Debug, Clone)]
pub struct ProgressionSession {
    learner_id: LearnerId,
    program: Program,
    pre_surveys: Vec<Survey>,
    post_surveys: Vec<Survey>,
    submissions: Vec<SurveySubmission>,
    gate: ProgramGate,
}

// Risk-assessment surveys attached to a program neither gate entry nor
// follow the content, so the session drops them; they belong to the
// assessment flow.
fn partition(surveys: Vec<Survey>) -> (Vec<Survey>, Vec<Survey>) {
    let mut pre = Vec::new();
    let mut post = Vec::new();
    for survey in surveys {
        if survey.kind().gates_program_entry() {
            pre.push(survey);
        } else if survey.kind().follows_program() {
            post.push(survey);
        }
    }
    (pre, post)
}

impl ProgressionSession {
    pub(crate) fn new(
        learner_id: LearnerId,
        program: Program,
        snapshot: ProgressionSnapshot,
    ) -> Self {
        let (pre_surveys, post_surveys) = partition(snapshot.surveys);
        let gate = ProgramGate::from_snapshot(&GateSnapshot {
            enrolled: snapshot.enrolled,
            surveys: &pre_surveys,
            submissions: &snapshot.submissions,
            program_viewed: false,
        });
        Self {
            learner_id,
            program,
            pre_surveys,
            post_surveys,
            submissions: snapshot.submissions,
            gate,
        }
    }

    /// Replaces the session's data with a fresh snapshot and re-evaluates
    /// the gate. A locally recorded view survives the swap.
    pub(crate) fn apply_snapshot(&mut self, snapshot: ProgressionSnapshot) {
        let (pre_surveys, post_surveys) = partition(snapshot.surveys);
        self.pre_surveys = pre_surveys;
        self.post_surveys = post_surveys;
        self.submissions = snapshot.submissions;
        self.gate.refresh(&GateSnapshot {
            enrolled: snapshot.enrolled,
            surveys: &self.pre_surveys,
            submissions: &self.submissions,
            program_viewed: false,
        });
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Pre-program surveys, in the order the backend lists them.
    #[must_use]
    pub fn pre_surveys(&self) -> &[Survey] {
        &self.pre_surveys
    }

    /// Post-program surveys, in the order the backend lists them.
    #[must_use]
    pub fn post_surveys(&self) -> &[Survey] {
        &self.post_surveys
    }

    #[must_use]
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// The pre-surveys the learner still has to finish.
    #[must_use]
    pub fn pending_pre_surveys(&self) -> Vec<&Survey> {
        completion::incomplete_surveys(&self.pre_surveys, &self.submissions)
    }

    /// Completion counts over the pre-surveys, for display.
    #[must_use]
    pub fn pre_survey_status(&self) -> CompletionStatus {
        completion::completion_status(&self.pre_surveys, &self.submissions)
    }

    /// Records that the learner opened the program content.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Guard` with the learner-facing denial
    /// when the gate refuses; the session state is unchanged.
    pub fn open_program(&mut self) -> Result<&Program, ProgressionError> {
        if let Err(denied) = self.gate.record_program_opened() {
            warn!(program_id = %self.program.id(), %denied, "program content access denied");
            return Err(denied.into());
        }
        Ok(&self.program)
    }

    /// Navigates to one post-program survey.
    ///
    /// The guard runs before the lookup, so a denied learner gets the
    /// denial even for a survey id that does not exist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Guard` when post-surveys are closed, or
    /// `Snapshot(NotFound)` when the id is not one of them.
    pub fn post_survey(&self, id: SurveyId) -> Result<&Survey, ProgressionError> {
        if let Err(denied) = self.gate.can_access_post_surveys() {
            warn!(survey_id = %id, %denied, "post-survey access denied");
            return Err(denied.into());
        }
        self.post_surveys
            .iter()
            .find(|s| s.id() == id)
            .ok_or(ProgressionError::Snapshot(SnapshotError::NotFound))
    }

    /// Projects the gate into the shape the program page renders.
    #[must_use]
    pub fn gate_view(&self) -> GateView {
        GateView::project(&self.gate, &self.pre_surveys, &self.submissions)
    }
}
