//! UI projection of the gate for the program page.

use portal_core::completion::{self, CompletionStatus};
use portal_core::gate::{GateState, ProgramGate};
use portal_core::model::{Survey, SurveySubmission};

/// Everything the program page needs to render access state.
///
/// The denial strings are the learner-facing texts from the gate itself,
/// so the page shows exactly what the engine decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateView {
    pub state: GateState,
    pub can_open_program: bool,
    pub can_take_post_surveys: bool,
    pub program_denial: Option<String>,
    pub post_surveys_denial: Option<String>,
    pub pre_surveys: CompletionStatus,
}

impl GateView {
    pub(crate) fn project(
        gate: &ProgramGate,
        pre_surveys: &[Survey],
        submissions: &[SurveySubmission],
    ) -> Self {
        let program = gate.can_access_program();
        let post_surveys = gate.can_access_post_surveys();
        Self {
            state: gate.state(),
            can_open_program: program.is_ok(),
            can_take_post_surveys: post_surveys.is_ok(),
            program_denial: program.err().map(|d| d.to_string()),
            post_surveys_denial: post_surveys.err().map(|d| d.to_string()),
            pre_surveys: completion::completion_status(pre_surveys, submissions),
        }
    }
}
