//! Program access gating.
//!
//! One explicit state machine replaces the flag soup the portal used to
//! carry around. Every access decision goes through `ProgramGate`, and the
//! denial messages here are the exact learner-facing strings the UI shows.

use thiserror::Error;

use crate::completion::is_completed;
use crate::model::{Survey, SurveySubmission};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why the gate refused. The `Display` text is shown to learners verbatim.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GateDenied {
    #[error("Bạn chưa đăng ký chương trình này.")]
    NotEnrolled,

    #[error("Vui lòng hoàn thành tất cả khảo sát trước khi xem nội dung chương trình.")]
    PreSurveysPending,

    #[error("Vui lòng xem nội dung chương trình trước khi làm khảo sát sau chương trình.")]
    ProgramNotViewed,
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Everything the gate needs to know about one learner and one program,
/// as fetched in a single pass.
///
/// `surveys` is the program's full survey set; the gate itself picks out
/// the pre-feedback ones that block entry. The pieces may be mutually
/// stale (fetched from separate endpoints); evaluation is pure and simply
/// judges the snapshot it is given.
#[derive(Debug, Clone, Copy)]
pub struct GateSnapshot<'a> {
    pub enrolled: bool,
    pub surveys: &'a [Survey],
    pub submissions: &'a [SurveySubmission],
    pub program_viewed: bool,
}

impl GateSnapshot<'_> {
    fn pre_surveys_completed(&self) -> bool {
        self.surveys
            .iter()
            .filter(|s| s.kind().gates_program_entry())
            .all(|s| is_completed(s, self.submissions))
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Why the gate is fully shut.
///
/// Enrollment is the only modeled lock cause; it is checked before any
/// survey state is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    NotEnrolled,
}

/// Position of a learner in the progression flow for one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Nothing under the program is reachable.
    Locked(LockReason),
    /// Enrolled, but required pre-program surveys are incomplete.
    PreSurveysPending,
    /// Pre-surveys done; program content may be opened.
    ProgramUnlocked,
    /// Program content was opened in this session.
    ProgramViewed,
    /// Stored state already records a view; post-surveys are open.
    PostSurveysUnlocked,
}

impl GateState {
    /// Derives the state a fresh snapshot puts the learner in.
    ///
    /// Enrollment is checked first: an unenrolled learner is told about
    /// enrollment, never prompted for surveys. A program with no
    /// pre-surveys unlocks immediately.
    #[must_use]
    pub fn evaluate(snapshot: &GateSnapshot<'_>) -> Self {
        if !snapshot.enrolled {
            return Self::Locked(LockReason::NotEnrolled);
        }
        if !snapshot.pre_surveys_completed() {
            return Self::PreSurveysPending;
        }
        if snapshot.program_viewed {
            return Self::PostSurveysUnlocked;
        }
        Self::ProgramUnlocked
    }

    #[must_use]
    fn has_viewed(self) -> bool {
        matches!(self, Self::ProgramViewed | Self::PostSurveysUnlocked)
    }
}

//
// ─── GATE ──────────────────────────────────────────────────────────────────────
//

/// Stateful gate for one (learner, program) pair.
///
/// The viewed flag is one-way: once the program was opened, neither a
/// repeat open nor a stale refresh snapshot clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramGate {
    state: GateState,
}

impl ProgramGate {
    /// Builds a gate from a freshly fetched snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &GateSnapshot<'_>) -> Self {
        Self {
            state: GateState::evaluate(snapshot),
        }
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        self.state
    }

    /// Re-evaluates against a newer snapshot, preserving a locally
    /// recorded view the snapshot does not know about yet.
    pub fn refresh(&mut self, snapshot: &GateSnapshot<'_>) {
        let next = GateState::evaluate(snapshot);
        self.state = if self.state.has_viewed() && next == GateState::ProgramUnlocked {
            GateState::ProgramViewed
        } else {
            next
        };
    }

    /// Whether program content may be opened.
    ///
    /// # Errors
    ///
    /// Returns the learner-facing denial when the learner is not enrolled
    /// or still has pre-surveys to finish.
    pub fn can_access_program(&self) -> Result<(), GateDenied> {
        match self.state {
            GateState::Locked(LockReason::NotEnrolled) => Err(GateDenied::NotEnrolled),
            GateState::PreSurveysPending => Err(GateDenied::PreSurveysPending),
            GateState::ProgramUnlocked
            | GateState::ProgramViewed
            | GateState::PostSurveysUnlocked => Ok(()),
        }
    }

    /// Whether post-program surveys may be taken.
    ///
    /// # Errors
    ///
    /// Returns the learner-facing denial when the program content has not
    /// been viewed yet, or an earlier requirement is unmet.
    pub fn can_access_post_surveys(&self) -> Result<(), GateDenied> {
        match self.state {
            GateState::Locked(LockReason::NotEnrolled) => Err(GateDenied::NotEnrolled),
            GateState::PreSurveysPending => Err(GateDenied::PreSurveysPending),
            GateState::ProgramUnlocked => Err(GateDenied::ProgramNotViewed),
            GateState::ProgramViewed | GateState::PostSurveysUnlocked => Ok(()),
        }
    }

    /// Records that the learner opened the program content.
    ///
    /// Opening again later is a no-op; the transition never repeats and
    /// never regresses.
    ///
    /// # Errors
    ///
    /// Returns the denial from [`Self::can_access_program`] without
    /// changing state when access is not allowed.
    pub fn record_program_opened(&mut self) -> Result<(), GateDenied> {
        self.can_access_program()?;
        if self.state == GateState::ProgramUnlocked {
            self.state = GateState::ProgramViewed;
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Answer, AnswerOption, AnswerOptionId, LearnerId, Question, QuestionId, SurveyId,
        SurveyKind,
    };
    use crate::time::fixed_now;

    fn survey(id: u64, kind: SurveyKind) -> Survey {
        let question = Question::new(
            QuestionId::new(id * 100),
            "How often?",
            0,
            vec![
                AnswerOption::new(AnswerOptionId::new(id * 100), "never", 0, None).unwrap(),
                AnswerOption::new(AnswerOptionId::new(id * 100 + 1), "often", 1, None).unwrap(),
            ],
        )
        .unwrap();
        Survey::new(SurveyId::new(id), format!("survey {id}"), kind, vec![question]).unwrap()
    }

    fn pre_survey(id: u64) -> Survey {
        survey(id, SurveyKind::PreFeedback)
    }

    fn completing_submission(survey: &Survey) -> SurveySubmission {
        let answers = survey
            .questions()
            .iter()
            .map(|q| Answer::new(q.id(), q.options()[0].id()))
            .collect();
        SurveySubmission::new(survey.id(), LearnerId::generate(), answers, fixed_now()).unwrap()
    }

    #[test]
    fn unenrolled_learner_is_locked_before_surveys_are_mentioned() {
        let surveys = vec![pre_survey(1)];
        let snapshot = GateSnapshot {
            enrolled: false,
            surveys: &surveys,
            submissions: &[],
            program_viewed: false,
        };

        let gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(gate.state(), GateState::Locked(LockReason::NotEnrolled));
        assert_eq!(gate.can_access_program(), Err(GateDenied::NotEnrolled));
        assert_eq!(gate.can_access_post_surveys(), Err(GateDenied::NotEnrolled));
    }

    #[test]
    fn pending_surveys_block_with_learner_facing_message() {
        let surveys = vec![pre_survey(1)];
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &surveys,
            submissions: &[],
            program_viewed: false,
        };

        let gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(gate.state(), GateState::PreSurveysPending);

        let denial = gate.can_access_program().unwrap_err();
        assert!(denial.to_string().contains("hoàn thành tất cả khảo sát trước"));
    }

    #[test]
    fn only_pre_feedback_surveys_gate_entry() {
        // Risk-assessment and post-feedback surveys never block the door.
        let surveys = vec![
            survey(1, SurveyKind::RiskAssessment),
            survey(2, SurveyKind::PostFeedback),
        ];
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &surveys,
            submissions: &[],
            program_viewed: false,
        };

        let gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(gate.state(), GateState::ProgramUnlocked);
    }

    #[test]
    fn no_pre_surveys_unlocks_immediately() {
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &[],
            submissions: &[],
            program_viewed: false,
        };

        let gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(gate.state(), GateState::ProgramUnlocked);
        assert!(gate.can_access_program().is_ok());
    }

    #[test]
    fn post_surveys_require_a_view() {
        let surveys = vec![pre_survey(1)];
        let submissions = vec![completing_submission(&surveys[0])];
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &surveys,
            submissions: &submissions,
            program_viewed: false,
        };

        let mut gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(
            gate.can_access_post_surveys(),
            Err(GateDenied::ProgramNotViewed)
        );

        gate.record_program_opened().unwrap();
        assert_eq!(gate.state(), GateState::ProgramViewed);
        assert!(gate.can_access_post_surveys().is_ok());
    }

    #[test]
    fn repeated_opens_are_idempotent() {
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &[],
            submissions: &[],
            program_viewed: false,
        };

        let mut gate = ProgramGate::from_snapshot(&snapshot);
        gate.record_program_opened().unwrap();
        let after_first = gate.state();

        gate.record_program_opened().unwrap();
        assert_eq!(gate.state(), after_first);
        assert_eq!(gate.state(), GateState::ProgramViewed);
    }

    #[test]
    fn open_is_rejected_without_state_change_when_blocked() {
        let surveys = vec![pre_survey(1)];
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &surveys,
            submissions: &[],
            program_viewed: false,
        };

        let mut gate = ProgramGate::from_snapshot(&snapshot);
        let err = gate.record_program_opened().unwrap_err();
        assert_eq!(err, GateDenied::PreSurveysPending);
        assert_eq!(gate.state(), GateState::PreSurveysPending);
    }

    #[test]
    fn stored_view_unlocks_post_surveys() {
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &[],
            submissions: &[],
            program_viewed: true,
        };

        let gate = ProgramGate::from_snapshot(&snapshot);
        assert_eq!(gate.state(), GateState::PostSurveysUnlocked);
        assert!(gate.can_access_post_surveys().is_ok());
    }

    #[test]
    fn refresh_never_clears_a_local_view() {
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &[],
            submissions: &[],
            program_viewed: false,
        };

        let mut gate = ProgramGate::from_snapshot(&snapshot);
        gate.record_program_opened().unwrap();

        // The store has not caught up; the snapshot still says unviewed.
        gate.refresh(&snapshot);
        assert_eq!(gate.state(), GateState::ProgramViewed);
        assert!(gate.can_access_post_surveys().is_ok());
    }

    #[test]
    fn refresh_applies_regressions_other_than_the_view() {
        let snapshot = GateSnapshot {
            enrolled: true,
            surveys: &[],
            submissions: &[],
            program_viewed: false,
        };
        let mut gate = ProgramGate::from_snapshot(&snapshot);
        gate.record_program_opened().unwrap();

        // A survey revision added a new required pre-survey.
        let surveys = vec![pre_survey(2)];
        let revised = GateSnapshot {
            enrolled: true,
            surveys: &surveys,
            submissions: &[],
            program_viewed: false,
        };
        gate.refresh(&revised);
        assert_eq!(gate.state(), GateState::PreSurveysPending);
    }
}
