use chrono::{DateTime, Utc};

use crate::model::ids::{LearnerId, ProgramId};

/// Record of a learner joining a program.
///
/// Enrollment is the access proof for everything under a program, so this
/// stays a plain event record; the gate logic lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub learner_id: LearnerId,
    pub program_id: ProgramId,
    pub joined_at: DateTime<Utc>,
}

impl Enrollment {
    #[must_use]
    pub fn new(learner_id: LearnerId, program_id: ProgramId, joined_at: DateTime<Utc>) -> Self {
        Self {
            learner_id,
            program_id,
            joined_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
