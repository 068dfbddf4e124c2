use std::collections::HashSet;

use crate::model::{Enrollment, LearnerId, ProgramId};

/// In-memory snapshot of one learner's enrollments.
///
/// Built from fetched enrollment records so that gate checks and catalog
/// decoration answer membership questions without further lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentLedger {
    learner_id: LearnerId,
    programs: HashSet<ProgramId>,
}

impl EnrollmentLedger {
    /// Creates an empty ledger for a learner.
    #[must_use]
    pub fn new(learner_id: LearnerId) -> Self {
        Self {
            learner_id,
            programs: HashSet::new(),
        }
    }

    /// Builds a ledger from enrollment records, keeping only the learner's own.
    #[must_use]
    pub fn from_snapshot(learner_id: LearnerId, enrollments: &[Enrollment]) -> Self {
        let programs = enrollments
            .iter()
            .filter(|e| e.learner_id == learner_id)
            .map(|e| e.program_id)
            .collect();
        Self {
            learner_id,
            programs,
        }
    }

    /// Records a newly joined program. Joining twice is harmless.
    pub fn record(&mut self, program_id: ProgramId) {
        self.programs.insert(program_id);
    }

    #[must_use]
    pub fn is_enrolled(&self, program_id: ProgramId) -> bool {
        self.programs.contains(&program_id)
    }

    #[must_use]
    pub fn learner_id(&self) -> LearnerId {
        self.learner_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn snapshot_keeps_only_own_enrollments() {
        let me = LearnerId::generate();
        let someone_else = LearnerId::generate();
        let records = vec![
            Enrollment::new(me, ProgramId::new(1), fixed_now()),
            Enrollment::new(someone_else, ProgramId::new(2), fixed_now()),
            Enrollment::new(me, ProgramId::new(3), fixed_now()),
        ];

        let ledger = EnrollmentLedger::from_snapshot(me, &records);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_enrolled(ProgramId::new(1)));
        assert!(!ledger.is_enrolled(ProgramId::new(2)));
        assert!(ledger.is_enrolled(ProgramId::new(3)));
    }

    #[test]
    fn record_is_idempotent() {
        let mut ledger = EnrollmentLedger::new(LearnerId::generate());
        assert!(ledger.is_empty());

        ledger.record(ProgramId::new(7));
        ledger.record(ProgramId::new(7));
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_enrolled(ProgramId::new(7)));
    }
}
