//! Enrollment actions and ledger snapshots.

use std::sync::Arc;

use portal_core::Clock;
use portal_core::ledger::EnrollmentLedger;
use portal_core::model::{Enrollment, LearnerId, ProgramId};
use snapshots::{EnrollmentRepository, Snapshots};

use crate::error::EnrollmentServiceError;

/// Records program joins and serves enrollment ledgers.
#[derive(Clone)]
pub struct EnrollmentService {
    clock: Clock,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    #[must_use]
    pub fn new(snapshots: &Snapshots) -> Self {
        Self {
            clock: Clock::default_clock(),
            enrollments: Arc::clone(&snapshots.enrollments),
        }
    }

    /// Replaces the clock, for deterministic tests.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The learner's current enrollment ledger.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentServiceError::Snapshot` when the source fails.
    pub async fn ledger(
        &self,
        learner_id: LearnerId,
    ) -> Result<EnrollmentLedger, EnrollmentServiceError> {
        let records = self.enrollments.enrollments_for_learner(learner_id).await?;
        Ok(EnrollmentLedger::from_snapshot(learner_id, &records))
    }

    /// Joins the learner to a program, stamped with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `EnrollmentServiceError::Snapshot` when the enrollment
    /// cannot be recorded.
    pub async fn join_program(
        &self,
        learner_id: LearnerId,
        program_id: ProgramId,
    ) -> Result<Enrollment, EnrollmentServiceError> {
        let enrollment = Enrollment::new(learner_id, program_id, self.clock.now());
        self.enrollments.record_enrollment(&enrollment).await?;
        Ok(enrollment)
    }
}
