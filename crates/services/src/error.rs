//! Shared error types for the services crate.

use thiserror::Error;

use portal_core::gate::GateDenied;
use snapshots::SnapshotError;

/// Errors emitted by the progression flow.
///
/// `Guard` carries the learner-facing denial text; the UI renders it as
/// a warning, never as a crash.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Guard(#[from] GateDenied),
}

/// Errors emitted by `AssessmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("no risk assessment submission on record")]
    MissingSubmission,
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Errors emitted by `EnrollmentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EnrollmentServiceError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
