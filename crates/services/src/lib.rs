#![forbid(unsafe_code)]

pub mod assessment_service;
pub mod enrollment_service;
pub mod error;
pub mod progression;

pub use portal_core::Clock;

pub use assessment_service::{AssessmentService, RiskReport};
pub use enrollment_service::EnrollmentService;
pub use error::{AssessmentError, EnrollmentServiceError, ProgressionError};
pub use progression::{GateView, ProgressionFlowService, ProgressionSession};
