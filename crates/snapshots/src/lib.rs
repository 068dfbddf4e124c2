#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    CatalogRepository, EnrollmentRepository, InMemorySnapshots, SnapshotError, Snapshots,
    SubmissionRepository, SurveyRepository,
};
pub use rest::{RestClient, RestConfig};
