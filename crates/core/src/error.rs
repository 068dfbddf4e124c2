use thiserror::Error;

use crate::gate::GateDenied;
use crate::model::{ProgramError, SubmissionError, SurveyError, ThresholdError};
use crate::recommend::MatchError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Survey(#[from] SurveyError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Threshold(#[from] ThresholdError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Gate(#[from] GateDenied),
}
