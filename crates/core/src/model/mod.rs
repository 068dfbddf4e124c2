mod enrollment;
mod ids;
mod program;
mod risk;
mod submission;
mod survey;

pub use ids::{AnswerOptionId, CourseId, LearnerId, ParseIdError, ProgramId, QuestionId, SurveyId};

pub use enrollment::Enrollment;
pub use program::{CatalogItem, Course, Program, ProgramError, VideoUri};
pub use risk::{RiskLevel, RiskThresholds, ThresholdError};
pub use submission::{Answer, SubmissionError, SurveySubmission};
pub use survey::{AnswerOption, Question, Survey, SurveyError, SurveyKind};
