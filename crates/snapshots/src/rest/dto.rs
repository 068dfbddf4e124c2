//! Wire shapes for the portal's JSON API.
//!
//! DTOs mirror the payloads as the backend sends them; conversion into
//! domain types runs the domain validations, so a payload the backend
//! mangled surfaces as `SnapshotError::Malformed` instead of leaking an
//! invalid survey or program into the engine.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use portal_core::model::{
    Answer, AnswerOption, AnswerOptionId, CatalogItem, Course, CourseId, Enrollment, LearnerId,
    Program, ProgramId, Question, QuestionId, RiskLevel, Survey, SurveyId, SurveyKind,
    SurveySubmission, VideoUri,
};
use serde::{Deserialize, Serialize};

use crate::repository::SnapshotError;

fn malformed(e: impl Display) -> SnapshotError {
    SnapshotError::Malformed(e.to_string())
}

//
// ─── SURVEYS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerOptionDto {
    id: u64,
    label: String,
    position: u32,
    score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    id: u64,
    text: String,
    position: u32,
    options: Vec<AnswerOptionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SurveyDto {
    id: u64,
    name: String,
    kind: SurveyKind,
    questions: Vec<QuestionDto>,
}

impl SurveyDto {
    pub(crate) fn into_domain(self) -> Result<Survey, SnapshotError> {
        let questions = self
            .questions
            .into_iter()
            .map(|q| {
                let options = q
                    .options
                    .into_iter()
                    .map(|o| {
                        AnswerOption::new(AnswerOptionId::new(o.id), o.label, o.position, o.score)
                            .map_err(malformed)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Question::new(QuestionId::new(q.id), q.text, q.position, options)
                    .map_err(malformed)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Survey::new(SurveyId::new(self.id), self.name, self.kind, questions).map_err(malformed)
    }
}

//
// ─── SUBMISSIONS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AnswerDto {
    question_id: QuestionId,
    option_id: AnswerOptionId,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SubmissionDto {
    survey_id: SurveyId,
    learner_id: LearnerId,
    answers: Vec<AnswerDto>,
    submitted_at: DateTime<Utc>,
    risk_label: Option<String>,
}

impl SubmissionDto {
    pub(crate) fn from_domain(submission: &SurveySubmission) -> Self {
        Self {
            survey_id: submission.survey_id(),
            learner_id: submission.learner_id(),
            answers: submission
                .answers()
                .iter()
                .map(|a| AnswerDto {
                    question_id: a.question_id,
                    option_id: a.option_id,
                })
                .collect(),
            submitted_at: submission.submitted_at(),
            risk_label: submission.reported_risk_label().map(str::to_owned),
        }
    }

    pub(crate) fn into_domain(self) -> Result<SurveySubmission, SnapshotError> {
        let answers = self
            .answers
            .into_iter()
            .map(|a| Answer::new(a.question_id, a.option_id))
            .collect();
        let submission =
            SurveySubmission::new(self.survey_id, self.learner_id, answers, self.submitted_at)
                .map_err(malformed)?;
        Ok(match self.risk_label {
            Some(label) => submission.with_reported_risk_label(label),
            None => submission,
        })
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
pub(crate) struct ProgramDto {
    id: u64,
    name: String,
    description: Option<String>,
    risk_level: RiskLevel,
    video_url: Option<String>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl ProgramDto {
    pub(crate) fn into_domain(self) -> Result<Program, SnapshotError> {
        let video = match self.video_url {
            Some(raw) => Some(VideoUri::parse(&raw).map_err(malformed)?),
            None => None,
        };
        Program::new(
            ProgramId::new(self.id),
            self.name,
            self.description,
            self.risk_level,
            video,
            self.starts_at,
            self.ends_at,
        )
        .map_err(malformed)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseDto {
    id: u64,
    name: String,
    description: Option<String>,
    risk_level: RiskLevel,
}

impl CourseDto {
    pub(crate) fn into_domain(self) -> Result<Course, SnapshotError> {
        Course::new(
            CourseId::new(self.id),
            self.name,
            self.description,
            self.risk_level,
        )
        .map_err(malformed)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum CatalogItemDto {
    Program(ProgramDto),
    Course(CourseDto),
}

impl CatalogItemDto {
    pub(crate) fn into_domain(self) -> Result<CatalogItem, SnapshotError> {
        Ok(match self {
            Self::Program(dto) => CatalogItem::Program(dto.into_domain()?),
            Self::Course(dto) => CatalogItem::Course(dto.into_domain()?),
        })
    }
}

//
// ─── ENROLLMENTS ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EnrollmentDto {
    learner_id: LearnerId,
    program_id: ProgramId,
    joined_at: DateTime<Utc>,
}

impl EnrollmentDto {
    pub(crate) fn from_domain(enrollment: &Enrollment) -> Self {
        Self {
            learner_id: enrollment.learner_id,
            program_id: enrollment.program_id,
            joined_at: enrollment.joined_at,
        }
    }

    pub(crate) fn into_domain(self) -> Enrollment {
        Enrollment::new(self.learner_id, self.program_id, self.joined_at)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
