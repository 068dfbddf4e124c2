use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::model::ids::{CourseId, ProgramId};
use crate::model::risk::RiskLevel;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgramError {
    #[error("program name cannot be empty")]
    EmptyName,

    #[error("course name cannot be empty")]
    EmptyCourseName,

    #[error("program must start before it ends")]
    InvalidDateRange,

    #[error("video URI is not a valid URL")]
    InvalidVideoUri,
}

//
// ─── VIDEO URI ─────────────────────────────────────────────────────────────────
//

/// Validated URL of a program's introduction video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUri(Url);

impl VideoUri {
    /// Parses a video URL.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError::InvalidVideoUri` if the string is empty or
    /// not a parseable URL.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ProgramError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(ProgramError::InvalidVideoUri);
        }
        let url = Url::parse(s).map_err(|_| ProgramError::InvalidVideoUri)?;
        Ok(Self(url))
    }

    #[must_use]
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

//
// ─── PROGRAM ───────────────────────────────────────────────────────────────────
//

/// A prevention program: the unit learners enroll in and progress through.
///
/// `risk_level` is the audience the program targets, used by the
/// recommendation matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    id: ProgramId,
    name: String,
    description: Option<String>,
    risk_level: RiskLevel,
    video: Option<VideoUri>,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
}

impl Program {
    /// Creates a new program.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError::EmptyName` if the name is empty or
    /// whitespace-only, or `ProgramError::InvalidDateRange` unless the
    /// program starts strictly before it ends.
    pub fn new(
        id: ProgramId,
        name: impl Into<String>,
        description: Option<String>,
        risk_level: RiskLevel,
        video: Option<VideoUri>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<Self, ProgramError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProgramError::EmptyName);
        }
        if starts_at >= ends_at {
            return Err(ProgramError::InvalidDateRange);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            risk_level,
            video,
            starts_at,
            ends_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    #[must_use]
    pub fn video(&self) -> Option<&VideoUri> {
        self.video.as_ref()
    }

    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    #[must_use]
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Whether the program is running at the given instant.
    #[must_use]
    pub fn is_active_at(&self, instant: DateTime<Utc>) -> bool {
        self.starts_at <= instant && instant < self.ends_at
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// Standalone recommendable content outside any program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    name: String,
    description: Option<String>,
    risk_level: RiskLevel,
}

impl Course {
    /// Creates a new course.
    ///
    /// # Errors
    ///
    /// Returns `ProgramError::EmptyCourseName` if the name is empty or
    /// whitespace-only.
    pub fn new(
        id: CourseId,
        name: impl Into<String>,
        description: Option<String>,
        risk_level: RiskLevel,
    ) -> Result<Self, ProgramError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProgramError::EmptyCourseName);
        }

        let description = description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            description,
            risk_level,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }
}

//
// ─── CATALOG ITEM ──────────────────────────────────────────────────────────────
//

/// One entry in the recommendable catalog, either a program or a course.
///
/// The matcher treats both uniformly through `risk_level`; only program
/// entries can be decorated with enrollment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogItem {
    Program(Program),
    Course(Course),
}

impl CatalogItem {
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::Program(p) => p.risk_level(),
            Self::Course(c) => c.risk_level(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Program(p) => p.name(),
            Self::Course(c) => c.name(),
        }
    }

    /// The program id when this entry is a program.
    #[must_use]
    pub fn program_id(&self) -> Option<ProgramId> {
        match self {
            Self::Program(p) => Some(p.id()),
            Self::Course(_) => None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    fn program(id: u64, level: RiskLevel) -> Program {
        let now = fixed_now();
        Program::new(
            ProgramId::new(id),
            format!("program {id}"),
            None,
            level,
            None,
            now,
            now + Duration::days(30),
        )
        .unwrap()
    }

    #[test]
    fn program_new_rejects_empty_name() {
        let now = fixed_now();
        let err = Program::new(
            ProgramId::new(1),
            "  ",
            None,
            RiskLevel::None,
            None,
            now,
            now + Duration::days(1),
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::EmptyName);
    }

    #[test]
    fn program_must_start_before_it_ends() {
        let now = fixed_now();
        let err = Program::new(
            ProgramId::new(1),
            "Healthy choices",
            None,
            RiskLevel::Low,
            None,
            now,
            now,
        )
        .unwrap_err();
        assert_eq!(err, ProgramError::InvalidDateRange);
    }

    #[test]
    fn program_happy_path_trims_fields() {
        let now = fixed_now();
        let program = Program::new(
            ProgramId::new(3),
            "  Healthy choices  ",
            Some("  about alcohol  ".into()),
            RiskLevel::Medium,
            None,
            now,
            now + Duration::days(30),
        )
        .unwrap();

        assert_eq!(program.name(), "Healthy choices");
        assert_eq!(program.description(), Some("about alcohol"));
        assert_eq!(program.risk_level(), RiskLevel::Medium);
        assert!(program.is_active_at(now + Duration::days(10)));
        assert!(!program.is_active_at(now + Duration::days(30)));
    }

    #[test]
    fn video_uri_parses_and_rejects() {
        let uri = VideoUri::parse("https://videos.example.org/intro.mp4").unwrap();
        assert_eq!(uri.as_str(), "https://videos.example.org/intro.mp4");

        assert_eq!(VideoUri::parse("").unwrap_err(), ProgramError::InvalidVideoUri);
        assert_eq!(
            VideoUri::parse("not a url").unwrap_err(),
            ProgramError::InvalidVideoUri
        );
    }

    #[test]
    fn course_rejects_empty_name() {
        let err = Course::new(CourseId::new(1), "   ", None, RiskLevel::Low).unwrap_err();
        assert_eq!(err, ProgramError::EmptyCourseName);
    }

    #[test]
    fn catalog_item_exposes_level_uniformly() {
        let program_item = CatalogItem::Program(program(1, RiskLevel::High));
        let course_item = CatalogItem::Course(
            Course::new(CourseId::new(2), "Refusal skills", None, RiskLevel::High).unwrap(),
        );

        assert_eq!(program_item.risk_level(), RiskLevel::High);
        assert_eq!(course_item.risk_level(), RiskLevel::High);
        assert_eq!(program_item.program_id(), Some(ProgramId::new(1)));
        assert_eq!(course_item.program_id(), None);
    }
}
