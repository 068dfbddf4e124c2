//! Catalog recommendation matching.
//!
//! Matching is an exact-level equality filter over the catalog in the
//! order the catalog came in, capped at a fixed count. No scoring, no
//! fuzzy inclusion of neighboring levels, no re-ranking.

use thiserror::Error;

use crate::ledger::EnrollmentLedger;
use crate::model::{CatalogItem, RiskLevel};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MatchError {
    #[error("max recommendations must be > 0")]
    InvalidMaxItems,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration for the recommendation matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatcherSettings {
    max_items: usize,
}

impl MatcherSettings {
    /// Creates custom matcher settings.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::InvalidMaxItems` if the cap is zero.
    pub fn new(max_items: usize) -> Result<Self, MatchError> {
        if max_items == 0 {
            return Err(MatchError::InvalidMaxItems);
        }
        Ok(Self { max_items })
    }

    /// The cap the portal ships with: at most 6 recommendations.
    #[must_use]
    pub fn default_policy() -> Self {
        Self { max_items: 6 }
    }

    #[must_use]
    pub fn max_items(&self) -> usize {
        self.max_items
    }
}

//
// ─── RECOMMENDATION ────────────────────────────────────────────────────────────
//

/// Whether the learner already joined the recommended program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    /// The item is a course; enrollment does not apply.
    NotApplicable,
    Enrolled,
    NotEnrolled,
}

/// A matched catalog item decorated with the learner's enrollment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    item: CatalogItem,
    enrollment: EnrollmentStatus,
}

impl Recommendation {
    #[must_use]
    pub fn item(&self) -> &CatalogItem {
        &self.item
    }

    #[must_use]
    pub fn enrollment(&self) -> EnrollmentStatus {
        self.enrollment
    }
}

//
// ─── MATCHER ───────────────────────────────────────────────────────────────────
//

/// Selects catalog items for a classified risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationMatcher {
    settings: MatcherSettings,
}

impl RecommendationMatcher {
    #[must_use]
    pub fn new(settings: MatcherSettings) -> Self {
        Self { settings }
    }

    /// Matcher with the portal's shipped cap.
    #[must_use]
    pub fn with_default_policy() -> Self {
        Self::new(MatcherSettings::default_policy())
    }

    #[must_use]
    pub fn settings(&self) -> MatcherSettings {
        self.settings
    }

    /// The first N catalog items targeting exactly the given level, in
    /// catalog order, each decorated with the learner's enrollment status.
    ///
    /// Programs carry `Enrolled`/`NotEnrolled` from the ledger; courses
    /// carry `NotApplicable`. Decoration never removes an item, and an
    /// empty result just means nothing in the catalog targets the level.
    #[must_use]
    pub fn matches(
        &self,
        level: RiskLevel,
        catalog: &[CatalogItem],
        ledger: &EnrollmentLedger,
    ) -> Vec<Recommendation> {
        catalog
            .iter()
            .filter(|item| item.risk_level() == level)
            .take(self.settings.max_items)
            .map(|item| {
                let enrollment = match item.program_id() {
                    None => EnrollmentStatus::NotApplicable,
                    Some(id) if ledger.is_enrolled(id) => EnrollmentStatus::Enrolled,
                    Some(_) => EnrollmentStatus::NotEnrolled,
                };
                Recommendation {
                    item: item.clone(),
                    enrollment,
                }
            })
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
