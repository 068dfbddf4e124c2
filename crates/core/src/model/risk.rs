use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ThresholdError {
    #[error("risk thresholds must be strictly ascending")]
    NotAscending,
}

//
// ─── RISK LEVEL ────────────────────────────────────────────────────────────────
//

/// Five-level ordinal risk classification for a learner.
///
/// Levels are ordered from least to most severe, so `Ord` comparisons
/// express severity directly (`RiskLevel::High > RiskLevel::Low`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// No indication of risk.
    None,
    /// Mild indication, informational follow-up only.
    Low,
    /// Moderate indication, targeted content recommended.
    Medium,
    /// Strong indication, intervention content recommended.
    High,
    /// Severe indication, highest-priority intervention.
    VeryHigh,
}

impl RiskLevel {
    /// Parses a server-reported label into a level, ignoring case.
    ///
    /// Returns `None` for unrecognized labels so the caller can fall back
    /// to score-based classification.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "very high" | "veryhigh" | "very_high" => Some(Self::VeryHigh),
            _ => None,
        }
    }

    /// Canonical label for this level.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

//
// ─── THRESHOLDS ────────────────────────────────────────────────────────────────
//

/// Score cutoffs mapping a total survey score onto a `RiskLevel`.
///
/// Each field is the highest score (inclusive) still classified at that
/// level; anything above `high_max` is `VeryHigh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskThresholds {
    none_max: i64,
    low_max: i64,
    medium_max: i64,
    high_max: i64,
}

impl RiskThresholds {
    /// Creates custom threshold cutoffs.
    ///
    /// # Errors
    ///
    /// Returns `ThresholdError::NotAscending` unless the cutoffs are
    /// strictly increasing.
    pub fn new(
        none_max: i64,
        low_max: i64,
        medium_max: i64,
        high_max: i64,
    ) -> Result<Self, ThresholdError> {
        if none_max >= low_max || low_max >= medium_max || medium_max >= high_max {
            return Err(ThresholdError::NotAscending);
        }
        Ok(Self {
            none_max,
            low_max,
            medium_max,
            high_max,
        })
    }

    /// The cutoffs the portal ships with: 10 / 20 / 30 / 40.
    #[must_use]
    pub fn default_policy() -> Self {
        Self {
            none_max: 10,
            low_max: 20,
            medium_max: 30,
            high_max: 40,
        }
    }

    /// Classifies a total score against these cutoffs.
    #[must_use]
    pub fn level_for(&self, total_score: i64) -> RiskLevel {
        if total_score <= self.none_max {
            RiskLevel::None
        } else if total_score <= self.low_max {
            RiskLevel::Low
        } else if total_score <= self.medium_max {
            RiskLevel::Medium
        } else if total_score <= self.high_max {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }

    // Accessors
    #[must_use]
    pub fn none_max(&self) -> i64 {
        self.none_max
    }

    #[must_use]
    pub fn low_max(&self) -> i64 {
        self.low_max
    }

    #[must_use]
    pub fn medium_max(&self) -> i64 {
        self.medium_max
    }

    #[must_use]
    pub fn high_max(&self) -> i64 {
        self.high_max
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_by_severity() {
        assert!(RiskLevel::None < RiskLevel::Low);
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::VeryHigh);
    }

    #[test]
    fn label_parsing_ignores_case_and_whitespace() {
        assert_eq!(RiskLevel::from_label("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_label("  LOW "), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_label("Very High"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::from_label("very_high"), Some(RiskLevel::VeryHigh));
        assert_eq!(RiskLevel::from_label("unknown"), None);
        assert_eq!(RiskLevel::from_label(""), None);
    }

    #[test]
    fn canonical_labels_round_trip() {
        for level in [
            RiskLevel::None,
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
            RiskLevel::VeryHigh,
        ] {
            assert_eq!(RiskLevel::from_label(level.as_str()), Some(level));
        }
    }

    #[test]
    fn default_policy_boundaries() {
        let policy = RiskThresholds::default_policy();
        assert_eq!(policy.level_for(0), RiskLevel::None);
        assert_eq!(policy.level_for(10), RiskLevel::None);
        assert_eq!(policy.level_for(11), RiskLevel::Low);
        assert_eq!(policy.level_for(20), RiskLevel::Low);
        assert_eq!(policy.level_for(21), RiskLevel::Medium);
        assert_eq!(policy.level_for(30), RiskLevel::Medium);
        assert_eq!(policy.level_for(31), RiskLevel::High);
        assert_eq!(policy.level_for(40), RiskLevel::High);
        assert_eq!(policy.level_for(41), RiskLevel::VeryHigh);
    }

    #[test]
    fn custom_thresholds_must_ascend() {
        let err = RiskThresholds::new(10, 10, 30, 40).unwrap_err();
        assert_eq!(err, ThresholdError::NotAscending);

        let err = RiskThresholds::new(10, 20, 40, 30).unwrap_err();
        assert_eq!(err, ThresholdError::NotAscending);

        let custom = RiskThresholds::new(5, 15, 25, 35).unwrap();
        assert_eq!(custom.level_for(36), RiskLevel::VeryHigh);
    }

    #[test]
    fn negative_scores_classify_as_none() {
        let policy = RiskThresholds::default_policy();
        assert_eq!(policy.level_for(-3), RiskLevel::None);
    }
}
