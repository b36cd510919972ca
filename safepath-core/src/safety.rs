//! Safety ratings attached to scored routes.

use std::fmt;

/// Lowest score a rating can carry.
pub const MIN_SCORE: u8 = 30;
/// Highest score a rating can carry.
pub const MAX_SCORE: u8 = 100;
/// Scores at or above this value are [`SafetyLevel::High`].
pub const HIGH_THRESHOLD: u8 = 80;
/// Scores at or above this value (and below [`HIGH_THRESHOLD`]) are
/// [`SafetyLevel::Moderate`].
pub const MODERATE_THRESHOLD: u8 = 60;

const HIGH_REASONS: [&str; 3] = [
    "Well-lit streets",
    "High pedestrian traffic",
    "Safe neighborhood",
];
const MODERATE_REASONS: [&str; 3] = [
    "Moderate lighting",
    "Some pedestrian traffic",
    "Mixed neighborhood safety",
];
const LOW_REASONS: [&str; 3] = [
    "Poor lighting",
    "Low pedestrian traffic",
    "Higher crime area",
];

/// Safety category derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum SafetyLevel {
    /// Score of at least [`HIGH_THRESHOLD`].
    High,
    /// Score in `MODERATE_THRESHOLD..HIGH_THRESHOLD`.
    Moderate,
    /// Score below [`MODERATE_THRESHOLD`].
    Low,
}

impl SafetyLevel {
    /// Categorise a score using the fixed thresholds.
    ///
    /// # Examples
    /// ```
    /// use safepath_core::SafetyLevel;
    ///
    /// assert_eq!(SafetyLevel::from_score(80), SafetyLevel::High);
    /// assert_eq!(SafetyLevel::from_score(79), SafetyLevel::Moderate);
    /// assert_eq!(SafetyLevel::from_score(59), SafetyLevel::Low);
    /// ```
    pub const fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Display colour bound to the level.
    pub const fn color(self) -> &'static str {
        match self {
            Self::High => "#4CAF50",
            Self::Moderate => "#FFC107",
            Self::Low => "#F44336",
        }
    }

    /// Fixed rationale shown alongside the level.
    pub const fn reasons(self) -> &'static [&'static str; 3] {
        match self {
            Self::High => &HIGH_REASONS,
            Self::Moderate => &MODERATE_REASONS,
            Self::Low => &LOW_REASONS,
        }
    }

    /// Short user-facing label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "Safe",
            Self::Moderate => "Moderate",
            Self::Low => "Caution",
        }
    }

    /// Lowercase identifier, matching the serialised form.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety score, category, colour and rationale for one route.
///
/// Only the score is free; everything else is derived from it, so a rating
/// can never disagree with its own thresholds.
///
/// # Examples
/// ```
/// use safepath_core::{SafetyLevel, SafetyRating};
///
/// let rating = SafetyRating::from_score(70);
/// assert_eq!(rating.level(), SafetyLevel::Moderate);
/// assert_eq!(rating.color(), "#FFC107");
///
/// // Out-of-range scores are clamped.
/// assert_eq!(SafetyRating::from_score(5).score(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SafetyRating {
    score: u8,
    level: SafetyLevel,
    color: &'static str,
    reasons: &'static [&'static str; 3],
}

impl SafetyRating {
    /// Build a rating from an integer score, clamping to
    /// `MIN_SCORE..=MAX_SCORE`.
    pub const fn from_score(score: u8) -> Self {
        let clamped = if score < MIN_SCORE {
            MIN_SCORE
        } else if score > MAX_SCORE {
            MAX_SCORE
        } else {
            score
        };
        let level = SafetyLevel::from_score(clamped);
        Self {
            score: clamped,
            level,
            color: level.color(),
            reasons: level.reasons(),
        }
    }

    /// Build a rating from an unbounded raw value.
    ///
    /// The value is clamped to `MIN_SCORE..=MAX_SCORE` and rounded half away
    /// from zero. Non-finite input yields [`MIN_SCORE`].
    pub fn from_raw(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self::from_score(MIN_SCORE);
        }
        let clamped = raw.clamp(f64::from(MIN_SCORE), f64::from(MAX_SCORE));
        // The clamp keeps the rounded value inside `u8`.
        Self::from_score(clamped.round() as u8)
    }

    /// Integer score in `MIN_SCORE..=MAX_SCORE`.
    pub const fn score(&self) -> u8 {
        self.score
    }

    /// Category derived from the score.
    pub const fn level(&self) -> SafetyLevel {
        self.level
    }

    /// Display colour for the category.
    pub const fn color(&self) -> &'static str {
        self.color
    }

    /// Fixed rationale for the category.
    pub const fn reasons(&self) -> &'static [&'static str; 3] {
        self.reasons
    }
}
