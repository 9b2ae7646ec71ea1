use serde::Deserialize;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankingError {
    #[error("a ranking needs at least one band")]
    NoBands,

    #[error("band thresholds must be strictly descending")]
    ThresholdsNotDescending,

    #[error("the final band must have threshold 0 so every score classifies")]
    MissingCatchAllBand,

    #[error("percentage thresholds cannot exceed 100, got {0}")]
    ThresholdAbove100(u32),
}

//
// ─── BANDS ─────────────────────────────────────────────────────────────────────
//

/// One tier of the final ranking: a cut point plus its decorative label.
///
/// Thresholds and labels are configuration data per challenge set, never
/// engine logic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankBand {
    pub threshold: u32,
    pub name: String,
    pub badge: String,
}

impl RankBand {
    #[must_use]
    pub fn new(threshold: u32, name: impl Into<String>, badge: impl Into<String>) -> Self {
        Self {
            threshold,
            name: name.into(),
            badge: badge.into(),
        }
    }
}

/// Unvalidated ranking data, as authored or deserialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingDraft {
    /// Thresholds are percentages of the total item count.
    Percentage(Vec<RankBand>),
    /// Thresholds are absolute score cut points.
    Absolute(Vec<RankBand>),
}

impl RankingDraft {
    /// Validate the band table.
    ///
    /// # Errors
    ///
    /// Returns `RankingError` when the table is empty, thresholds are not
    /// strictly descending, the last band is not a catch-all at 0, or a
    /// percentage threshold exceeds 100.
    pub fn validate(self) -> Result<RankingScheme, RankingError> {
        let (mode, bands) = match self {
            Self::Percentage(bands) => (RankMode::Percentage, bands),
            Self::Absolute(bands) => (RankMode::Absolute, bands),
        };

        let Some(last) = bands.last() else {
            return Err(RankingError::NoBands);
        };
        if last.threshold != 0 {
            return Err(RankingError::MissingCatchAllBand);
        }
        for pair in bands.windows(2) {
            if pair[0].threshold <= pair[1].threshold {
                return Err(RankingError::ThresholdsNotDescending);
            }
        }
        if mode == RankMode::Percentage {
            if let Some(band) = bands.iter().find(|band| band.threshold > 100) {
                return Err(RankingError::ThresholdAbove100(band.threshold));
            }
        }

        Ok(RankingScheme { mode, bands })
    }
}

//
// ─── SCHEME ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RankMode {
    Percentage,
    Absolute,
}

/// A validated band table mapping a final score to a named tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingScheme {
    mode: RankMode,
    bands: Vec<RankBand>,
}

impl RankingScheme {
    /// Percentage-based bands (quizzes).
    ///
    /// # Errors
    ///
    /// Returns `RankingError` for an invalid band table.
    pub fn percentage(bands: Vec<RankBand>) -> Result<Self, RankingError> {
        RankingDraft::Percentage(bands).validate()
    }

    /// Absolute-score bands (the memory game).
    ///
    /// # Errors
    ///
    /// Returns `RankingError` for an invalid band table.
    pub fn absolute(bands: Vec<RankBand>) -> Result<Self, RankingError> {
        RankingDraft::Absolute(bands).validate()
    }

    /// True when this scheme ranks by percentage of a known total.
    #[must_use]
    pub fn is_percentage(&self) -> bool {
        self.mode == RankMode::Percentage
    }

    /// Classify a frozen final score into its tier.
    ///
    /// For percentage schemes the value compared against the thresholds is
    /// `score * 100 / total`; percentage schemes are only paired with fixed
    /// banks, so `total` is present and non-zero there.
    #[must_use]
    pub fn classify(&self, score: u32, total: Option<u32>) -> RankResult {
        let value = match self.mode {
            RankMode::Absolute => score,
            RankMode::Percentage => match total {
                Some(total) if total > 0 => score.saturating_mul(100) / total,
                _ => 0,
            },
        };

        for band in &self.bands {
            if value >= band.threshold {
                return RankResult {
                    points: score,
                    rank: band.name.clone(),
                    badge: band.badge.clone(),
                };
            }
        }

        // Unreachable for a validated table: the catch-all band matches any value.
        RankResult {
            points: score,
            rank: String::new(),
            badge: String::new(),
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// The derived final standing of a session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankResult {
    pub points: u32,
    pub rank: String,
    pub badge: String,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn three_bands() -> Vec<RankBand> {
        vec![
            RankBand::new(80, "Expert", "🏆"),
            RankBand::new(60, "Intermediate", "🎯"),
            RankBand::new(0, "Beginner", "🌱"),
        ]
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = RankingScheme::percentage(Vec::new()).unwrap_err();
        assert!(matches!(err, RankingError::NoBands));
    }

    #[test]
    fn missing_catch_all_is_rejected() {
        let bands = vec![RankBand::new(80, "Expert", "🏆")];
        let err = RankingScheme::percentage(bands).unwrap_err();
        assert!(matches!(err, RankingError::MissingCatchAllBand));
    }

    #[test]
    fn thresholds_must_descend() {
        let bands = vec![
            RankBand::new(60, "A", "a"),
            RankBand::new(80, "B", "b"),
            RankBand::new(0, "C", "c"),
        ];
        let err = RankingScheme::percentage(bands).unwrap_err();
        assert!(matches!(err, RankingError::ThresholdsNotDescending));
    }

    #[test]
    fn percentage_thresholds_are_capped() {
        let bands = vec![RankBand::new(120, "A", "a"), RankBand::new(0, "C", "c")];
        let err = RankingScheme::percentage(bands).unwrap_err();
        assert!(matches!(err, RankingError::ThresholdAbove100(120)));
    }

    #[test]
    fn percentage_classification_uses_band_boundaries() {
        let scheme = RankingScheme::percentage(three_bands()).unwrap();

        let top = scheme.classify(8, Some(10));
        assert_eq!(top.rank, "Expert");
        assert_eq!(top.points, 8);

        let mid = scheme.classify(6, Some(10));
        assert_eq!(mid.rank, "Intermediate");

        let low = scheme.classify(3, Some(10));
        assert_eq!(low.rank, "Beginner");
        assert_eq!(low.badge, "🌱");
    }

    #[test]
    fn absolute_classification_ignores_total() {
        let bands = vec![
            RankBand::new(8, "Mental Math Master", "🧠"),
            RankBand::new(4, "Quick Thinker", "⚡"),
            RankBand::new(0, "Warm-Up", "🌱"),
        ];
        let scheme = RankingScheme::absolute(bands).unwrap();

        assert_eq!(scheme.classify(9, None).rank, "Mental Math Master");
        assert_eq!(scheme.classify(4, None).rank, "Quick Thinker");
        assert_eq!(scheme.classify(0, None).rank, "Warm-Up");
    }

    #[test]
    fn classification_is_pure() {
        let scheme = RankingScheme::percentage(three_bands()).unwrap();
        assert_eq!(scheme.classify(7, Some(10)), scheme.classify(7, Some(10)));
    }
}
