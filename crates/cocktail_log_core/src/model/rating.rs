//! Rating bands shared by every rating display surface.
//!
//! # Responsibility
//! - Map a numeric rating to one canonical band, label and color token.
//! - Provide the selectable half-step rating scale.
//!
//! # Invariants
//! - Band thresholds are inclusive lower bounds: 9, 7, 5.
//! - Classification is total: out-of-range and NaN inputs still classify.
//! - "Needs Work" is a display alias of `RatingBand::Poor`, not a separate band.

use crate::model::validation::ValidationReason;
use serde::{Deserialize, Serialize};

/// Lowest accepted rating value.
pub const RATING_MIN: f64 = 1.0;
/// Highest accepted rating value.
pub const RATING_MAX: f64 = 10.0;
/// Ratings are quantized to this step.
pub const RATING_STEP: f64 = 0.5;

const EXCELLENT_THRESHOLD: f64 = 9.0;
const GOOD_THRESHOLD: f64 = 7.0;
const OKAY_THRESHOLD: f64 = 5.0;

/// Discrete quality band derived from a numeric rating.
///
/// Variants are declared in rank order, so `Ord` compares quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingBand {
    Poor,
    Okay,
    Good,
    Excellent,
}

impl RatingBand {
    /// Canonical display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Okay => "Okay",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Alternative wording some views use for the same band.
    ///
    /// Only the lowest band has an alias.
    pub fn alias(self) -> Option<&'static str> {
        match self {
            Self::Poor => Some("Needs Work"),
            _ => None,
        }
    }

    /// Theme color token consumed by renderers (`bg-*`/`text-*` prefixes are
    /// a presentation concern).
    pub fn color_token(self) -> &'static str {
        match self {
            Self::Poor => "rating-poor",
            Self::Okay => "rating-okay",
            Self::Good => "rating-good",
            Self::Excellent => "rating-excellent",
        }
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingClass {
    pub band: RatingBand,
    pub label: &'static str,
    pub color_token: &'static str,
}

/// Classifies a rating into its display band.
pub fn classify(rating: f64) -> RatingClass {
    let band = band_for(rating);
    RatingClass {
        band,
        label: band.label(),
        color_token: band.color_token(),
    }
}

/// Returns only the band for a rating.
pub fn band_for(rating: f64) -> RatingBand {
    if rating >= EXCELLENT_THRESHOLD {
        RatingBand::Excellent
    } else if rating >= GOOD_THRESHOLD {
        RatingBand::Good
    } else if rating >= OKAY_THRESHOLD {
        RatingBand::Okay
    } else {
        RatingBand::Poor
    }
}

/// Checks that a stored rating is finite, in range and on a half step.
pub fn check_rating(rating: f64) -> Result<(), ValidationReason> {
    if !rating.is_finite() {
        return Err(ValidationReason::NotFinite);
    }
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(ValidationReason::OutOfRange);
    }
    if (rating / RATING_STEP).fract() != 0.0 {
        return Err(ValidationReason::NotHalfStep);
    }
    Ok(())
}

/// All selectable ratings, ascending: 1.0, 1.5, ..., 10.0.
pub fn rating_scale() -> impl Iterator<Item = f64> {
    let steps = ((RATING_MAX - RATING_MIN) / RATING_STEP) as u32;
    (0..=steps).map(|index| RATING_MIN + f64::from(index) * RATING_STEP)
}

/// Formats a rating with one decimal place, e.g. `8.0`.
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

#[cfg(test)]
mod tests {
    use super::{band_for, check_rating, classify, format_rating, rating_scale, RatingBand};
    use crate::model::validation::ValidationReason;

    #[test]
    fn boundaries_follow_inclusive_lower_bounds() {
        assert_eq!(classify(9.0).band, RatingBand::Excellent);
        assert_eq!(classify(8.9999).band, RatingBand::Good);
        assert_eq!(classify(7.0).band, RatingBand::Good);
        assert_eq!(classify(6.9).band, RatingBand::Okay);
        assert_eq!(classify(5.0).band, RatingBand::Okay);
        assert_eq!(classify(4.9).band, RatingBand::Poor);
    }

    #[test]
    fn classification_is_total_over_out_of_range_values() {
        assert_eq!(band_for(42.0), RatingBand::Excellent);
        assert_eq!(band_for(-3.0), RatingBand::Poor);
        assert_eq!(band_for(f64::NAN), RatingBand::Poor);
        assert_eq!(band_for(f64::INFINITY), RatingBand::Excellent);
    }

    #[test]
    fn band_rank_never_increases_as_rating_decreases() {
        let scale: Vec<f64> = rating_scale().collect();
        for pair in scale.windows(2) {
            assert!(band_for(pair[0]) <= band_for(pair[1]));
            assert_eq!(classify(pair[0]), classify(pair[0]));
        }
    }

    #[test]
    fn scale_has_nineteen_half_steps() {
        let scale: Vec<f64> = rating_scale().collect();
        assert_eq!(scale.len(), 19);
        assert_eq!(scale.first().copied(), Some(1.0));
        assert_eq!(scale.last().copied(), Some(10.0));
        assert!(scale.iter().all(|value| check_rating(*value).is_ok()));
    }

    #[test]
    fn check_rejects_off_grid_and_out_of_range() {
        assert_eq!(check_rating(10.25), Err(ValidationReason::OutOfRange));
        assert_eq!(check_rating(0.5), Err(ValidationReason::OutOfRange));
        assert_eq!(check_rating(6.3), Err(ValidationReason::NotHalfStep));
        assert_eq!(check_rating(f64::NAN), Err(ValidationReason::NotFinite));
        assert_eq!(check_rating(7.5), Ok(()));
    }

    #[test]
    fn labels_tokens_and_alias() {
        let poor = classify(2.0);
        assert_eq!(poor.label, "Poor");
        assert_eq!(poor.color_token, "rating-poor");
        assert_eq!(RatingBand::Poor.alias(), Some("Needs Work"));
        assert_eq!(RatingBand::Excellent.alias(), None);
        assert_eq!(classify(9.5).color_token, "rating-excellent");
        assert_eq!(format_rating(8.0), "8.0");
    }
}
