//! Threshold-relative status of a reading.

use std::fmt;

use serde::Serialize;

use crate::colors::Color;

/// Share of the threshold that still counts as [`StatusCategory::Good`].
pub const GOOD_RATIO: f64 = 0.8;
/// Share of the threshold that still counts as [`StatusCategory::Fair`].
pub const FAIR_RATIO: f64 = 0.6;

/// Where a value sits relative to the pass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusCategory {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl StatusCategory {
    /// Classifies `value` against `threshold`.
    ///
    /// - `value >= threshold` → Excellent
    /// - `value >= threshold * 0.8` → Good
    /// - `value >= threshold * 0.6` → Fair
    /// - otherwise → Poor
    pub fn classify(value: f64, threshold: f64) -> Self {
        if value >= threshold {
            Self::Excellent
        } else if value >= threshold * GOOD_RATIO {
            Self::Good
        } else if value >= threshold * FAIR_RATIO {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    /// Color for the status caption.
    pub fn text_color(self) -> Color {
        match self {
            Self::Excellent => Color::from_hex(0x16a34a),
            Self::Good => Color::from_hex(0xca8a04),
            Self::Fair => Color::from_hex(0xea580c),
            Self::Poor => Color::from_hex(0xdc2626),
        }
    }

    /// Color for the value indicator line drawn over the bar.
    pub fn indicator_color(self) -> Color {
        match self {
            Self::Excellent => Color::from_hex(0x22c55e),
            Self::Good => Color::from_hex(0xeab308),
            Self::Fair => Color::from_hex(0xf97316),
            Self::Poor => Color::from_hex(0xef4444),
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        let threshold = 12.0;
        assert_eq!(
            StatusCategory::classify(threshold, threshold),
            StatusCategory::Excellent
        );
        assert_eq!(
            StatusCategory::classify(threshold * 0.8, threshold),
            StatusCategory::Good
        );
        assert_eq!(
            StatusCategory::classify(threshold * 0.6, threshold),
            StatusCategory::Fair
        );
        assert_eq!(StatusCategory::classify(0.0, threshold), StatusCategory::Poor);
    }

    #[test]
    fn between_boundaries() {
        assert_eq!(StatusCategory::classify(30.0, 12.0), StatusCategory::Excellent);
        assert_eq!(StatusCategory::classify(11.9, 12.0), StatusCategory::Good);
        assert_eq!(StatusCategory::classify(9.5, 12.0), StatusCategory::Fair);
        assert_eq!(StatusCategory::classify(7.1, 12.0), StatusCategory::Poor);
    }

    #[test]
    fn threshold_above_scale() {
        // A threshold past the gauge max is allowed; full scale is then only Good.
        assert_eq!(StatusCategory::classify(24.0, 28.0), StatusCategory::Good);
    }

    #[test]
    fn status_colors_are_distinct_from_each_other() {
        let all = [
            StatusCategory::Excellent,
            StatusCategory::Good,
            StatusCategory::Fair,
            StatusCategory::Poor,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.text_color(), b.text_color());
                assert_ne!(a.indicator_color(), b.indicator_color());
            }
        }
    }

    #[test]
    fn display_matches_text() {
        assert_eq!(StatusCategory::Fair.to_string(), "Fair");
        assert_eq!(
            serde_json::to_string(&StatusCategory::Excellent).unwrap(),
            "\"Excellent\""
        );
    }
}
