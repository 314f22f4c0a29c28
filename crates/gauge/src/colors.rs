//! Absolute color ramp for the gauge background.
//!
//! The ramp encodes where a point sits on the scale (percent of the maximum).
//! It is independent from the status colors in [`crate::status`], which
//! encode distance to the pass threshold.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::scale::scale_in_range;

/// An opaque sRGB color, rendered as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Builds a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Returns the color as a `0xRRGGBB` value.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 80–100 % of max.
pub const EXCELLENT: Color = Color::from_hex(0x22c55e);
/// 70–79 % of max.
pub const VERY_GOOD: Color = Color::from_hex(0x4ade80);
/// 60–69 % of max.
pub const GOOD: Color = Color::from_hex(0x84cc16);
/// 50–59 % of max.
pub const FAIR: Color = Color::from_hex(0xeab308);
/// 40–49 % of max.
pub const BELOW_AVERAGE: Color = Color::from_hex(0xf59e0b);
/// 30–39 % of max.
pub const POOR: Color = Color::from_hex(0xf97316);
/// 20–29 % of max.
pub const VERY_POOR: Color = Color::from_hex(0xea580c);
/// 10–19 % of max.
pub const VERY_POOR_DARK: Color = Color::from_hex(0xdc2626);
/// Below 10 % of max.
pub const EXTREMELY_POOR: Color = Color::from_hex(0x991b1b);

/// One step of the ramp: every percentage at or above `lower_bound`
/// (and below the previous band's bound) gets `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBand {
    pub lower_bound: f64,
    pub color: Color,
    pub meaning: &'static str,
}

/// Ramp bands, highest first. The last band is the catch-all.
pub const COLOR_BANDS: [ColorBand; 9] = [
    ColorBand { lower_bound: 80.0, color: EXCELLENT, meaning: "excellent" },
    ColorBand { lower_bound: 70.0, color: VERY_GOOD, meaning: "very good" },
    ColorBand { lower_bound: 60.0, color: GOOD, meaning: "good" },
    ColorBand { lower_bound: 50.0, color: FAIR, meaning: "fair" },
    ColorBand { lower_bound: 40.0, color: BELOW_AVERAGE, meaning: "below average" },
    ColorBand { lower_bound: 30.0, color: POOR, meaning: "poor" },
    ColorBand { lower_bound: 20.0, color: VERY_POOR, meaning: "very poor" },
    ColorBand { lower_bound: 10.0, color: VERY_POOR_DARK, meaning: "very poor" },
    ColorBand { lower_bound: f64::NEG_INFINITY, color: EXTREMELY_POOR, meaning: "extremely poor" },
];

/// Returns the ramp color for a percentage of the maximum.
///
/// First satisfied lower bound wins. Every input maps to a color; NaN lands
/// in the catch-all band.
pub fn ramp_color(percentage: f64) -> Color {
    COLOR_BANDS
        .iter()
        .find(|band| percentage >= band.lower_bound)
        .map_or(EXTREMELY_POOR, |band| band.color)
}

/// Width of one background segment, in raw scale units.
pub const SEGMENT_WIDTH: f64 = 2.0;

/// A slice of the background bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start_percent: f64,
    pub width_percent: f64,
    pub color: Color,
}

/// Partitions the bar into `ceil(max / 2)` segments colored at their midpoint.
///
/// When `max_value` is odd the last segment overhangs 100 %; the renderer
/// clips it. A maximum outside the supported range (see
/// [`scale_in_range`]) yields no segments.
pub fn segments(max_value: f64) -> Vec<Segment> {
    if !scale_in_range(max_value) {
        return Vec::new();
    }

    let count = (max_value / SEGMENT_WIDTH).ceil() as usize;
    let width_percent = SEGMENT_WIDTH / max_value * 100.0;

    (0..count)
        .map(|i| {
            let start = i as f64 * SEGMENT_WIDTH;
            let midpoint = start + SEGMENT_WIDTH / 2.0;
            Segment {
                start_percent: start / max_value * 100.0,
                width_percent,
                color: ramp_color(midpoint / max_value * 100.0),
            }
        })
        .collect()
}
