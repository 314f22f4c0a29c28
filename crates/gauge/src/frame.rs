//! Per-frame presentation data handed to the rendering layer.

use serde::Serialize;

use crate::colors::{self, Color, Segment};
use crate::config::GaugeConfig;
use crate::scale::{self, ScaleMarker};
use crate::status::StatusCategory;

/// Everything a renderer needs to draw the gauge for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeFrame {
    pub label: String,
    pub displayed_value: f64,
    pub position_percent: f64,
    pub threshold: f64,
    pub max_value: f64,
    pub bar_height: f64,
    pub segments: Vec<Segment>,
    pub status: StatusCategory,
    pub status_color: Color,
    pub indicator_color: Color,
    pub markers: Vec<ScaleMarker>,
}

impl GaugeFrame {
    /// Maps a displayed value through position, ramp, status and markers.
    pub fn compute(config: &GaugeConfig, displayed_value: f64) -> Self {
        let max_value = config.max_value();
        let status = StatusCategory::classify(displayed_value, config.threshold());

        Self {
            label: config.label().to_owned(),
            displayed_value,
            position_percent: scale::position_percent(displayed_value, max_value),
            threshold: config.threshold(),
            max_value,
            bar_height: config.bar_height(),
            segments: colors::segments(max_value),
            status,
            status_color: status.text_color(),
            indicator_color: status.indicator_color(),
            markers: scale::markers(max_value),
        }
    }

    /// Value shown above the indicator, e.g. `8.2`.
    pub fn value_text(&self) -> String {
        format!("{:.1}", self.displayed_value)
    }

    /// Value shown in the side panel, e.g. `8.2%`.
    pub fn headline_text(&self) -> String {
        format!("{:.1}%", self.displayed_value)
    }

    /// Target caption, e.g. `Target: ≥12`.
    pub fn target_text(&self) -> String {
        format!("Target: ≥{}", self.threshold)
    }
}
