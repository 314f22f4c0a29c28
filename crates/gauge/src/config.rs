//! Gauge configuration and its validation rules.

use serde::Serialize;

use crate::scale::{MAX_SCALE, MIN_SCALE};

/// Errors raised when building a [`GaugeConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("max value must be positive, got {0}")]
    NonPositiveMax(f64),

    #[error(
        "max value {0} is outside the supported scale {min}..={max}",
        min = MIN_SCALE,
        max = MAX_SCALE
    )]
    ScaleOutOfRange(f64),

    #[error("bar height must be positive, got {0}")]
    NonPositiveBarHeight(f64),

    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
}

/// Everything a gauge needs for one render cycle.
///
/// Only constructible through [`GaugeConfig::new`], so a config in hand always
/// has a scale within `MIN_SCALE..=MAX_SCALE` and a positive, finite bar height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeConfig {
    target_value: f64,
    threshold: f64,
    max_value: f64,
    label: String,
    bar_height: f64,
}

impl GaugeConfig {
    /// Validates and builds a configuration.
    ///
    /// A threshold above `max_value` is accepted: the bar can then never show
    /// Excellent, which is a legitimate reading of "the target is off scale".
    pub fn new(
        target_value: f64,
        threshold: f64,
        max_value: f64,
        label: impl Into<String>,
        bar_height: f64,
    ) -> Result<Self, ConfigError> {
        finite("target value", target_value)?;
        finite("threshold", threshold)?;
        finite("max value", max_value)?;
        finite("bar height", bar_height)?;

        if max_value <= 0.0 {
            return Err(ConfigError::NonPositiveMax(max_value));
        }
        if !(MIN_SCALE..=MAX_SCALE).contains(&max_value) {
            return Err(ConfigError::ScaleOutOfRange(max_value));
        }
        if bar_height <= 0.0 {
            return Err(ConfigError::NonPositiveBarHeight(bar_height));
        }
        if threshold > max_value {
            tracing::debug!(threshold, max_value, "threshold lies beyond the gauge scale");
        }

        Ok(Self {
            target_value,
            threshold,
            max_value,
            label: label.into(),
            bar_height,
        })
    }

    /// Returns a copy of this config pointing at a new reading.
    pub fn with_target_value(&self, target_value: f64) -> Result<Self, ConfigError> {
        finite("target value", target_value)?;
        Ok(Self {
            target_value,
            ..self.clone()
        })
    }

    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bar_height(&self) -> f64 {
        self.bar_height
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}
