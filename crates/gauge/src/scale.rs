//! Horizontal position and scale markers.

use serde::Serialize;

/// Spacing between intermediate scale markers, in raw units.
pub const MARKER_STEP: f64 = 4.0;

/// Smallest full-scale value a gauge accepts.
pub const MIN_SCALE: f64 = 0.01;
/// Largest full-scale value a gauge accepts (10 000 background segments).
pub const MAX_SCALE: f64 = 20_000.0;

/// Whether `max_value` lies in `MIN_SCALE..=MAX_SCALE`. False for NaN.
pub fn scale_in_range(max_value: f64) -> bool {
    (MIN_SCALE..=MAX_SCALE).contains(&max_value)
}

/// Horizontal offset of `value` as a percentage of `max_value`, pinned to `0..=100`.
pub fn position_percent(value: f64, max_value: f64) -> f64 {
    (value / max_value * 100.0).clamp(0.0, 100.0)
}

/// A labelled tick under the bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleMarker {
    pub value: f64,
    pub position_percent: f64,
    pub label: String,
}

/// Builds the marker set `0, 4, 8, … < max, max` in ascending order.
///
/// Intermediate marks stay strictly below `max_value`, so the maximum is
/// never listed twice. A maximum outside [`MIN_SCALE`]`..=`[`MAX_SCALE`]
/// yields no markers.
pub fn markers(max_value: f64) -> Vec<ScaleMarker> {
    if !scale_in_range(max_value) {
        return Vec::new();
    }

    let steps = (max_value / MARKER_STEP).ceil() as u32;
    let mut values = vec![0.0];
    values.extend(
        (1..steps)
            .map(|k| f64::from(k) * MARKER_STEP)
            .filter(|&mark| mark < max_value),
    );
    values.push(max_value);

    values
        .into_iter()
        .map(|value| ScaleMarker {
            value,
            position_percent: value / max_value * 100.0,
            // f64's Display already prints `14` for 14.0 and `14.5` for 14.5.
            label: value.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_endpoints() {
        assert_eq!(position_percent(0.0, 24.0), 0.0);
        assert_eq!(position_percent(24.0, 24.0), 100.0);
        assert_eq!(position_percent(12.0, 24.0), 50.0);
    }

    #[test]
    fn position_clamps_out_of_range() {
        assert_eq!(position_percent(40.0, 24.0), 100.0);
        assert_eq!(position_percent(-3.0, 24.0), 0.0);
    }

    #[test]
    fn position_monotonic() {
        let max = 18.0;
        let mut last = position_percent(0.0, max);
        for i in 1..=400 {
            let p = position_percent(i as f64 * 0.05, max);
            assert!(p >= last, "position decreased at step {i}");
            assert!((0.0..=100.0).contains(&p));
            last = p;
        }
    }

    #[test]
    fn markers_for_max_14() {
        let labels: Vec<String> = markers(14.0).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["0", "4", "8", "12", "14"]);
    }

    #[test]
    fn markers_max_multiple_of_step_not_duplicated() {
        let values: Vec<f64> = markers(16.0).iter().map(|m| m.value).collect();
        assert_eq!(values, vec![0.0, 4.0, 8.0, 12.0, 16.0]);
    }

    #[test]
    fn markers_positions() {
        let ms = markers(20.0);
        assert_eq!(ms.first().unwrap().position_percent, 0.0);
        assert_eq!(ms.last().unwrap().position_percent, 100.0);
        assert!((ms[1].position_percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn markers_small_and_fractional_max() {
        let labels: Vec<String> = markers(3.0).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["0", "3"]);

        let labels: Vec<String> = markers(9.5).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["0", "4", "8", "9.5"]);
    }

    #[test]
    fn markers_invalid_max_is_empty() {
        assert!(markers(0.0).is_empty());
        assert!(markers(-1.0).is_empty());
        assert!(markers(f64::NAN).is_empty());
    }

    #[test]
    fn markers_at_scale_limits() {
        let ms = markers(MAX_SCALE);
        assert_eq!(ms.len(), 5001);
        assert_eq!(ms[ms.len() - 2].value, 19_996.0);
        assert_eq!(ms.last().unwrap().value, MAX_SCALE);

        let labels: Vec<String> = markers(MIN_SCALE).into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["0", "0.01"]);
    }

    #[test]
    fn markers_beyond_scale_limits_are_empty() {
        assert!(markers(MAX_SCALE * 2.0).is_empty());
        assert!(markers(1e17).is_empty());
        assert!(markers(1e300).is_empty());
        assert!(markers(1e-20).is_empty());
    }
}
