//! A mounted gauge: configuration plus its own animator.

use tokio::sync::watch;

use crate::animator::{AnimationState, Animator};
use crate::config::GaugeConfig;
use crate::frame::GaugeFrame;

/// One gauge instance.
///
/// Re-animates from 0 whenever the target value changes; any other config
/// change only affects the mapping of the current displayed value.
pub struct Gauge {
    config: GaugeConfig,
    animator: Animator,
}

impl Gauge {
    /// Mounts a gauge and starts animating towards the configured value.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(config: GaugeConfig) -> Self {
        Self::with_animator(config, Animator::new())
    }

    /// Mounts a gauge with a caller-tuned animator.
    pub fn with_animator(config: GaugeConfig, mut animator: Animator) -> Self {
        animator.animate_to(config.target_value());
        Self { config, animator }
    }

    /// Applies a new render-cycle config. Returns `true` if a new run started.
    pub fn update(&mut self, config: GaugeConfig) -> bool {
        let changed = config.target_value() != self.config.target_value();
        self.config = config;
        if changed {
            self.animator.animate_to(self.config.target_value());
        }
        changed
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    pub fn animation(&self) -> AnimationState {
        self.animator.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.animator.subscribe()
    }

    /// Presentation data for the current displayed value.
    pub fn frame(&self) -> GaugeFrame {
        self.frame_for(&self.animator.state())
    }

    /// Presentation data for a state received from [`Gauge::subscribe`].
    pub fn frame_for(&self, state: &AnimationState) -> GaugeFrame {
        GaugeFrame::compute(&self.config, state.displayed_value)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animator::Phase;
    use crate::status::StatusCategory;

    fn config(value: f64) -> GaugeConfig {
        GaugeConfig::new(value, 12.0, 24.0, "Grape", 24.0).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn mount_animates_to_target() {
        let gauge = Gauge::mount(config(18.0));
        assert!(gauge.animation().is_running());
        assert_eq!(gauge.frame().displayed_value, 0.0);

        tokio::time::sleep(Duration::from_millis(2100)).await;

        let state = gauge.animation();
        assert_eq!(state.phase, Phase::Converged);
        let frame = gauge.frame();
        assert_eq!(frame.displayed_value, 18.0);
        assert_eq!(frame.position_percent, 75.0);
        assert_eq!(frame.status, StatusCategory::Excellent);
    }

    #[tokio::test(start_paused = true)]
    async fn update_with_same_value_does_not_restart() {
        let mut gauge = Gauge::mount(config(6.0));
        tokio::time::sleep(Duration::from_millis(2100)).await;
        let run = gauge.animation().run;

        let relabelled = GaugeConfig::new(6.0, 5.0, 24.0, "Grape (late)", 24.0).unwrap();
        assert!(!gauge.update(relabelled));
        assert_eq!(gauge.animation().run, run);
        assert_eq!(gauge.frame().status, StatusCategory::Excellent);
        assert_eq!(gauge.frame().label, "Grape (late)");
    }

    #[tokio::test(start_paused = true)]
    async fn update_with_new_value_restarts_from_zero() {
        let mut gauge = Gauge::mount(config(6.0));
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert!(gauge.update(config(9.0)));
        let state = gauge.animation();
        assert_eq!(state.phase, Phase::Animating);
        assert_eq!(state.displayed_value, 0.0);
        assert_eq!(state.target_value, 9.0);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(gauge.frame().displayed_value, 9.0);
    }
}
