//! Brix gauge core.
//!
//! Turns a raw reading into animated presentation data: a clamped position,
//! background color ramp, threshold status and scale markers. Drawing is left
//! to the caller, which consumes [`GaugeFrame`] snapshots.

pub mod animator;
pub mod colors;
pub mod config;
pub mod frame;
pub mod gauge;
pub mod scale;
pub mod status;

pub use animator::{AnimationState, Animator, FrameSource, IntervalFrames, Phase};
pub use colors::{Color, Segment, ramp_color};
pub use config::{ConfigError, GaugeConfig};
pub use frame::GaugeFrame;
pub use gauge::Gauge;
pub use scale::{MAX_SCALE, MIN_SCALE, ScaleMarker, markers, position_percent};
pub use status::StatusCategory;
