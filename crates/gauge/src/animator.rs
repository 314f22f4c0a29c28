//! Frame-driven value animation.
//!
//! [`Animation`] is the pure part: it maps elapsed time to an eased sample.
//! [`Animator`] runs one animation at a time as a Tokio task, pulling ticks
//! from a [`FrameSource`] and publishing [`AnimationState`] through a `watch`
//! channel. Starting a new run cancels the previous one first, and a
//! superseded run can no longer publish.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Time for a run to go from 0 to its target.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);
/// Tick period of the default frame source (~60 Hz).
pub const DEFAULT_FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Cubic ease-out: `1 - (1 - p)^3`, with `p` clamped to `0..=1`.
pub fn ease_out_cubic(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// One eased point of an animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    /// Linear progress in `0..=1`.
    pub progress: f64,
}

impl Sample {
    pub fn is_final(&self) -> bool {
        self.progress >= 1.0
    }
}

/// Interpolation from 0 to `target` over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    target: f64,
    duration: Duration,
}

impl Animation {
    pub fn new(target: f64, duration: Duration) -> Self {
        Self { target, duration }
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Linear progress for the given elapsed time. A zero duration is complete immediately.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased value at `elapsed`. Lands exactly on the target once progress reaches 1.
    pub fn sample(&self, elapsed: Duration) -> Sample {
        let progress = self.progress(elapsed);
        let value = if progress >= 1.0 {
            self.target
        } else {
            self.target * ease_out_cubic(progress)
        };
        Sample { value, progress }
    }
}

/// Supplies frame timestamps to a running animation.
///
/// Hosts with their own render loop implement this to drive the animator
/// from their frame callback. Returning `None` ends the run where it stands.
pub trait FrameSource: Send + 'static {
    fn next_frame(&mut self) -> impl Future<Output = Option<Instant>> + Send;
}

/// Default frame source: a Tokio interval that skips missed ticks.
///
/// The first tick fires immediately, so a run publishes its elapsed-zero
/// sample without waiting a frame.
pub struct IntervalFrames {
    interval: Interval,
}

impl IntervalFrames {
    /// Creates the source. Must be called from within a Tokio runtime.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl FrameSource for IntervalFrames {
    fn next_frame(&mut self) -> impl Future<Output = Option<Instant>> + Send {
        async move { Some(self.interval.tick().await) }
    }
}

/// Lifecycle of the animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing started yet, or the last run was cancelled in place.
    Idle,
    Animating,
    /// The last run reached its target.
    Converged,
}

/// Snapshot of the animator, published on every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    pub displayed_value: f64,
    pub target_value: f64,
    pub started_at: Option<Instant>,
    pub phase: Phase,
    /// Generation of the run that produced this state; 0 before the first run.
    pub run: u64,
}

impl AnimationState {
    fn idle() -> Self {
        Self {
            displayed_value: 0.0,
            target_value: 0.0,
            started_at: None,
            phase: Phase::Idle,
            run: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Animating
    }
}

/// Drives one [`Animation`] at a time and publishes its progress.
///
/// Each instance owns its state exclusively. Dropping the animator cancels
/// the active run.
pub struct Animator {
    duration: Duration,
    frame_period: Duration,
    state_tx: Arc<watch::Sender<AnimationState>>,
    generation: Arc<AtomicU64>,
    cancel: Option<CancellationToken>,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator {
    /// Creates an animator with the default 2 s duration and ~60 Hz frames.
    pub fn new() -> Self {
        Self::with_timing(DEFAULT_DURATION, DEFAULT_FRAME_PERIOD)
    }

    pub fn with_timing(duration: Duration, frame_period: Duration) -> Self {
        let (state_tx, _) = watch::channel(AnimationState::idle());
        Self {
            duration,
            frame_period,
            state_tx: Arc::new(state_tx),
            generation: Arc::new(AtomicU64::new(0)),
            cancel: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Receiver that observes every published state.
    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.state_tx.subscribe()
    }

    /// The latest published state.
    pub fn state(&self) -> AnimationState {
        *self.state_tx.borrow()
    }

    /// Starts a run towards `target` on the default interval frame source.
    ///
    /// Must be called from within a Tokio runtime. Returns the run generation.
    pub fn animate_to(&mut self, target: f64) -> u64 {
        let frames = IntervalFrames::new(self.frame_period);
        self.animate_with(target, frames)
    }

    /// Starts a run towards `target`, pulling ticks from `frames`.
    ///
    /// Any active run is cancelled before the new one is scheduled.
    pub fn animate_with<F: FrameSource>(&mut self, target: f64, frames: F) -> u64 {
        let run = self.supersede();
        let started_at = Instant::now();

        self.state_tx.send_modify(|state| {
            *state = AnimationState {
                displayed_value: 0.0,
                target_value: target,
                started_at: Some(started_at),
                phase: Phase::Animating,
                run,
            };
        });

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());

        let publisher = Publisher {
            run,
            state_tx: self.state_tx.clone(),
            generation: self.generation.clone(),
        };
        let animation = Animation::new(target, self.duration);
        tokio::spawn(run_animation(animation, started_at, frames, publisher, cancel));

        debug!(run, target, "animation started");
        run
    }

    /// Stops the active run, leaving the displayed value where it is.
    pub fn cancel(&mut self) {
        if self.cancel.is_none() {
            return;
        }
        let epoch = self.supersede();
        self.state_tx.send_if_modified(|state| {
            if state.phase != Phase::Animating {
                return false;
            }
            debug!(run = state.run, value = state.displayed_value, "animation cancelled");
            state.phase = Phase::Idle;
            state.run = epoch;
            true
        });
    }

    /// Bumps the generation so in-flight runs lose publish rights, then
    /// cancels their pending continuation.
    fn supersede(&mut self) -> u64 {
        let epoch = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(token) = self.cancel.take() {
            token.cancel();
            trace!(epoch, "previous animation superseded");
        }
        epoch
    }
}

impl Drop for Animator {
    fn drop(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
    }
}

/// Write handle held by one run.
struct Publisher {
    run: u64,
    state_tx: Arc<watch::Sender<AnimationState>>,
    generation: Arc<AtomicU64>,
}

impl Publisher {
    /// Publishes a sample. Returns `false` once this run has been superseded.
    ///
    /// The generation check runs under the channel's write lock, so a
    /// superseding run's state can never be overwritten by this one.
    fn publish(&self, displayed_value: f64, phase: Phase) -> bool {
        let mut current = true;
        self.state_tx.send_if_modified(|state| {
            if self.generation.load(Ordering::Acquire) != self.run {
                current = false;
                return false;
            }
            let next = AnimationState {
                displayed_value,
                phase,
                ..*state
            };
            if *state == next {
                return false;
            }
            *state = next;
            true
        });
        current
    }
}

async fn run_animation<F: FrameSource>(
    animation: Animation,
    started_at: Instant,
    mut frames: F,
    publisher: Publisher,
    cancel: CancellationToken,
) {
    let run = publisher.run;

    loop {
        let now = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                trace!(run, "animation task cancelled");
                return;
            }
            frame = frames.next_frame() => match frame {
                Some(now) => now,
                None => {
                    debug!(run, "frame source closed, animation stopped");
                    return;
                }
            },
        };

        let sample = animation.sample(now.saturating_duration_since(started_at));
        let phase = if sample.is_final() {
            Phase::Converged
        } else {
            Phase::Animating
        };

        if !publisher.publish(sample.value, phase) {
            trace!(run, "stale frame dropped");
            return;
        }

        if sample.is_final() {
            debug!(run, value = sample.value, "animation converged");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    /// Frame source fed by the test.
    struct ManualFrames(mpsc::UnboundedReceiver<Instant>);

    impl FrameSource for ManualFrames {
        fn next_frame(&mut self) -> impl Future<Output = Option<Instant>> + Send {
            self.0.recv()
        }
    }

    /// Waits for the next published state.
    async fn next_state(rx: &mut watch::Receiver<AnimationState>) -> AnimationState {
        tokio::time::timeout(Duration::from_secs(10), rx.changed())
            .await
            .expect("state should change")
            .expect("sender alive");
        *rx.borrow_and_update()
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
    }

    #[test]
    fn sample_starts_at_zero_and_lands_on_target() {
        let anim = Animation::new(20.0, DEFAULT_DURATION);
        assert_eq!(anim.sample(Duration::ZERO).value, 0.0);
        assert_eq!(anim.sample(Duration::from_millis(2000)).value, 20.0);
        assert_eq!(anim.sample(Duration::from_millis(5000)).value, 20.0);
        assert!(anim.sample(Duration::from_millis(2000)).is_final());
        assert!(!anim.sample(Duration::from_millis(1999)).is_final());
    }

    #[test]
    fn samples_strictly_increase_for_positive_target() {
        let anim = Animation::new(20.0, DEFAULT_DURATION);
        let mut last = anim.sample(Duration::ZERO).value;
        for ms in (16..=2000).step_by(16) {
            let v = anim.sample(Duration::from_millis(ms)).value;
            assert!(v > last, "sample at {ms} ms did not increase: {v} <= {last}");
            last = v;
        }
    }

    #[test]
    fn zero_duration_is_immediately_final() {
        let anim = Animation::new(7.5, Duration::ZERO);
        let s = anim.sample(Duration::ZERO);
        assert!(s.is_final());
        assert_eq!(s.value, 7.5);
    }

    #[tokio::test(start_paused = true)]
    async fn animator_converges_monotonically() {
        let mut animator = Animator::new();
        let mut rx = animator.subscribe();
        assert_eq!(animator.state().phase, Phase::Idle);

        let run = animator.animate_to(20.0);
        assert_eq!(run, 1);

        let mut values = Vec::new();
        loop {
            let state = next_state(&mut rx).await;
            assert_eq!(state.run, run);
            values.push(state.displayed_value);
            if state.phase == Phase::Converged {
                break;
            }
        }

        assert_eq!(values.first().copied(), Some(0.0));
        assert_eq!(values.last().copied(), Some(20.0));
        for pair in values.windows(2) {
            assert!(pair[1] > pair[0], "not increasing: {pair:?}");
        }
        assert!(values.len() > 10);
        assert!(!animator.state().is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn manual_frames_drive_exact_samples() {
        let (tx, rx_frames) = mpsc::unbounded_channel();
        let mut animator = Animator::new();
        let mut rx = animator.subscribe();

        let t0 = Instant::now();
        animator.animate_with(20.0, ManualFrames(rx_frames));
        let started = next_state(&mut rx).await;
        assert_eq!(started.started_at, Some(t0));
        assert_eq!(started.displayed_value, 0.0);

        tx.send(t0 + Duration::from_millis(1000)).unwrap();
        let mid = next_state(&mut rx).await;
        assert!((mid.displayed_value - 17.5).abs() < 1e-9);
        assert_eq!(mid.phase, Phase::Animating);

        tx.send(t0 + Duration::from_millis(2000)).unwrap();
        let done = next_state(&mut rx).await;
        assert_eq!(done.displayed_value, 20.0);
        assert_eq!(done.phase, Phase::Converged);
    }

    #[tokio::test(start_paused = true)]
    async fn new_target_supersedes_running_animation() {
        let mut animator = Animator::new();
        let mut rx = animator.subscribe();

        animator.animate_to(20.0);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(animator.state().is_running());

        let second = animator.animate_to(10.0);
        assert_eq!(second, 2);
        rx.borrow_and_update();

        loop {
            let state = next_state(&mut rx).await;
            assert_eq!(state.run, second, "stale run published after supersede");
            if state.phase == Phase::Converged {
                assert_eq!(state.displayed_value, 10.0);
                assert_eq!(state.target_value, 10.0);
                break;
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_freezes_displayed_value() {
        let mut animator = Animator::new();
        animator.animate_to(20.0);
        tokio::time::sleep(Duration::from_millis(300)).await;

        animator.cancel();
        let frozen = animator.state();
        assert_eq!(frozen.phase, Phase::Idle);
        assert!(frozen.displayed_value > 0.0 && frozen.displayed_value < 20.0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(animator.state(), frozen);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_frame_source_stops_run() {
        let (tx, rx_frames) = mpsc::unbounded_channel::<Instant>();
        let mut animator = Animator::new();
        animator.animate_with(5.0, ManualFrames(rx_frames));
        drop(tx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = animator.state();
        assert_eq!(state.displayed_value, 0.0);
        assert!(state.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_task() {
        let animator = Animator::new();
        let mut rx = animator.subscribe();
        {
            let mut animator = animator;
            animator.animate_to(20.0);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // Sender dropped with the animator once the task exits.
        tokio::time::timeout(Duration::from_secs(1), async {
            while rx.changed().await.is_ok() {}
        })
        .await
        .expect("publisher should be released after drop");
    }
}
