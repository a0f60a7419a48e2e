//! Frame scheduling and the animation driver state machine.
//!
//! Everything here is plain state so the tick/teardown semantics can be
//! tested without a GPU. The winit event loop in `window` is only the
//! scheduling primitive; the decisions live in [`AnimationDriver`].

use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally capping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap.
        target_fps: Option<f32>,
    },
    /// Evaluate the field at one fixed time value and hold that frame.
    Still {
        /// Time value the single frame is computed at.
        time: f64,
    },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the time state for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Accumulated animation time, in the field's own units.
    pub time: f64,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

/// Pure time accumulator: `time += speed` per tick, nothing else.
///
/// Deliberately not wall-clock based — N ticks at speed S always land on
/// exactly `N * S`, so still frames and regressions are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    time: f64,
    speed: f64,
}

impl TickClock {
    pub fn new(speed: f64) -> Self {
        Self {
            time: 0.0,
            speed: speed.max(0.0),
        }
    }

    /// Advances by one tick and returns the new accumulated time.
    pub fn advance(&mut self) -> f64 {
        self.time += self.speed;
        self.time
    }

    /// Updates the per-tick increment without disturbing accumulated time.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed.max(0.0);
    }

    pub fn time(&self) -> f64 {
        self.time
    }
}

/// Optional frames-per-second cap for the animate policy.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    interval: Duration,
    next_at: Option<Instant>,
}

impl FrameLimiter {
    /// Returns `None` for a non-positive cap, which means uncapped.
    pub fn new(target_fps: f32) -> Option<Self> {
        if target_fps <= 0.0 {
            return None;
        }
        Some(Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(target_fps)),
            next_at: None,
        })
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        self.next_at.is_none_or(|deadline| now >= deadline)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.next_at = Some(now + self.interval);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_at
    }
}

/// Lifecycle of one rendered surface. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Running,
    Stopped,
}

/// Owns the tick clock and the render-loop lifecycle for one surface.
///
/// A tick begins with [`AnimationDriver::begin_tick`]; callbacks that fire
/// after [`AnimationDriver::stop`] get `None` back and are discarded, which
/// is how a scheduled frame racing teardown degrades to a no-op.
#[derive(Debug)]
pub struct AnimationDriver {
    phase: DriverPhase,
    policy: RenderPolicy,
    clock: TickClock,
    limiter: Option<FrameLimiter>,
    frames_submitted: u64,
    still_rendered: bool,
}

impl AnimationDriver {
    pub fn new(policy: RenderPolicy, speed: f64) -> Self {
        let limiter = match policy {
            RenderPolicy::Animate {
                target_fps: Some(fps),
            } => FrameLimiter::new(fps),
            _ => None,
        };
        Self {
            phase: DriverPhase::Idle,
            policy,
            clock: TickClock::new(speed),
            limiter,
            frames_submitted: 0,
            still_rendered: false,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Idle → Running. A stopped driver never restarts; the owner rebuilds
    /// the whole instance instead, which also resets accumulated time.
    pub fn start(&mut self) {
        if self.phase == DriverPhase::Idle {
            self.phase = DriverPhase::Running;
        }
    }

    /// Running → Stopped (terminal). Pending callbacks become no-ops.
    pub fn stop(&mut self) {
        self.phase = DriverPhase::Stopped;
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.clock.set_speed(speed);
    }

    /// Starts one tick, advancing time. Returns `None` when the driver is
    /// not running or the still frame has already been produced.
    pub fn begin_tick(&mut self) -> Option<TimeSample> {
        if self.phase != DriverPhase::Running {
            return None;
        }
        match self.policy {
            RenderPolicy::Still { time } => {
                if self.still_rendered {
                    None
                } else {
                    Some(TimeSample {
                        time,
                        frame_index: 0,
                    })
                }
            }
            RenderPolicy::Animate { .. } => {
                let frame_index = self.frames_submitted;
                let time = self.clock.advance();
                Some(TimeSample { time, frame_index })
            }
        }
    }

    /// Records a completed frame submission.
    pub fn mark_submitted(&mut self, now: Instant) {
        self.frames_submitted = self.frames_submitted.saturating_add(1);
        if matches!(self.policy, RenderPolicy::Still { .. }) {
            self.still_rendered = true;
        }
        if let Some(limiter) = self.limiter.as_mut() {
            limiter.mark_rendered(now);
        }
    }

    /// Lets a held still frame render once more, e.g. after a resize.
    /// No-op for the animate policy and for stopped drivers.
    pub fn invalidate_still(&mut self) {
        if self.phase == DriverPhase::Running {
            self.still_rendered = false;
        }
    }

    /// Whether another frame should be scheduled at all.
    pub fn wants_next_frame(&self) -> bool {
        match self.phase {
            DriverPhase::Running => match self.policy {
                RenderPolicy::Animate { .. } => true,
                RenderPolicy::Still { .. } => !self.still_rendered,
            },
            DriverPhase::Idle | DriverPhase::Stopped => false,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        self.limiter
            .map(|limiter| limiter.ready_for_frame(now))
            .unwrap_or(true)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.limiter.and_then(|limiter| limiter.next_deadline())
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_driver(policy: RenderPolicy, speed: f64) -> AnimationDriver {
        let mut driver = AnimationDriver::new(policy, speed);
        driver.start();
        driver
    }

    #[test]
    fn time_accumulates_without_drift() {
        let mut driver = running_driver(RenderPolicy::default(), 2.0);
        let now = Instant::now();
        for _ in 0..100 {
            driver.begin_tick().expect("running driver ticks");
            driver.mark_submitted(now);
        }
        // Pure accumulation: no clamping, no wall-clock noise.
        assert_eq!(driver.time(), 200.0);
        assert_eq!(driver.frames_submitted(), 100);
    }

    #[test]
    fn first_tick_already_advances() {
        let mut driver = running_driver(RenderPolicy::default(), 1.5);
        let sample = driver.begin_tick().expect("tick");
        assert_eq!(sample.time, 1.5);
        assert_eq!(sample.frame_index, 0);
    }

    #[test]
    fn speed_change_keeps_accumulated_time() {
        let mut driver = running_driver(RenderPolicy::default(), 1.0);
        let now = Instant::now();
        for _ in 0..4 {
            driver.begin_tick().expect("tick");
            driver.mark_submitted(now);
        }
        driver.set_speed(3.0);
        driver.begin_tick().expect("tick");
        assert_eq!(driver.time(), 7.0);
    }

    #[test]
    fn idle_driver_does_not_tick() {
        let mut driver = AnimationDriver::new(RenderPolicy::default(), 1.0);
        assert_eq!(driver.phase(), DriverPhase::Idle);
        assert!(driver.begin_tick().is_none());
        assert!(!driver.wants_next_frame());
    }

    #[test]
    fn stop_discards_late_ticks_and_freezes_counter() {
        let mut driver = running_driver(RenderPolicy::default(), 1.0);
        let now = Instant::now();
        driver.begin_tick().expect("tick");
        driver.mark_submitted(now);
        let frames = driver.frames_submitted();

        driver.stop();
        assert_eq!(driver.phase(), DriverPhase::Stopped);
        // A callback racing teardown is discarded, not an error.
        assert!(driver.begin_tick().is_none());
        assert!(!driver.wants_next_frame());
        assert_eq!(driver.frames_submitted(), frames);
    }

    #[test]
    fn stopped_is_terminal() {
        let mut driver = running_driver(RenderPolicy::default(), 1.0);
        driver.stop();
        driver.start();
        assert_eq!(driver.phase(), DriverPhase::Stopped);
    }

    #[test]
    fn still_policy_renders_exactly_once() {
        let mut driver = running_driver(RenderPolicy::Still { time: 42.0 }, 5.0);
        let sample = driver.begin_tick().expect("first still tick");
        assert_eq!(sample.time, 42.0);
        driver.mark_submitted(Instant::now());
        assert!(driver.begin_tick().is_none());
        assert!(!driver.wants_next_frame());
        // Still frames never touch the accumulator.
        assert_eq!(driver.time(), 0.0);
    }

    #[test]
    fn invalidated_still_renders_again_at_the_same_time() {
        let mut driver = running_driver(RenderPolicy::Still { time: 7.5 }, 1.0);
        driver.begin_tick().expect("first still tick");
        driver.mark_submitted(Instant::now());
        assert!(driver.begin_tick().is_none());

        driver.invalidate_still();
        let sample = driver.begin_tick().expect("re-rendered still tick");
        assert_eq!(sample.time, 7.5);

        driver.stop();
        driver.invalidate_still();
        assert!(driver.begin_tick().is_none());
    }

    #[test]
    fn limiter_paces_frames() {
        let mut limiter = FrameLimiter::new(10.0).expect("positive fps");
        let start = Instant::now();
        assert!(limiter.ready_for_frame(start));
        limiter.mark_rendered(start);
        assert!(!limiter.ready_for_frame(start + Duration::from_millis(50)));
        assert!(limiter.ready_for_frame(start + Duration::from_millis(100)));
        assert_eq!(limiter.next_deadline(), Some(start + Duration::from_millis(100)));
    }

    #[test]
    fn non_positive_fps_means_uncapped() {
        assert!(FrameLimiter::new(0.0).is_none());
        assert!(FrameLimiter::new(-30.0).is_none());
    }
}
