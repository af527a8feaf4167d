//! Gaze offsets and the idle motion scheduler
//!
//! Gaze is a pixel offset applied to the iris and pupil of both eyes. It
//! is always produced from a normalized direction in [-1, 1] on each axis,
//! scaled by a per-axis maximum. Positive y looks down (screen space).
//!
//! The scheduler decides when the eyes move on their own, following the
//! motion policy of the current expression.

use rand::Rng;

use crate::timing::{has_elapsed, Millis};

/// Default horizontal gaze range in pixels
pub const DEFAULT_MAX_X: i16 = 12;

/// Default vertical gaze range in pixels
pub const DEFAULT_MAX_Y: i16 = 20;

/// Iris/pupil displacement in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GazeOffset {
    pub x: i16,
    pub y: i16,
}

impl GazeOffset {
    pub const CENTER: Self = Self { x: 0, y: 0 };
}

/// Per-axis gaze maxima
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GazeLimits {
    pub max_x: i16,
    pub max_y: i16,
}

impl Default for GazeLimits {
    fn default() -> Self {
        Self {
            max_x: DEFAULT_MAX_X,
            max_y: DEFAULT_MAX_Y,
        }
    }
}

impl GazeLimits {
    /// Convert a normalized direction to a pixel offset
    ///
    /// Each axis is clamped to [-1, 1], scaled and truncated toward zero.
    /// Non-finite input maps to the center.
    pub fn offset(&self, x: f32, y: f32) -> GazeOffset {
        GazeOffset {
            x: scale_axis(x, self.max_x),
            y: scale_axis(y, self.max_y),
        }
    }
}

fn scale_axis(value: f32, max: i16) -> i16 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(-1.0, 1.0) * max as f32) as i16
}

/// Idle motion routine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPolicy {
    /// Random look every 2-4 s
    Idle,
    /// Look down with slight horizontal jitter every 4-8 s
    Sleepy,
    /// Slow left-to-right sweep with a fast snap back
    Reading,
    /// Wide darts every 200-600 ms
    Searching,
    /// Drift up and to the right every 2.5-3.5 s
    Thinking,
    /// Small motion around the resting gaze every 1.2-1.8 s
    Scanning,
    /// Erratic moderate jitter every 1.2-1.8 s
    Jitter,
    /// No motion
    Still,
}

impl MotionPolicy {
    /// Randomized wait range before the next move, in ms
    const fn interval_range(self) -> Option<(u32, u32)> {
        match self {
            MotionPolicy::Idle => Some((2000, 4000)),
            MotionPolicy::Sleepy => Some((4000, 8000)),
            MotionPolicy::Searching => Some((200, 600)),
            MotionPolicy::Thinking => Some((2500, 3500)),
            MotionPolicy::Scanning | MotionPolicy::Jitter => Some((1200, 1800)),
            MotionPolicy::Reading | MotionPolicy::Still => None,
        }
    }
}

/// Reading sweep position in hundredths of the normalized range
pub const SWEEP_START: i16 = -100;
const SWEEP_END: i16 = 100;
/// Forward sweep step and period
pub const SWEEP_FORWARD_STEP: i16 = 20;
pub const SWEEP_FORWARD_MS: u32 = 200;
/// Snap-back step and period
pub const SWEEP_BACK_STEP: i16 = 50;
pub const SWEEP_BACK_MS: u32 = 80;
/// Eyes sit slightly below center while reading
pub const SWEEP_Y: f32 = 0.3;

/// Reading sweep state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadingSweep {
    pos: i16,
    forward: bool,
}

impl Default for ReadingSweep {
    fn default() -> Self {
        Self {
            pos: SWEEP_START,
            forward: true,
        }
    }
}

impl ReadingSweep {
    /// Period of the step the sweep is about to take
    pub fn period_ms(&self) -> u32 {
        if self.forward {
            SWEEP_FORWARD_MS
        } else {
            SWEEP_BACK_MS
        }
    }

    /// Advance one step, reversing at each extreme
    pub fn advance(&mut self) {
        if self.forward {
            self.pos = (self.pos + SWEEP_FORWARD_STEP).min(SWEEP_END);
            if self.pos >= SWEEP_END {
                self.forward = false;
            }
        } else {
            self.pos = (self.pos - SWEEP_BACK_STEP).max(SWEEP_START);
            if self.pos <= SWEEP_START {
                self.forward = true;
            }
        }
    }

    /// Normalized direction for the current position
    pub fn direction(&self) -> (f32, f32) {
        (self.pos as f32 / 100.0, SWEEP_Y)
    }

    pub fn position(&self) -> i16 {
        self.pos
    }

    pub fn is_forward(&self) -> bool {
        self.forward
    }
}

/// Decides when and where the eyes move on their own
#[derive(Debug, Clone)]
pub struct GazeScheduler {
    policy: MotionPolicy,
    last_move: Millis,
    next_move: u32,
    sweep: ReadingSweep,
    /// Resting gaze that scanning motion is centered on
    home: (f32, f32),
}

impl GazeScheduler {
    pub fn new<R: Rng>(policy: MotionPolicy, now: Millis, rng: &mut R) -> Self {
        let mut scheduler = Self {
            policy,
            last_move: now,
            next_move: 0,
            sweep: ReadingSweep::default(),
            home: (0.0, 0.0),
        };
        scheduler.reroll(rng);
        scheduler
    }

    /// Switch policy and restart its timer from `now`
    pub fn set_policy<R: Rng>(
        &mut self,
        policy: MotionPolicy,
        home: (f32, f32),
        now: Millis,
        rng: &mut R,
    ) {
        self.policy = policy;
        self.home = home;
        self.last_move = now;
        self.sweep = ReadingSweep::default();
        self.reroll(rng);
    }

    pub fn policy(&self) -> MotionPolicy {
        self.policy
    }

    pub fn sweep(&self) -> &ReadingSweep {
        &self.sweep
    }

    /// Direction to look at if a move is due
    pub fn poll<R: Rng>(&mut self, now: Millis, rng: &mut R) -> Option<(f32, f32)> {
        match self.policy {
            MotionPolicy::Still => None,
            MotionPolicy::Reading => {
                if !has_elapsed(now, self.last_move, self.sweep.period_ms()) {
                    return None;
                }
                self.last_move = now;
                self.sweep.advance();
                Some(self.sweep.direction())
            }
            _ => {
                if !has_elapsed(now, self.last_move, self.next_move) {
                    return None;
                }
                self.last_move = now;
                self.reroll(rng);
                Some(self.pick(rng))
            }
        }
    }

    fn reroll<R: Rng>(&mut self, rng: &mut R) {
        self.next_move = match self.policy.interval_range() {
            Some((lo, hi)) => rng.gen_range(lo..=hi),
            None => 0,
        };
    }

    /// Random direction for the timed policies
    fn pick<R: Rng>(&self, rng: &mut R) -> (f32, f32) {
        match self.policy {
            MotionPolicy::Sleepy => (tenths(rng, -2, 2), tenths(rng, 5, 8)),
            MotionPolicy::Searching => (tenths(rng, -10, 10), tenths(rng, -8, 8)),
            MotionPolicy::Thinking => (tenths(rng, 1, 6), tenths(rng, -8, -4)),
            MotionPolicy::Scanning => (
                self.home.0 + tenths(rng, -3, 3),
                self.home.1 + tenths(rng, -1, 1),
            ),
            MotionPolicy::Jitter => (tenths(rng, -5, 5), tenths(rng, -4, 4)),
            _ => (tenths(rng, -10, 10), tenths(rng, -5, 5)),
        }
    }
}

/// Uniform pick in tenths, `lo..=hi` scaled by 0.1
fn tenths<R: Rng>(rng: &mut R, lo: i8, hi: i8) -> f32 {
    rng.gen_range(lo..=hi) as f32 / 10.0
}

/// Random direction used by `look_random`
pub fn random_direction<R: Rng>(rng: &mut R) -> (f32, f32) {
    (tenths(rng, -10, 10), tenths(rng, -5, 5))
}
