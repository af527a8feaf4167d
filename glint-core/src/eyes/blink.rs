//! Blink state machine
//!
//! A blink is a transient full closure drawn straight to the display with
//! rectangle fills, layered over whatever droop the eyelid has. It closes
//! in three banded stages, holds closed, then reopens by re-blitting the
//! composited frame. Progress is time-gated across ticks, never blocking.

use crate::timing::{has_elapsed, Millis};

/// Dwell in each closing stage
pub const STAGE_DWELL_MS: u32 = 15;

/// Dwell while fully closed
pub const CLOSED_DWELL_MS: u32 = 60;

/// Default inter-blink range before cadence scaling
pub const DEFAULT_BLINK_MIN_MS: u32 = 3000;
pub const DEFAULT_BLINK_MAX_MS: u32 = 6000;

/// Blink progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkStage {
    #[default]
    Idle,
    Closing1,
    Closing2,
    Closing3,
    Closed,
}

impl BlinkStage {
    /// Stage that follows this one
    pub const fn next(self) -> Self {
        match self {
            BlinkStage::Idle => BlinkStage::Closing1,
            BlinkStage::Closing1 => BlinkStage::Closing2,
            BlinkStage::Closing2 => BlinkStage::Closing3,
            BlinkStage::Closing3 => BlinkStage::Closed,
            BlinkStage::Closed => BlinkStage::Idle,
        }
    }

    /// Time to stay in this stage before advancing
    pub const fn dwell_ms(self) -> u32 {
        match self {
            BlinkStage::Closed => CLOSED_DWELL_MS,
            _ => STAGE_DWELL_MS,
        }
    }

    /// Band height in eighths of the eye, drawn from top and bottom
    pub const fn band_eighths(self) -> Option<u16> {
        match self {
            BlinkStage::Closing1 => Some(1),
            BlinkStage::Closing2 => Some(2),
            BlinkStage::Closing3 => Some(3),
            _ => None,
        }
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, BlinkStage::Idle)
    }
}

/// What the engine must draw this tick because of the blink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkAction {
    /// Mid-stage, nothing new to draw but the tick belongs to the blink
    Hold,
    /// Draw top and bottom bands of this many eighths
    Band(u16),
    /// Fill the eyes and draw the closed line
    Close,
    /// Re-blit the composited frame and schedule the next blink
    Reopen,
}

/// Time-gated blink sequencer
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Blink {
    stage: BlinkStage,
    entered_at: Millis,
    last_blink: Millis,
    interval: u32,
    completed: u32,
}

impl Blink {
    /// Idle blinker whose first blink is `interval` ms after `now`
    pub fn new(now: Millis, interval: u32) -> Self {
        Self {
            stage: BlinkStage::Idle,
            entered_at: now,
            last_blink: now,
            interval,
            completed: 0,
        }
    }

    /// Advance the blink for this tick
    ///
    /// Returns `None` when idle, so the rest of the frame may run. While
    /// `suppressed` an idle blinker keeps restarting its interval so a
    /// reopened eye does not blink the instant it wakes. A blink already
    /// in progress always completes.
    pub fn poll(&mut self, now: Millis, suppressed: bool) -> Option<BlinkAction> {
        match self.stage {
            BlinkStage::Idle => {
                if suppressed {
                    self.last_blink = now;
                    return None;
                }
                if !has_elapsed(now, self.last_blink, self.interval) {
                    return None;
                }
                self.enter(BlinkStage::Closing1, now);
                Some(BlinkAction::Band(1))
            }
            stage => {
                if !has_elapsed(now, self.entered_at, stage.dwell_ms()) {
                    return Some(BlinkAction::Hold);
                }
                let next = stage.next();
                self.enter(next, now);
                Some(match next {
                    BlinkStage::Closed => BlinkAction::Close,
                    BlinkStage::Idle => {
                        self.last_blink = now;
                        self.completed = self.completed.wrapping_add(1);
                        BlinkAction::Reopen
                    }
                    other => BlinkAction::Band(other.band_eighths().unwrap_or(3)),
                })
            }
        }
    }

    /// Set the wait before the next blink, counted from the last one
    pub fn schedule(&mut self, interval: u32) {
        self.interval = interval;
    }

    fn enter(&mut self, stage: BlinkStage, now: Millis) {
        self.stage = stage;
        self.entered_at = now;
    }

    pub fn stage(&self) -> BlinkStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage.is_active()
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Number of blinks that ran to completion
    pub fn completed(&self) -> u32 {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(blink: &mut Blink, from: u32, to: u32, step: u32) -> Vec<(u32, BlinkAction)> {
        (from..to)
            .step_by(step as usize)
            .filter_map(|t| blink.poll(t, false).map(|a| (t, a)))
            .filter(|(_, a)| *a != BlinkAction::Hold)
            .collect()
    }

    #[test]
    fn test_full_cycle_order() {
        let mut blink = Blink::new(0, 1000);
        let actions = run(&mut blink, 0, 1200, 5);
        let kinds: Vec<_> = actions.iter().map(|(_, a)| *a).collect();
        assert_eq!(
            kinds,
            [
                BlinkAction::Band(1),
                BlinkAction::Band(2),
                BlinkAction::Band(3),
                BlinkAction::Close,
                BlinkAction::Reopen,
            ]
        );
        assert_eq!(actions[0].0, 1000);
        assert_eq!(actions[1].0, 1015);
        assert_eq!(actions[3].0, 1045);
        assert_eq!(actions[4].0, 1105);
        assert_eq!(blink.stage(), BlinkStage::Idle);
        assert_eq!(blink.completed(), 1);
    }

    #[test]
    fn test_holds_between_stages() {
        let mut blink = Blink::new(0, 100);
        assert_eq!(blink.poll(100, false), Some(BlinkAction::Band(1)));
        assert_eq!(blink.poll(110, false), Some(BlinkAction::Hold));
        assert!(blink.is_active());
    }

    #[test]
    fn test_next_interval_counts_from_reopen() {
        let mut blink = Blink::new(0, 1000);
        let _ = run(&mut blink, 0, 1200, 5);
        blink.schedule(2000);
        assert_eq!(blink.poll(3000, false), None);
        assert_eq!(blink.poll(3105, false), Some(BlinkAction::Band(1)));
    }

    #[test]
    fn test_suppressed_never_starts() {
        let mut blink = Blink::new(0, 100);
        for t in (0..10_000).step_by(20) {
            assert_eq!(blink.poll(t, true), None);
        }
        assert_eq!(blink.completed(), 0);
        // Waking restarts the interval instead of blinking immediately
        assert_eq!(blink.poll(10_000, false), None);
        assert_eq!(blink.poll(10_080, false), Some(BlinkAction::Band(1)));
    }

    #[test]
    fn test_in_progress_blink_finishes_when_suppressed() {
        let mut blink = Blink::new(0, 100);
        assert_eq!(blink.poll(100, false), Some(BlinkAction::Band(1)));
        let mut reopened = false;
        for t in (100..400).step_by(5) {
            if blink.poll(t, true) == Some(BlinkAction::Reopen) {
                reopened = true;
            }
        }
        assert!(reopened);
        assert_eq!(blink.stage(), BlinkStage::Idle);
    }

    #[test]
    fn test_survives_counter_wrap() {
        let start = u32::MAX - 50;
        let mut blink = Blink::new(start, 100);
        assert_eq!(blink.poll(start.wrapping_add(99), false), None);
        assert_eq!(
            blink.poll(start.wrapping_add(100), false),
            Some(BlinkAction::Band(1))
        );
    }
}
