//! Eyelid easing controller
//!
//! The eyelid is a persistent droop, 0 (open) to 100 (closed), measured
//! from the top of the eye. It eases toward its target by a fixed number of
//! percent per tick and never overshoots. Blinks do not touch it.

/// Fully closed eyelid level
pub const CLOSED: u8 = 100;

/// Approach rate in percent per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LidRate {
    /// Waking up, quick reactions
    Fast,
    /// Squints and moderate droops
    Medium,
    /// Drowsy droop
    Slow,
    /// Falling asleep
    VerySlow,
}

impl LidRate {
    pub const fn percent(self) -> u8 {
        match self {
            LidRate::Fast => 10,
            LidRate::Medium => 5,
            LidRate::Slow => 2,
            LidRate::VerySlow => 1,
        }
    }
}

/// One easing step from `current` toward `target`
///
/// A `rate` of zero is treated as one so the lid always converges.
pub fn step_toward(current: u8, target: u8, rate: u8) -> u8 {
    let current = current.min(CLOSED);
    let target = target.min(CLOSED);
    let rate = rate.max(1);

    if current < target {
        current.saturating_add(rate).min(target)
    } else {
        current.saturating_sub(rate).max(target)
    }
}

/// Current, target and rate of the persistent droop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Eyelid {
    current: u8,
    target: u8,
    rate: u8,
}

impl Eyelid {
    /// A settled lid at `level`
    pub fn settled(level: u8) -> Self {
        let level = level.min(CLOSED);
        Self {
            current: level,
            target: level,
            rate: LidRate::Fast.percent(),
        }
    }

    /// Set a new target; the current level is left for `step` to move
    pub fn retarget(&mut self, target: u8, rate: LidRate) {
        self.target = target.min(CLOSED);
        self.rate = rate.percent();
    }

    /// Advance one tick. Returns true if the level changed.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        self.current = step_toward(self.current, self.target, self.rate);
        true
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn rate(&self) -> u8 {
        self.rate
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    pub fn is_closed(&self) -> bool {
        self.current >= CLOSED
    }
}

impl Default for Eyelid {
    fn default() -> Self {
        Self::settled(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_step_clamps_at_target() {
        assert_eq!(step_toward(0, 25, 10), 10);
        assert_eq!(step_toward(20, 25, 10), 25);
        assert_eq!(step_toward(30, 25, 10), 25);
        assert_eq!(step_toward(45, 0, 2), 43);
    }

    #[test]
    fn test_zero_rate_still_moves() {
        assert_eq!(step_toward(0, 5, 0), 1);
    }

    #[test]
    fn test_retarget_does_not_jump() {
        let mut lid = Eyelid::settled(0);
        lid.retarget(45, LidRate::Slow);
        assert_eq!(lid.current(), 0);
        assert!(lid.step());
        assert_eq!(lid.current(), 2);
    }

    #[test]
    fn test_closes_fully() {
        let mut lid = Eyelid::settled(0);
        lid.retarget(CLOSED, LidRate::VerySlow);
        let mut ticks = 0;
        while lid.step() {
            ticks += 1;
        }
        assert_eq!(ticks, 100);
        assert!(lid.is_closed());
        assert!(!lid.step());
    }

    proptest! {
        #[test]
        fn prop_converges_without_overshoot(
            start in 0u8..=100,
            target in 0u8..=100,
            rate in 0u8..=255,
        ) {
            let mut level = start;
            let mut previous_distance = level.abs_diff(target);
            for _ in 0..=100 {
                let next = step_toward(level, target, rate);
                prop_assert!(next <= CLOSED);
                // Never crosses the target
                prop_assert!((level <= target) == (next <= target) || next == target);
                let distance = next.abs_diff(target);
                prop_assert!(distance <= previous_distance);
                previous_distance = distance;
                level = next;
            }
            prop_assert_eq!(level, target);
        }
    }
}
