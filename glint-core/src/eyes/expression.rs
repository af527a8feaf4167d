//! Expression vocabulary and per-expression behavior table
//!
//! An expression is the single source of truth for where the eyelid
//! settles, how fast it gets there, where the eyes look on entry, how often
//! they blink and which idle motion runs afterwards.

use super::eyelid::LidRate;
use super::gaze::MotionPolicy;

/// Named face expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Expression {
    #[default]
    Normal,
    Sleepy,
    Asleep,
    Focused,
    Reading,
    Searching,
    Thinking,
    Terminal,
    Stressed,
    Happy,
    Done,
}

impl Expression {
    /// Every expression, in table order
    pub const ALL: [Expression; 11] = [
        Expression::Normal,
        Expression::Sleepy,
        Expression::Asleep,
        Expression::Focused,
        Expression::Reading,
        Expression::Searching,
        Expression::Thinking,
        Expression::Terminal,
        Expression::Stressed,
        Expression::Happy,
        Expression::Done,
    ];

    /// Number of expressions
    pub const COUNT: usize = Self::ALL.len();

    /// Parse a command name; unknown names fall back to `Normal`
    pub fn parse(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Expression::Normal)
    }

    /// Strict lookup, case-insensitive and whitespace-trimmed
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name().eq_ignore_ascii_case(name))
    }

    /// Lower-case command name
    pub const fn name(self) -> &'static str {
        match self {
            Expression::Normal => "normal",
            Expression::Sleepy => "sleepy",
            Expression::Asleep => "asleep",
            Expression::Focused => "focused",
            Expression::Reading => "reading",
            Expression::Searching => "searching",
            Expression::Thinking => "thinking",
            Expression::Terminal => "terminal",
            Expression::Stressed => "stressed",
            Expression::Happy => "happy",
            Expression::Done => "done",
        }
    }

    /// Position in `ALL`
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Behavior for this expression
    pub const fn profile(self) -> ExpressionProfile {
        use BlinkCadence::*;
        use EntryGaze::*;
        use LidTarget::*;
        use MotionPolicy as M;

        let (lid, rate, gaze, cadence, motion) = match self {
            Expression::Normal => (SquintIfDefault, LidRate::Fast, Keep, Default, M::Idle),
            Expression::Sleepy => (Level(45), LidRate::Slow, Look(0.0, 0.6), Longer, M::Sleepy),
            Expression::Asleep => (Level(100), LidRate::VerySlow, Look(0.0, 0.6), Longer, M::Still),
            Expression::Focused => (Level(25), LidRate::Medium, Look(0.0, 0.2), Longer, M::Scanning),
            Expression::Reading => (Level(10), LidRate::Medium, SweepStart, Default, M::Reading),
            Expression::Searching => (Level(0), LidRate::Fast, Keep, Shorter, M::Searching),
            Expression::Thinking => (Level(0), LidRate::Medium, Look(0.5, -0.6), Longer, M::Thinking),
            Expression::Terminal => (Level(20), LidRate::Medium, Look(0.0, 0.0), MuchLonger, M::Scanning),
            Expression::Stressed => (Level(0), LidRate::Fast, Keep, MuchShorter, M::Jitter),
            Expression::Happy => (Squint, LidRate::Medium, Keep, Default, M::Idle),
            Expression::Done => (SquintIfDefault, LidRate::Fast, Look(0.0, 0.2), Default, M::Idle),
        };

        ExpressionProfile {
            lid,
            rate,
            gaze,
            cadence,
            motion,
        }
    }
}

/// Where the eyelid settles
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LidTarget {
    /// Fixed percentage
    Level(u8),
    /// Always the configured happy squint
    Squint,
    /// Configured squint when squint-by-default is on, otherwise open
    SquintIfDefault,
}

impl LidTarget {
    /// Resolve against the face's squint settings
    pub const fn level(self, squint: u8, squint_by_default: bool) -> u8 {
        match self {
            LidTarget::Level(level) => level,
            LidTarget::Squint => squint,
            LidTarget::SquintIfDefault if squint_by_default => squint,
            LidTarget::SquintIfDefault => 0,
        }
    }
}

/// Gaze applied the moment the expression is entered
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EntryGaze {
    /// Leave the current gaze alone
    Keep,
    /// Look in a normalized direction, positive y is down
    Look(f32, f32),
    /// Jump to the start of the reading sweep
    SweepStart,
}

/// Blink interval scaling relative to the configured range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkCadence {
    Default,
    Shorter,
    MuchShorter,
    Longer,
    MuchLonger,
}

impl BlinkCadence {
    /// Interval scale in percent
    pub const fn percent(self) -> u32 {
        match self {
            BlinkCadence::Default => 100,
            BlinkCadence::Shorter => 60,
            BlinkCadence::MuchShorter => 30,
            BlinkCadence::Longer => 160,
            BlinkCadence::MuchLonger => 250,
        }
    }

    /// Scale a base interval
    pub const fn scale(self, interval_ms: u32) -> u32 {
        interval_ms.saturating_mul(self.percent()) / 100
    }
}

/// Everything an expression decides
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExpressionProfile {
    pub lid: LidTarget,
    pub rate: LidRate,
    pub gaze: EntryGaze,
    pub cadence: BlinkCadence,
    pub motion: MotionPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Expression::parse("SLEEPY"), Expression::Sleepy);
        assert_eq!(Expression::parse("  Reading\n"), Expression::Reading);
        assert_eq!(Expression::parse("terminal"), Expression::Terminal);
    }

    #[test]
    fn test_unknown_falls_back_to_normal() {
        assert_eq!(Expression::parse("quizzical"), Expression::Normal);
        assert_eq!(Expression::parse(""), Expression::Normal);
        assert_eq!(Expression::from_name("quizzical"), None);
    }

    #[test]
    fn test_names_round_trip() {
        for expr in Expression::ALL {
            assert_eq!(Expression::from_name(expr.name()), Some(expr));
        }
        assert_eq!(Expression::COUNT, 11);
    }

    #[test]
    fn test_index_matches_table_order() {
        for (i, expr) in Expression::ALL.iter().enumerate() {
            assert_eq!(expr.index(), i);
        }
    }

    #[test]
    fn test_documented_lid_targets() {
        let level = |e: Expression| e.profile().lid.level(30, false);
        assert_eq!(level(Expression::Normal), 0);
        assert_eq!(level(Expression::Sleepy), 45);
        assert_eq!(level(Expression::Asleep), 100);
        assert_eq!(level(Expression::Focused), 25);
        assert_eq!(level(Expression::Reading), 10);
        assert_eq!(level(Expression::Searching), 0);
        assert_eq!(level(Expression::Thinking), 0);
        assert_eq!(level(Expression::Terminal), 20);
        assert_eq!(level(Expression::Stressed), 0);
        assert_eq!(level(Expression::Happy), 30);
        assert_eq!(level(Expression::Done), 0);
    }

    #[test]
    fn test_squint_by_default_affects_normal_and_done() {
        let level = |e: Expression| e.profile().lid.level(35, true);
        assert_eq!(level(Expression::Normal), 35);
        assert_eq!(level(Expression::Done), 35);
        assert_eq!(level(Expression::Happy), 35);
        assert_eq!(level(Expression::Sleepy), 45);
    }

    #[test]
    fn test_cadence_scaling() {
        assert_eq!(BlinkCadence::Default.scale(4000), 4000);
        assert_eq!(BlinkCadence::Longer.scale(4000), 6400);
        assert_eq!(BlinkCadence::MuchShorter.scale(4000), 1200);
        assert!(BlinkCadence::MuchLonger.scale(3000) > BlinkCadence::Longer.scale(3000));
    }

    #[test]
    fn test_motion_policies() {
        assert_eq!(Expression::Reading.profile().motion, MotionPolicy::Reading);
        assert_eq!(Expression::Terminal.profile().motion, MotionPolicy::Scanning);
        assert_eq!(Expression::Stressed.profile().motion, MotionPolicy::Jitter);
        assert_eq!(Expression::Asleep.profile().motion, MotionPolicy::Still);
    }
}
